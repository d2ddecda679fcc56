// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::ids::{ProjectId, TransactionId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Column label used in exports and the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "收入",
            Self::Expense => "支出",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError(format!(
                "transaction type must be income or expense, got `{other}`"
            ))),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supporting document attached to an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherType {
    #[serde(rename = "發票")]
    Invoice,
    #[serde(rename = "收據")]
    Receipt,
    #[serde(rename = "其他")]
    Other,
}

impl VoucherType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "發票",
            Self::Receipt => "收據",
            Self::Other => "其他",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "發票" => Ok(Self::Invoice),
            "收據" => Ok(Self::Receipt),
            "其他" => Ok(Self::Other),
            other => Err(ValidationError(format!("unknown voucher type `{other}`"))),
        }
    }
}

impl Display for VoucherType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// ISO calendar date, `yyyy-mm-dd`.
    pub date: String,
    pub person: String,
    pub item: String,
    pub amount: i64,
    /// Attendee count, income only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Expense only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_type: Option<VoucherType>,
    #[serde(default)]
    pub notes: String,
}

impl TransactionData {
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Trims free text and drops the field that does not belong to the kind.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.date = self.date.trim().to_string();
        self.person = self.person.trim().to_string();
        self.item = self.item.trim().to_string();
        self.notes = self.notes.trim().to_string();
        match self.kind {
            TransactionKind::Income => self.voucher_type = None,
            TransactionKind::Expense => self.count = None,
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub data: TransactionData,
}

impl Transaction {
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.data.kind
    }
}
