// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;
use crate::transaction::{Transaction, TransactionKind};

/// Fields supplied when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub name: String,
    pub passcode: String,
    #[serde(default)]
    pub use_kiwi_maru: bool,
    #[serde(default)]
    pub kiwi_maru_supported: bool,
    #[serde(default)]
    pub common_income_items: Vec<String>,
    #[serde(default)]
    pub common_expense_items: Vec<String>,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_kiwi_maru: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kiwi_maru_supported: Option<bool>,
}

impl ProjectPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.passcode.is_none()
            && self.use_kiwi_maru.is_none()
            && self.kiwi_maru_supported.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub passcode: String,
    pub use_kiwi_maru: bool,
    pub kiwi_maru_supported: bool,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub common_income_items: Vec<String>,
    #[serde(default)]
    pub common_expense_items: Vec<String>,
}

impl Project {
    #[must_use]
    pub fn common_items(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Income => &self.common_income_items,
            TransactionKind::Expense => &self.common_expense_items,
        }
    }

    pub fn common_items_mut(&mut self, kind: TransactionKind) -> &mut Vec<String> {
        match kind {
            TransactionKind::Income => &mut self.common_income_items,
            TransactionKind::Expense => &mut self.common_expense_items,
        }
    }

    /// Appends `item` to the common list for `kind` when absent. Returns whether it changed.
    pub fn remember_item(&mut self, kind: TransactionKind, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() {
            return false;
        }
        let items = self.common_items_mut(kind);
        if items.iter().any(|existing| existing == item) {
            return false;
        }
        items.push(item.to_string());
        true
    }

    pub fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(passcode) = &patch.passcode {
            self.passcode.clone_from(passcode);
        }
        if let Some(flag) = patch.use_kiwi_maru {
            self.use_kiwi_maru = flag;
        }
        if let Some(flag) = patch.kiwi_maru_supported {
            self.kiwi_maru_supported = flag;
        }
    }

    #[must_use]
    pub fn listing(&self) -> ProjectListing {
        ProjectListing {
            id: self.id.clone(),
            name: self.name.clone(),
            use_kiwi_maru: self.use_kiwi_maru,
        }
    }
}

/// Public directory entry; never carries the passcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    pub id: ProjectId,
    pub name: String,
    pub use_kiwi_maru: bool,
}
