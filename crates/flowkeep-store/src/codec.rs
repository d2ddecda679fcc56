// SPDX-License-Identifier: Apache-2.0

//! Explicit row schemas for the two sheet tabs.
//!
//! Decoding never coerces: an absent column or an unparsable cell is an error
//! naming the sheet and column.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use flowkeep_model::{
    Project, ProjectId, Transaction, TransactionData, TransactionId, TransactionKind, VoucherType,
    ADMIN_CONFIG_ID,
};

/// Column name to cell text.
pub type SheetRow = BTreeMap<String, String>;

pub const ADMIN_CONFIG_NAME: &str = "SYSTEM_ADMIN_CONFIG";

pub const PROJECT_HEADERS: &[&str] = &[
    "id",
    "name",
    "passcode",
    "useKiwiMaru",
    "kiwiMaruSupported",
    "commonIncomeItems",
    "commonExpenseItems",
];

pub const TRANSACTION_HEADERS: &[&str] = &[
    "id",
    "projectId",
    "type",
    "date",
    "person",
    "item",
    "amount",
    "notes",
    "count",
    "voucherType",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetName {
    Projects,
    Transactions,
}

impl SheetName {
    pub const ALL: [Self; 2] = [Self::Projects, Self::Transactions];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Transactions => "Transactions",
        }
    }

    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Projects => PROJECT_HEADERS,
            Self::Transactions => TRANSACTION_HEADERS,
        }
    }
}

impl Display for SheetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    MissingColumn {
        sheet: SheetName,
        column: &'static str,
    },
    Malformed {
        sheet: SheetName,
        column: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { sheet, column } => {
                write!(f, "{sheet} row is missing column `{column}`")
            }
            Self::Malformed {
                sheet,
                column,
                value,
                reason,
            } => write!(f, "{sheet} column `{column}` has malformed value `{value}`: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

fn cell<'a>(row: &'a SheetRow, sheet: SheetName, column: &'static str) -> Result<&'a str, CodecError> {
    row.get(column)
        .map(String::as_str)
        .ok_or(CodecError::MissingColumn { sheet, column })
}

fn malformed(sheet: SheetName, column: &'static str, value: &str, reason: impl Display) -> CodecError {
    CodecError::Malformed {
        sheet,
        column,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(sheet: SheetName, column: &'static str, raw: &str) -> Result<bool, CodecError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(malformed(sheet, column, raw, "expected TRUE or FALSE")),
    }
}

fn bool_cell(value: bool) -> String {
    let text = if value { "TRUE" } else { "FALSE" };
    text.to_string()
}

/// Leading apostrophe keeps numeric-looking passcodes as text in the sheet.
#[must_use]
pub fn passcode_cell(passcode: &str) -> String {
    format!("'{passcode}")
}

#[must_use]
pub fn strip_text_marker(raw: &str) -> &str {
    raw.strip_prefix('\'').unwrap_or(raw)
}

#[must_use]
pub fn split_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[must_use]
pub fn join_items(items: &[String]) -> String {
    items.join(",")
}

#[must_use]
pub fn row_id(row: &SheetRow) -> Option<&str> {
    row.get("id").map(String::as_str)
}

#[must_use]
pub fn is_admin_config_row(row: &SheetRow) -> bool {
    row_id(row) == Some(ADMIN_CONFIG_ID)
}

#[must_use]
pub fn admin_config_row(passcode: &str) -> SheetRow {
    let mut row = SheetRow::new();
    row.insert("id".to_string(), ADMIN_CONFIG_ID.to_string());
    row.insert("name".to_string(), ADMIN_CONFIG_NAME.to_string());
    row.insert("passcode".to_string(), passcode_cell(passcode));
    row
}

/// Stored admin passcode, `None` when the cell is empty or absent.
#[must_use]
pub fn admin_passcode_from_row(row: &SheetRow) -> Option<String> {
    let raw = strip_text_marker(row.get("passcode")?.trim());
    (!raw.is_empty()).then(|| raw.to_string())
}

/// Decodes a project row; `transactions` is left empty.
pub fn decode_project_row(row: &SheetRow) -> Result<Project, CodecError> {
    const SHEET: SheetName = SheetName::Projects;
    let raw_id = cell(row, SHEET, "id")?;
    let id = ProjectId::parse(raw_id.trim()).map_err(|e| malformed(SHEET, "id", raw_id, e))?;
    let name = cell(row, SHEET, "name")?.to_string();
    let passcode = strip_text_marker(cell(row, SHEET, "passcode")?).to_string();
    let use_kiwi_maru = parse_bool(SHEET, "useKiwiMaru", cell(row, SHEET, "useKiwiMaru")?)?;
    let kiwi_maru_supported = match row.get("kiwiMaruSupported").map(|s| s.trim()) {
        None | Some("") => false,
        Some(raw) => parse_bool(SHEET, "kiwiMaruSupported", raw)?,
    };
    Ok(Project {
        id,
        name,
        passcode,
        use_kiwi_maru,
        kiwi_maru_supported,
        transactions: Vec::new(),
        common_income_items: split_items(row.get("commonIncomeItems").map_or("", String::as_str)),
        common_expense_items: split_items(row.get("commonExpenseItems").map_or("", String::as_str)),
    })
}

#[must_use]
pub fn encode_project_row(project: &Project) -> SheetRow {
    let mut row = SheetRow::new();
    row.insert("id".to_string(), project.id.as_str().to_string());
    row.insert("name".to_string(), project.name.clone());
    row.insert("passcode".to_string(), passcode_cell(&project.passcode));
    row.insert("useKiwiMaru".to_string(), bool_cell(project.use_kiwi_maru));
    row.insert(
        "kiwiMaruSupported".to_string(),
        bool_cell(project.kiwi_maru_supported),
    );
    row.insert(
        "commonIncomeItems".to_string(),
        join_items(&project.common_income_items),
    );
    row.insert(
        "commonExpenseItems".to_string(),
        join_items(&project.common_expense_items),
    );
    row
}

pub fn decode_transaction_row(row: &SheetRow) -> Result<Transaction, CodecError> {
    const SHEET: SheetName = SheetName::Transactions;
    let raw_id = cell(row, SHEET, "id")?;
    let id = TransactionId::parse(raw_id.trim()).map_err(|e| malformed(SHEET, "id", raw_id, e))?;
    let raw_project = cell(row, SHEET, "projectId")?;
    let project_id = ProjectId::parse(raw_project.trim())
        .map_err(|e| malformed(SHEET, "projectId", raw_project, e))?;
    let raw_kind = cell(row, SHEET, "type")?;
    let kind = TransactionKind::parse(raw_kind).map_err(|e| malformed(SHEET, "type", raw_kind, e))?;
    let raw_amount = cell(row, SHEET, "amount")?;
    let amount = raw_amount
        .trim()
        .parse::<i64>()
        .map_err(|e| malformed(SHEET, "amount", raw_amount, e))?;
    let count = match row.get("count").map(|s| s.trim()) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|e| malformed(SHEET, "count", raw, e))?,
        ),
    };
    let voucher_type = match row.get("voucherType").map(|s| s.trim()) {
        None | Some("") => None,
        Some(raw) => Some(VoucherType::parse(raw).map_err(|e| malformed(SHEET, "voucherType", raw, e))?),
    };
    Ok(Transaction {
        id,
        project_id,
        data: TransactionData {
            kind,
            date: cell(row, SHEET, "date")?.to_string(),
            person: cell(row, SHEET, "person")?.to_string(),
            item: cell(row, SHEET, "item")?.to_string(),
            amount,
            count,
            voucher_type,
            notes: row.get("notes").cloned().unwrap_or_default(),
        },
    })
}

#[must_use]
pub fn encode_transaction_row(tx: &Transaction) -> SheetRow {
    let data = &tx.data;
    let mut row = SheetRow::new();
    row.insert("id".to_string(), tx.id.as_str().to_string());
    row.insert("projectId".to_string(), tx.project_id.as_str().to_string());
    row.insert("type".to_string(), data.kind.as_str().to_string());
    row.insert("date".to_string(), data.date.clone());
    row.insert("person".to_string(), data.person.clone());
    row.insert("item".to_string(), data.item.clone());
    row.insert("amount".to_string(), data.amount.to_string());
    row.insert("notes".to_string(), data.notes.clone());
    row.insert(
        "count".to_string(),
        data.count.map(|c| c.to_string()).unwrap_or_default(),
    );
    row.insert(
        "voucherType".to_string(),
        data.voucher_type
            .map(|v| v.as_str().to_string())
            .unwrap_or_default(),
    );
    row
}
