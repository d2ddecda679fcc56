// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Single-sheet `.xlsx` export of a project's transactions.

mod rows;
mod workbook;

use std::fmt::{Display, Formatter};

use flowkeep_model::{Project, Transaction};

pub use rows::{export_row, format_export_date, ExportCell, ExportRow, COLUMN_WIDTHS, HEADERS};

pub const CRATE_NAME: &str = "flowkeep-export";
pub const SHEET_NAME: &str = "交易紀錄";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug)]
pub struct ExportError(pub String);

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "xlsx export failed: {}", self.0)
    }
}

impl std::error::Error for ExportError {}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[must_use]
pub fn export_file_name(project_name: &str) -> String {
    format!("{project_name}_收支紀錄.xlsx")
}

/// Exports `project.transactions` in stored order.
pub fn export_project(project: &Project) -> Result<ExportedWorkbook, ExportError> {
    export_transactions(&project.name, &project.transactions)
}

pub fn export_transactions(
    project_name: &str,
    transactions: &[Transaction],
) -> Result<ExportedWorkbook, ExportError> {
    let rows: Vec<ExportRow> = transactions.iter().map(export_row).collect();
    Ok(ExportedWorkbook {
        file_name: export_file_name(project_name),
        bytes: workbook::write_workbook(SHEET_NAME, &rows)?,
    })
}
