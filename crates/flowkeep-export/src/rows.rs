// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use flowkeep_model::{Transaction, TransactionKind};

pub const HEADERS: [&str; 8] = [
    "日期",
    "類型",
    "項目",
    "人員",
    "報名人數",
    "憑證類型",
    "金額",
    "備註",
];

/// Character widths, one per header.
pub const COLUMN_WIDTHS: [u32; 8] = [12, 8, 25, 15, 10, 12, 12, 30];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportCell {
    Text(String),
    /// Rendered with the `#,##0` format.
    Number(i64),
    Empty,
}

pub type ExportRow = [ExportCell; 8];

/// ISO dates become `yyyy/MM/dd`; anything unparsable is kept verbatim.
#[must_use]
pub fn format_export_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        });
    match date {
        Some(date) => date.format("%Y/%m/%d").to_string(),
        None => raw.to_string(),
    }
}

fn text(value: &str) -> ExportCell {
    if value.is_empty() {
        ExportCell::Empty
    } else {
        ExportCell::Text(value.to_string())
    }
}

#[must_use]
pub fn export_row(tx: &Transaction) -> ExportRow {
    let data = &tx.data;
    let (count, voucher) = match data.kind {
        TransactionKind::Income => (
            data.count.map_or(ExportCell::Empty, |c| ExportCell::Number(i64::from(c))),
            ExportCell::Empty,
        ),
        TransactionKind::Expense => (
            ExportCell::Empty,
            data.voucher_type
                .map_or(ExportCell::Empty, |v| ExportCell::Text(v.as_str().to_string())),
        ),
    };
    [
        text(&format_export_date(&data.date)),
        ExportCell::Text(data.kind.label().to_string()),
        text(&data.item),
        text(&data.person),
        count,
        voucher,
        ExportCell::Number(data.amount),
        text(&data.notes),
    ]
}
