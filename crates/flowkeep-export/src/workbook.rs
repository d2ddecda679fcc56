// SPDX-License-Identifier: Apache-2.0

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::rows::{ExportCell, ExportRow, COLUMN_WIDTHS, HEADERS};
use crate::ExportError;

const AMOUNT_FORMAT: &str = "#,##0";

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &ExportCell,
    amount: &Format,
) -> Result<(), XlsxError> {
    match cell {
        ExportCell::Empty => {}
        ExportCell::Number(n) => {
            worksheet.write_number_with_format(row, col, *n as f64, amount)?;
        }
        ExportCell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

fn fill_sheet(
    worksheet: &mut Worksheet,
    sheet_name: &str,
    rows: &[ExportRow],
) -> Result<(), XlsxError> {
    worksheet.set_name(sheet_name)?;
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        worksheet.set_column_width(col, width)?;
    }
    for (col, header) in (0u16..).zip(HEADERS) {
        worksheet.write_string(0, col, header)?;
    }
    let amount = Format::new().set_num_format(AMOUNT_FORMAT);
    for (row, cells) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            write_cell(worksheet, row, col, cell, &amount)?;
        }
    }
    Ok(())
}

pub(crate) fn write_workbook(sheet_name: &str, rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), sheet_name, rows)?;
    Ok(workbook.save_to_buffer()?)
}
