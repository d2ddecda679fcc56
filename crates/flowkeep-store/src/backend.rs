// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::codec::{SheetName, SheetRow};
use crate::error::{StoreError, StoreErrorCode};

/// A data row and its zero-based position below the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRow {
    pub index: usize,
    pub row: SheetRow,
}

/// Positional row access to a spreadsheet-like store.
///
/// Indices are only valid until the next delete on the same sheet.
#[async_trait]
pub trait SheetBackend: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;
    async fn read_rows(&self, sheet: SheetName) -> Result<Vec<IndexedRow>, StoreError>;
    async fn append_row(&self, sheet: SheetName, row: &SheetRow) -> Result<(), StoreError>;
    async fn update_row(&self, sheet: SheetName, index: usize, row: &SheetRow) -> Result<(), StoreError>;
    async fn delete_row(&self, sheet: SheetName, index: usize) -> Result<(), StoreError>;
}

pub(crate) fn index_rows(rows: Vec<SheetRow>) -> Vec<IndexedRow> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| IndexedRow { index, row })
        .collect()
}

pub(crate) fn row_out_of_range(sheet: SheetName, index: usize) -> StoreError {
    StoreError::new(
        StoreErrorCode::Internal,
        format!("{sheet} row index {index} is out of range"),
    )
}

/// In-process tabs for tests and throwaway servers.
#[derive(Default)]
pub struct MemorySheetBackend {
    sheets: Mutex<BTreeMap<SheetName, Vec<SheetRow>>>,
    calls: AtomicU64,
    fail_deletes_after: Mutex<Option<usize>>,
}

impl MemorySheetBackend {
    #[must_use]
    pub fn new() -> Self {
        let backend = Self::default();
        if let Ok(mut sheets) = backend.sheets.lock() {
            for sheet in SheetName::ALL {
                sheets.insert(sheet, Vec::new());
            }
        }
        backend
    }

    /// Backend without any tabs, for sheet-not-found paths.
    #[must_use]
    pub fn without_sheets() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rows(&self, sheet: SheetName) -> Vec<SheetRow> {
        self.sheets
            .lock()
            .ok()
            .and_then(|sheets| sheets.get(&sheet).cloned())
            .unwrap_or_default()
    }

    /// Lets `n` more deletes succeed, then fails every later one.
    pub fn fail_deletes_after(&self, n: usize) {
        if let Ok(mut slot) = self.fail_deletes_after.lock() {
            *slot = Some(n);
        }
    }

    fn with_sheet<T>(
        &self,
        sheet: SheetName,
        f: impl FnOnce(&mut Vec<SheetRow>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut sheets = self
            .sheets
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "memory backend poisoned"))?;
        let rows = sheets.get_mut(&sheet).ok_or_else(|| {
            StoreError::new(
                StoreErrorCode::SheetNotFound,
                format!("worksheet `{sheet}` was not found"),
            )
        })?;
        f(rows)
    }
}

#[async_trait]
impl SheetBackend for MemorySheetBackend {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn read_rows(&self, sheet: SheetName) -> Result<Vec<IndexedRow>, StoreError> {
        self.with_sheet(sheet, |rows| Ok(index_rows(rows.clone())))
    }

    async fn append_row(&self, sheet: SheetName, row: &SheetRow) -> Result<(), StoreError> {
        self.with_sheet(sheet, |rows| {
            rows.push(row.clone());
            Ok(())
        })
    }

    async fn update_row(&self, sheet: SheetName, index: usize, row: &SheetRow) -> Result<(), StoreError> {
        self.with_sheet(sheet, |rows| {
            let slot = rows.get_mut(index).ok_or_else(|| row_out_of_range(sheet, index))?;
            slot.clone_from(row);
            Ok(())
        })
    }

    async fn delete_row(&self, sheet: SheetName, index: usize) -> Result<(), StoreError> {
        if let Ok(mut budget) = self.fail_deletes_after.lock() {
            match budget.as_mut() {
                Some(0) => {
                    return Err(StoreError::new(
                        StoreErrorCode::Network,
                        "injected delete failure",
                    ))
                }
                Some(left) => *left -= 1,
                None => {}
            }
        }
        self.with_sheet(sheet, |rows| {
            if index >= rows.len() {
                return Err(row_out_of_range(sheet, index));
            }
            rows.remove(index);
            Ok(())
        })
    }
}
