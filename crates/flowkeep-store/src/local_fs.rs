// SPDX-License-Identifier: Apache-2.0

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flowkeep_core::{ErrorContext, ResultExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::backend::{index_rows, row_out_of_range, IndexedRow, SheetBackend};
use crate::codec::{SheetName, SheetRow};
use crate::error::{StoreError, StoreErrorCode};

/// One JSON array of row objects per tab under `root`.
///
/// A missing file reads as an empty tab. Writes go through a temp file and a
/// rename; one process-local lock serializes read-modify-write cycles.
pub struct LocalFsSheetBackend {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalFsSheetBackend {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn sheet_path(&self, sheet: SheetName) -> PathBuf {
        self.root.join(format!("{}.json", sheet.title()))
    }

    async fn load(&self, sheet: SheetName) -> Result<Vec<SheetRow>, StoreError> {
        let path = self.sheet_path(sheet);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ErrorContext::new("read sheet file", e).into()),
        };
        serde_json::from_slice(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Codec,
                format!("{} is not a JSON row array: {e}", path.display()),
            )
        })
    }

    async fn save(&self, sheet: SheetName, rows: &[SheetRow]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context("create store directory")?;
        let path = self.sheet_path(sheet);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(rows)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context("write sheet temp file")?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context("replace sheet file")?;
        debug!(path = %path.display(), rows = rows.len(), "sheet file written");
        Ok(())
    }
}

#[async_trait]
impl SheetBackend for LocalFsSheetBackend {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn read_rows(&self, sheet: SheetName) -> Result<Vec<IndexedRow>, StoreError> {
        Ok(index_rows(self.load(sheet).await?))
    }

    async fn append_row(&self, sheet: SheetName, row: &SheetRow) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load(sheet).await?;
        rows.push(row.clone());
        self.save(sheet, &rows).await
    }

    async fn update_row(&self, sheet: SheetName, index: usize, row: &SheetRow) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load(sheet).await?;
        let slot = rows
            .get_mut(index)
            .ok_or_else(|| row_out_of_range(sheet, index))?;
        slot.clone_from(row);
        self.save(sheet, &rows).await
    }

    async fn delete_row(&self, sheet: SheetName, index: usize) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load(sheet).await?;
        if index >= rows.len() {
            return Err(row_out_of_range(sheet, index));
        }
        rows.remove(index);
        self.save(sheet, &rows).await
    }
}
