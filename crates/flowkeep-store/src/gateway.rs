// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use flowkeep_core::IdGenerator;
use flowkeep_model::messages::{ADMIN_PASSCODE_MISSING, PROJECT_NOT_FOUND, TRANSACTION_NOT_FOUND};
use flowkeep_model::{
    Project, ProjectData, ProjectId, ProjectPatch, Transaction, TransactionData, TransactionId,
    TransactionKind,
};
use tracing::{debug, info, warn};

use crate::backend::{IndexedRow, SheetBackend};
use crate::codec::{
    admin_config_row, admin_passcode_from_row, decode_project_row, decode_transaction_row,
    encode_project_row, encode_transaction_row, is_admin_config_row, passcode_cell, row_id,
    SheetName, SheetRow,
};
use crate::error::{StoreError, StoreErrorCode};
use crate::tag_cache::{CacheTag, CachedValue, TagCache};

/// CRUD over the Projects and Transactions tabs.
///
/// Reads of the full listing are cached under [`CacheTag::Projects`]; every
/// write invalidates that tag. Multi-row operations are sequential single-row
/// writes with no rollback.
pub struct SheetsGateway {
    backend: Arc<dyn SheetBackend>,
    ids: Arc<dyn IdGenerator>,
    cache: TagCache,
}

fn project_not_found() -> StoreError {
    StoreError::new(StoreErrorCode::ProjectNotFound, PROJECT_NOT_FOUND)
}

fn transaction_not_found() -> StoreError {
    StoreError::new(StoreErrorCode::TransactionNotFound, TRANSACTION_NOT_FOUND)
}

/// Keeps columns the codec does not know about.
fn merged(original: &SheetRow, encoded: SheetRow) -> SheetRow {
    let mut row = original.clone();
    row.extend(encoded);
    row
}

impl SheetsGateway {
    #[must_use]
    pub fn new(
        backend: Arc<dyn SheetBackend>,
        ids: Arc<dyn IdGenerator>,
        listing_ttl: Option<Duration>,
    ) -> Self {
        Self {
            backend,
            ids,
            cache: TagCache::new(listing_ttl),
        }
    }

    #[must_use]
    pub fn backend_tag(&self) -> &'static str {
        self.backend.backend_tag()
    }

    #[must_use]
    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    pub async fn get_admin_passcode(&self) -> Result<String, StoreError> {
        if let Some(CachedValue::AdminPasscode(passcode)) = self.cache.get(CacheTag::AdminPasscode) {
            return Ok(passcode);
        }
        let generation = self.cache.generation(CacheTag::AdminPasscode);
        let rows = self.backend.read_rows(SheetName::Projects).await?;
        let passcode = rows
            .iter()
            .find(|r| is_admin_config_row(&r.row))
            .and_then(|r| admin_passcode_from_row(&r.row))
            .ok_or_else(|| StoreError::new(StoreErrorCode::NotConfigured, ADMIN_PASSCODE_MISSING))?;
        self.cache.put_if_current(
            CacheTag::AdminPasscode,
            generation,
            CachedValue::AdminPasscode(passcode.clone()),
        );
        Ok(passcode)
    }

    /// Updates the sentinel row, or appends it when absent.
    pub async fn set_admin_passcode(&self, passcode: &str) -> Result<(), StoreError> {
        let rows = self.backend.read_rows(SheetName::Projects).await?;
        let result = match rows.iter().find(|r| is_admin_config_row(&r.row)) {
            Some(existing) => {
                let mut row = existing.row.clone();
                row.insert("passcode".to_string(), passcode_cell(passcode));
                self.backend
                    .update_row(SheetName::Projects, existing.index, &row)
                    .await
            }
            None => {
                self.backend
                    .append_row(SheetName::Projects, &admin_config_row(passcode))
                    .await
            }
        };
        self.cache.invalidate(CacheTag::AdminPasscode);
        self.cache.invalidate(CacheTag::Projects);
        result?;
        info!("admin passcode updated");
        Ok(())
    }

    /// Every project with its transactions attached, sentinel row excluded.
    pub async fn list_projects(&self) -> Result<Arc<Vec<Project>>, StoreError> {
        if let Some(CachedValue::Projects(projects)) = self.cache.get(CacheTag::Projects) {
            return Ok(projects);
        }
        let generation = self.cache.generation(CacheTag::Projects);
        let project_rows = self.backend.read_rows(SheetName::Projects).await?;
        let transaction_rows = self.backend.read_rows(SheetName::Transactions).await?;

        let transactions = transaction_rows
            .iter()
            .map(|r| decode_transaction_row(&r.row))
            .collect::<Result<Vec<_>, _>>()?;
        let mut projects = project_rows
            .iter()
            .filter(|r| !is_admin_config_row(&r.row))
            .map(|r| decode_project_row(&r.row))
            .collect::<Result<Vec<_>, _>>()?;
        for project in &mut projects {
            project.transactions = transactions
                .iter()
                .filter(|t| t.project_id == project.id)
                .cloned()
                .collect();
        }
        let projects = Arc::new(projects);
        let stored = self.cache.put_if_current(
            CacheTag::Projects,
            generation,
            CachedValue::Projects(Arc::clone(&projects)),
        );
        if !stored {
            debug!("listing changed while it was read; not cached");
        }
        Ok(projects)
    }

    pub async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self
            .list_projects()
            .await?
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    pub async fn add_project(&self, data: ProjectData) -> Result<Project, StoreError> {
        let id = self.new_project_id()?;
        let project = Project {
            id,
            name: data.name,
            passcode: data.passcode,
            use_kiwi_maru: data.use_kiwi_maru,
            kiwi_maru_supported: data.kiwi_maru_supported,
            transactions: Vec::new(),
            common_income_items: data.common_income_items,
            common_expense_items: data.common_expense_items,
        };
        let result = self
            .backend
            .append_row(SheetName::Projects, &encode_project_row(&project))
            .await;
        self.cache.invalidate(CacheTag::Projects);
        result?;
        info!(project_id = %project.id, "project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, StoreError> {
        let (found, mut project) = self.find_project_row(id).await?;
        project.apply_patch(patch);
        self.write_project(&found, &project).await?;
        info!(project_id = %id, "project updated");
        Ok(project)
    }

    /// Deletes the project row, then its transactions from the bottom up.
    ///
    /// A failure part way leaves earlier deletions in place.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<usize, StoreError> {
        let (found, _) = self.find_project_row(id).await?;
        let result = self.delete_project_rows(id, found.index).await;
        self.cache.invalidate(CacheTag::Projects);
        let deleted = result?;
        info!(project_id = %id, transactions = deleted, "project deleted");
        Ok(deleted)
    }

    async fn delete_project_rows(&self, id: &ProjectId, project_index: usize) -> Result<usize, StoreError> {
        self.backend
            .delete_row(SheetName::Projects, project_index)
            .await?;
        let rows = self.backend.read_rows(SheetName::Transactions).await?;
        let mut doomed: Vec<usize> = rows
            .iter()
            .filter(|r| r.row.get("projectId").map(String::as_str) == Some(id.as_str()))
            .map(|r| r.index)
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        let mut deleted = 0;
        for index in doomed {
            if let Err(err) = self.backend.delete_row(SheetName::Transactions, index).await {
                warn!(project_id = %id, deleted, error = %err, "project delete stopped part way");
                return Err(err);
            }
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Stores a new transaction and remembers its item for the project.
    pub async fn add_transaction(
        &self,
        project_id: &ProjectId,
        data: TransactionData,
    ) -> Result<Transaction, StoreError> {
        let (found, mut project) = self.find_project_row(project_id).await?;
        let tx = Transaction {
            id: self.new_transaction_id()?,
            project_id: project_id.clone(),
            data,
        };
        let result = self.append_and_remember(&tx, &found, &mut project).await;
        self.cache.invalidate(CacheTag::Projects);
        result?;
        info!(project_id = %project_id, transaction_id = %tx.id, "transaction added");
        Ok(tx)
    }

    async fn append_and_remember(
        &self,
        tx: &Transaction,
        found: &IndexedRow,
        project: &mut Project,
    ) -> Result<(), StoreError> {
        self.backend
            .append_row(SheetName::Transactions, &encode_transaction_row(tx))
            .await?;
        if project.remember_item(tx.data.kind, &tx.data.item) {
            self.write_project(found, project).await?;
        }
        Ok(())
    }

    pub async fn update_transaction(&self, project_id: &ProjectId, tx: &Transaction) -> Result<(), StoreError> {
        let found = self.find_transaction_row(project_id, &tx.id).await?;
        let stored = Transaction {
            id: tx.id.clone(),
            project_id: project_id.clone(),
            data: tx.data.clone(),
        };
        let result = self.update_and_remember(project_id, &found, &stored).await;
        self.cache.invalidate(CacheTag::Projects);
        result?;
        info!(project_id = %project_id, transaction_id = %tx.id, "transaction updated");
        Ok(())
    }

    async fn update_and_remember(
        &self,
        project_id: &ProjectId,
        found: &IndexedRow,
        tx: &Transaction,
    ) -> Result<(), StoreError> {
        self.backend
            .update_row(
                SheetName::Transactions,
                found.index,
                &merged(&found.row, encode_transaction_row(tx)),
            )
            .await?;
        match self.find_project_row(project_id).await {
            Ok((project_row, mut project)) => {
                if project.remember_item(tx.data.kind, &tx.data.item) {
                    self.write_project(&project_row, &project).await?;
                }
                Ok(())
            }
            Err(err) if err.code == StoreErrorCode::ProjectNotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub async fn delete_transaction(
        &self,
        project_id: &ProjectId,
        transaction_id: &TransactionId,
    ) -> Result<(), StoreError> {
        let found = self.find_transaction_row(project_id, transaction_id).await?;
        let result = self
            .backend
            .delete_row(SheetName::Transactions, found.index)
            .await;
        self.cache.invalidate(CacheTag::Projects);
        result?;
        info!(project_id = %project_id, transaction_id = %transaction_id, "transaction deleted");
        Ok(())
    }

    pub async fn delete_common_item(
        &self,
        project_id: &ProjectId,
        kind: TransactionKind,
        item: &str,
    ) -> Result<(), StoreError> {
        let (found, mut project) = self.find_project_row(project_id).await?;
        project.common_items_mut(kind).retain(|existing| existing != item);
        self.write_project(&found, &project).await
    }

    pub async fn clear_common_items(&self, project_id: &ProjectId, kind: TransactionKind) -> Result<(), StoreError> {
        let (found, mut project) = self.find_project_row(project_id).await?;
        project.common_items_mut(kind).clear();
        self.write_project(&found, &project).await
    }

    fn new_project_id(&self) -> Result<ProjectId, StoreError> {
        ProjectId::parse(self.ids.next_id())
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))
    }

    fn new_transaction_id(&self) -> Result<TransactionId, StoreError> {
        TransactionId::parse(self.ids.next_id())
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))
    }

    /// Reads straight from the backend; writes must not act on a cached listing.
    async fn find_project_row(&self, id: &ProjectId) -> Result<(IndexedRow, Project), StoreError> {
        let rows = self.backend.read_rows(SheetName::Projects).await?;
        let found = rows
            .into_iter()
            .find(|r| !is_admin_config_row(&r.row) && row_id(&r.row) == Some(id.as_str()))
            .ok_or_else(project_not_found)?;
        let project = decode_project_row(&found.row)?;
        Ok((found, project))
    }

    async fn find_transaction_row(
        &self,
        project_id: &ProjectId,
        transaction_id: &TransactionId,
    ) -> Result<IndexedRow, StoreError> {
        let rows = self.backend.read_rows(SheetName::Transactions).await?;
        rows.into_iter()
            .find(|r| {
                row_id(&r.row) == Some(transaction_id.as_str())
                    && r.row.get("projectId").map(String::as_str) == Some(project_id.as_str())
            })
            .ok_or_else(transaction_not_found)
    }

    async fn write_project(&self, found: &IndexedRow, project: &Project) -> Result<(), StoreError> {
        let result = self
            .backend
            .update_row(
                SheetName::Projects,
                found.index,
                &merged(&found.row, encode_project_row(project)),
            )
            .await;
        self.cache.invalidate(CacheTag::Projects);
        result
    }
}
