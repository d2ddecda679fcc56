// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::charset::CharSet;
use crate::error::FontCheckError;
use crate::source::CharListSource;

/// Immutable view of both lists at one point in time.
#[derive(Debug, Clone)]
pub struct CharLists {
    pub supported: Arc<CharSet>,
    pub unsupported: Arc<CharSet>,
}

/// Process-wide character lists with an explicit `init`/`get`/`invalidate` lifecycle.
///
/// Concurrent cold reads serialize on the write lock, so a list is loaded once
/// per cold period. Appends are not locked against other processes.
pub struct FontCharCache {
    source: Arc<dyn CharListSource>,
    state: RwLock<Option<CharLists>>,
}

impl FontCharCache {
    #[must_use]
    pub fn new(source: Arc<dyn CharListSource>) -> Self {
        Self {
            source,
            state: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub async fn init(&self) -> Result<(), FontCheckError> {
        if self.state.read().await.is_some() {
            return Ok(());
        }
        let mut state = self.state.write().await;
        if state.is_some() {
            return Ok(());
        }
        let (supported, unsupported) = tokio::join!(
            self.source.load_supported(),
            self.source.load_unsupported()
        );
        let lists = CharLists {
            supported: Arc::new(supported?),
            unsupported: Arc::new(unsupported?),
        };
        info!(
            source = %self.source.describe(),
            supported = lists.supported.len(),
            unsupported = lists.unsupported.len(),
            "font character lists loaded"
        );
        *state = Some(lists);
        Ok(())
    }

    pub async fn get(&self) -> Result<CharLists, FontCheckError> {
        loop {
            if let Some(lists) = self.state.read().await.as_ref() {
                return Ok(lists.clone());
            }
            self.init().await?;
        }
    }

    pub async fn invalidate(&self) {
        *self.state.write().await = None;
        info!("font character lists invalidated");
    }

    /// Re-reads only the unsupported list; a cold cache is fully initialised instead.
    pub async fn reload_unsupported(&self) -> Result<usize, FontCheckError> {
        let mut state = self.state.write().await;
        if state.is_none() {
            drop(state);
            return Ok(self.get().await?.unsupported.len());
        }
        let fresh = self.source.load_unsupported().await?;
        let count = fresh.len();
        if let Some(lists) = state.as_mut() {
            lists.unsupported = Arc::new(fresh);
        }
        Ok(count)
    }

    /// Persists newly discovered characters and adds them to the cached set.
    ///
    /// The in-memory set is updated even when the append fails; the error is
    /// returned for the caller to log.
    pub async fn record_unsupported(&self, chars: &[char]) -> Result<(), FontCheckError> {
        if chars.is_empty() {
            return Ok(());
        }
        self.insert_unsupported(chars).await?;
        self.source.append_unsupported(chars).await
    }

    /// Memory-only addition; returns how many characters were new.
    pub async fn add_unsupported(&self, chars: &[char]) -> Result<usize, FontCheckError> {
        let added = self.insert_unsupported(chars).await?;
        if added > 0 {
            warn!(added, "unsupported chars added manually, not persisted");
        }
        Ok(added)
    }

    pub async fn unsupported_chars(&self) -> Result<Vec<char>, FontCheckError> {
        Ok(self.get().await?.unsupported.sorted())
    }

    async fn insert_unsupported(&self, chars: &[char]) -> Result<usize, FontCheckError> {
        self.init().await?;
        let mut state = self.state.write().await;
        let Some(lists) = state.as_mut() else {
            return Ok(0);
        };
        let set = Arc::make_mut(&mut lists.unsupported);
        Ok(chars.iter().filter(|c| set.insert(**c)).count())
    }
}
