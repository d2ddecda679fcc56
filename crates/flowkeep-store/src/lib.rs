// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Persistence gateway over a spreadsheet with a `Projects` and a
//! `Transactions` tab.

mod backend;
pub mod codec;
mod error;
mod gateway;
mod google_sheets;
mod local_fs;
mod retry;
mod tag_cache;

pub use backend::{IndexedRow, MemorySheetBackend, SheetBackend};
pub use codec::{CodecError, SheetName, SheetRow};
pub use error::{StoreError, StoreErrorCode};
pub use gateway::SheetsGateway;
pub use google_sheets::{GoogleSheetsBackend, GoogleSheetsConfig, DEFAULT_SHEETS_BASE_URL};
pub use local_fs::LocalFsSheetBackend;
pub use retry::{BackoffPolicy, RetryPolicy};
pub use tag_cache::{CacheTag, CachedValue, TagCache};

pub const CRATE_NAME: &str = "flowkeep-store";
