// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use flowkeep_core::TimeSeededIdGenerator;
use flowkeep_fontcheck::{CharListSource, FontCharCache, FontValidator, FsCharLists, HttpCharLists};
use flowkeep_store::{
    GoogleSheetsBackend, GoogleSheetsConfig, LocalFsSheetBackend, MemorySheetBackend,
    SheetBackend, SheetsGateway,
};
use tracing::info;

use crate::config::{FontListSelection, ServerConfig, StoreSelection};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<SheetsGateway>,
    pub validator: FontValidator,
    pub config: Arc<ServerConfig>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(gateway: Arc<SheetsGateway>, validator: FontValidator, config: ServerConfig) -> Self {
        Self {
            gateway,
            validator,
            config: Arc::new(config),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Wires the configured store backend and character list source.
    pub fn from_config(config: ServerConfig) -> Result<Self, String> {
        let backend = build_backend(&config)?;
        let source = build_char_lists(&config);
        let gateway = SheetsGateway::new(
            backend,
            Arc::new(TimeSeededIdGenerator::new()),
            config.listing_cache_ttl,
        );
        info!(
            store = gateway.backend_tag(),
            font_source = %source.describe(),
            "application state ready"
        );
        let validator = FontValidator::new(Arc::new(FontCharCache::new(source)));
        Ok(Self::new(Arc::new(gateway), validator, config))
    }
}

fn build_backend(config: &ServerConfig) -> Result<Arc<dyn SheetBackend>, String> {
    let backend: Arc<dyn SheetBackend> = match &config.store {
        StoreSelection::Memory => Arc::new(MemorySheetBackend::new()),
        StoreSelection::Local { root } => Arc::new(LocalFsSheetBackend::new(root.clone())),
        StoreSelection::Sheets => {
            let sheets = GoogleSheetsConfig {
                spreadsheet_id: config.sheets.spreadsheet_id.clone(),
                bearer_token: config.sheets.bearer_token.clone(),
                base_url: config.sheets.base_url.clone(),
                read_retry: config.sheets.read_retry(),
            };
            Arc::new(GoogleSheetsBackend::new(sheets).map_err(|e| e.to_string())?)
        }
    };
    Ok(backend)
}

fn build_char_lists(config: &ServerConfig) -> Arc<dyn CharListSource> {
    match &config.font_lists {
        FontListSelection::Files {
            supported_path,
            unsupported_path,
        } => Arc::new(FsCharLists::new(
            supported_path.clone(),
            unsupported_path.clone(),
            config.on_missing_font_file,
        )),
        FontListSelection::Http { base_url } => Arc::new(HttpCharLists::new(
            base_url.clone(),
            config.on_missing_font_file,
        )),
    }
}
