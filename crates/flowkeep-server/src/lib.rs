// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! HTTP service for the event ledger: font validation, admin and project
//! flows over the spreadsheet gateway, and xlsx export.

mod config;
mod http;
mod middleware;
mod runtime;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{
    listing_cache_ttl_from_ms, validate_startup_config, FontListSelection, ServerConfig, SheetsConfig, StoreSelection,
    CONFIG_SCHEMA_VERSION,
};
pub use runtime::router::build_router;
pub use runtime::AppState;

pub const CRATE_NAME: &str = "flowkeep-server";
