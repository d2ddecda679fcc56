// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use flowkeep_fontcheck::{MissingFilePolicy, SUPPORTED_LIST_FILE, UNSUPPORTED_LIST_FILE};
use flowkeep_store::{RetryPolicy, DEFAULT_SHEETS_BASE_URL};
use serde::Serialize;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Where project and transaction rows live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreSelection {
    Memory,
    Local { root: PathBuf },
    Sheets,
}

impl StoreSelection {
    /// `memory`, `local:/path` or `sheets`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw == "memory" {
            return Ok(Self::Memory);
        }
        if raw == "sheets" {
            return Ok(Self::Sheets);
        }
        if let Some(path) = raw.strip_prefix("local:") {
            if path.trim().is_empty() {
                return Err("local store requires a path: local:/path".to_string());
            }
            return Ok(Self::Local {
                root: PathBuf::from(path.trim()),
            });
        }
        Err(format!(
            "unsupported store selection {raw}; use memory, local:/path, or sheets"
        ))
    }
}

/// Where the two character lists are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontListSelection {
    Files {
        supported_path: PathBuf,
        unsupported_path: PathBuf,
    },
    Http {
        base_url: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
    pub base_url: String,
    pub read_attempts: usize,
    pub read_backoff_ms: u64,
}

impl SheetsConfig {
    #[must_use]
    pub fn read_retry(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.read_attempts.max(1),
            base_backoff_ms: self.read_backoff_ms,
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            bearer_token: None,
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            read_attempts: 1,
            read_backoff_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub shutdown_drain: Duration,
    pub font_lists: FontListSelection,
    #[serde(serialize_with = "serialize_policy")]
    pub on_missing_font_file: MissingFilePolicy,
    pub store: StoreSelection,
    pub sheets: SheetsConfig,
    pub listing_cache_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_millis(10_000),
            shutdown_drain: Duration::from_millis(2_000),
            font_lists: FontListSelection::Files {
                supported_path: PathBuf::from("public").join(SUPPORTED_LIST_FILE),
                unsupported_path: PathBuf::from("public").join(UNSUPPORTED_LIST_FILE),
            },
            on_missing_font_file: MissingFilePolicy::Fallback,
            store: StoreSelection::Memory,
            sheets: SheetsConfig::default(),
            listing_cache_ttl: Some(Duration::from_millis(30_000)),
        }
    }
}

fn serialize_policy<S: serde::Serializer>(
    policy: &MissingFilePolicy,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(policy.as_str())
}

/// Listing cache TTL from a millisecond setting. `0` yields a zero TTL, which
/// never serves a cached listing; `None` is reserved for "until invalidated".
#[must_use]
pub fn listing_cache_ttl_from_ms(ms: u64) -> Option<Duration> {
    Some(Duration::from_millis(ms))
}

pub fn validate_startup_config(config: &ServerConfig) -> Result<(), String> {
    if config.bind_addr.trim().is_empty() {
        return Err("bind address must not be empty".to_string());
    }
    if config.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if config.request_timeout.is_zero() {
        return Err("request timeout must be > 0".to_string());
    }
    if let FontListSelection::Http { base_url } = &config.font_lists {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!("font list base url must be http(s): {base_url}"));
        }
    }
    if config.store == StoreSelection::Sheets {
        let missing = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if missing(&config.sheets.spreadsheet_id) || missing(&config.sheets.bearer_token) {
            return Err("sheets store requires GOOGLE_SHEET_ID and GOOGLE_SHEETS_BEARER".to_string());
        }
    }
    Ok(())
}
