// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use flowkeep_core::ENV_FLOWKEEP_LOG_JSON;
use flowkeep_fontcheck::{MissingFilePolicy, SUPPORTED_LIST_FILE, UNSUPPORTED_LIST_FILE};
use flowkeep_server::{
    build_router, listing_cache_ttl_from_ms, validate_startup_config, AppState, FontListSelection, ServerConfig,
    SheetsConfig, StoreSelection, CONFIG_SCHEMA_VERSION,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn config_from_env() -> Result<ServerConfig, String> {
    let defaults = ServerConfig::default();
    let font_lists = match env_non_empty("FLOWKEEP_FONT_LISTS_BASE_URL") {
        Some(base_url) => FontListSelection::Http { base_url },
        None => FontListSelection::Files {
            supported_path: env_non_empty("FLOWKEEP_SUPPORTED_CHARS_PATH")
                .map_or_else(|| PathBuf::from("public").join(SUPPORTED_LIST_FILE), PathBuf::from),
            unsupported_path: env_non_empty("FLOWKEEP_UNSUPPORTED_CHARS_PATH")
                .map_or_else(|| PathBuf::from("public").join(UNSUPPORTED_LIST_FILE), PathBuf::from),
        },
    };
    let on_missing_font_file = match env_non_empty("FLOWKEEP_ON_MISSING_FONT_FILE") {
        Some(raw) => MissingFilePolicy::parse(&raw)?,
        None => MissingFilePolicy::Fallback,
    };
    let store = match env_non_empty("FLOWKEEP_STORE") {
        Some(raw) => StoreSelection::parse(&raw)?,
        None => StoreSelection::Memory,
    };
    let listing_ttl_ms = env_u64("FLOWKEEP_LISTING_CACHE_TTL_MS", 30_000);
    Ok(ServerConfig {
        bind_addr: env::var("FLOWKEEP_BIND").unwrap_or(defaults.bind_addr),
        max_body_bytes: env_usize("FLOWKEEP_MAX_BODY_BYTES", defaults.max_body_bytes),
        request_timeout: env_duration_ms("FLOWKEEP_REQUEST_TIMEOUT_MS", 10_000),
        shutdown_drain: env_duration_ms("FLOWKEEP_SHUTDOWN_DRAIN_MS", 2_000),
        font_lists,
        on_missing_font_file,
        store,
        sheets: SheetsConfig {
            spreadsheet_id: env_non_empty("GOOGLE_SHEET_ID"),
            bearer_token: env_non_empty("GOOGLE_SHEETS_BEARER"),
            base_url: env_non_empty("FLOWKEEP_SHEETS_BASE_URL")
                .unwrap_or(defaults.sheets.base_url),
            read_attempts: env_usize("FLOWKEEP_SHEETS_READ_ATTEMPTS", 1),
            read_backoff_ms: env_u64("FLOWKEEP_SHEETS_READ_BACKOFF_MS", 200),
        },
        listing_cache_ttl: listing_cache_ttl_from_ms(listing_ttl_ms),
    })
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "signal registration failed, falling back to ctrl_c");
            }
        }
    }
    let _ = tokio::signal::ctrl_c().await;
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool(ENV_FLOWKEEP_LOG_JSON, true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();
    let config = config_from_env()?;
    validate_startup_config(&config)?;
    info!(
        schema_version = CONFIG_SCHEMA_VERSION,
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "startup config"
    );
    let bind_addr = config.bind_addr.clone();
    let drain = config.shutdown_drain;
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    info!("flowkeep-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!(drain_ms = drain.as_millis() as u64, "shutdown requested, draining");
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
