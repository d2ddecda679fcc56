// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use flowkeep_api::{AddUnsupportedCharsRequest, MessageResponse, UnsupportedCharsResponse};
use flowkeep_fontcheck::unique_units;
use tracing::info;

use crate::http::auth::require_admin;
use crate::http::request_tracing::RequestTrace;
use crate::http::response::{font_error, json_ok, parse_body, HandlerResult};
use crate::AppState;

async fn unsupported_listing(
    state: &AppState,
    trace: &RequestTrace,
    added: Option<usize>,
) -> HandlerResult {
    let chars = state
        .validator
        .cache()
        .unsupported_chars()
        .await
        .map_err(|e| trace.reject(font_error(&e)))?;
    Ok(json_ok(&UnsupportedCharsResponse {
        chars: chars.iter().map(char::to_string).collect(),
        added,
    }))
}

pub(crate) async fn list_unsupported_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    unsupported_listing(&state, &trace, None).await
}

/// Adds characters to the in-memory unsupported set only; the list files are untouched.
pub(crate) async fn add_unsupported_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let request: AddUnsupportedCharsRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let chars = unique_units(&request.chars);
    let added = state
        .validator
        .cache()
        .add_unsupported(&chars)
        .await
        .map_err(|e| trace.reject(font_error(&e)))?;
    unsupported_listing(&state, &trace, Some(added)).await
}

pub(crate) async fn invalidate_font_cache_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    state.validator.cache().invalidate().await;
    Ok(json_ok(&MessageResponse {
        message: "font character lists will reload on next use".to_string(),
    }))
}

/// Re-reads the unsupported list from its source, keeping the supported set.
pub(crate) async fn reload_unsupported_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let count = state
        .validator
        .cache()
        .reload_unsupported()
        .await
        .map_err(|e| trace.reject(font_error(&e)))?;
    info!(count, "unsupported list reloaded");
    unsupported_listing(&state, &trace, None).await
}
