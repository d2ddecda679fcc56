// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use flowkeep_api::{
    AdminVerifyRequest, AdminVerifyResponse, ApiError, ChangeAdminPasscodeRequest,
    MessageResponse,
};
use flowkeep_model::check_admin_passcode_change;
use flowkeep_model::messages::ADMIN_PASSCODE_UPDATED;
use tracing::info;

use crate::http::auth::{check_admin_passcode, require_admin};
use crate::http::request_tracing::RequestTrace;
use crate::http::response::{json_ok, parse_body, store_error, HandlerResult};
use crate::AppState;

pub(crate) async fn verify_admin_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    body: Bytes,
) -> HandlerResult {
    let request: AdminVerifyRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    check_admin_passcode(&state, request.passcode.trim())
        .await
        .map_err(|e| trace.reject(e))?;
    Ok(json_ok(&AdminVerifyResponse { ok: true }))
}

pub(crate) async fn change_admin_passcode_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let request: ChangeAdminPasscodeRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let stored = state
        .gateway
        .get_admin_passcode()
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    let new_passcode = request.new_passcode.trim();
    check_admin_passcode_change(&stored, request.current_passcode.trim(), new_passcode)
        .map_err(|rejection| trace.reject(ApiError::validation_failed(rejection.message(), &[])))?;
    state
        .gateway
        .set_admin_passcode(new_passcode)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    info!("admin passcode changed");
    Ok(json_ok(&MessageResponse {
        message: ADMIN_PASSCODE_UPDATED.to_string(),
    }))
}
