// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use flowkeep_api::{ApiError, ApiErrorCode, MessageResponse};
use flowkeep_model::messages::TRANSACTION_NOT_FOUND;
use flowkeep_model::{
    check_transaction, Transaction, TransactionData, TransactionId, TransactionKind,
};
use serde_json::json;

use crate::http::auth::{parse_project_id, require_project};
use crate::http::request_tracing::RequestTrace;
use crate::http::response::{json_created, json_ok, parse_body, store_error, HandlerResult};
use crate::AppState;

fn parse_transaction_id(raw: &str) -> Result<TransactionId, ApiError> {
    TransactionId::parse(raw).map_err(|_| {
        ApiError::new(
            ApiErrorCode::TransactionNotFound,
            TRANSACTION_NOT_FOUND,
            json!({ "transaction_id": raw }),
            "req-unknown",
        )
    })
}

fn parse_kind(raw: &str) -> Result<TransactionKind, ApiError> {
    TransactionKind::parse(raw).map_err(|e| ApiError::invalid_input(e.to_string()))
}

fn checked_data(body: &[u8]) -> Result<TransactionData, ApiError> {
    let data: TransactionData = parse_body(body)?;
    let data = data.normalized();
    check_transaction(&data).map_err(|errors| {
        let message = errors
            .first()
            .map_or_else(|| "invalid transaction".to_string(), |e| e.message.clone());
        ApiError::validation_failed(message, &errors)
    })?;
    Ok(data)
}

pub(crate) async fn create_transaction_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    let data = checked_data(&body).map_err(|e| trace.reject(e))?;
    let tx = state
        .gateway
        .add_transaction(&project_id, data)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    Ok(json_created(&tx))
}

pub(crate) async fn update_transaction_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path((project_id, transaction_id)): Path<(String, String)>,
    body: Bytes,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let transaction_id = parse_transaction_id(&transaction_id).map_err(|e| trace.reject(e))?;
    require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    let data = checked_data(&body).map_err(|e| trace.reject(e))?;
    let tx = Transaction {
        id: transaction_id,
        project_id: project_id.clone(),
        data,
    };
    state
        .gateway
        .update_transaction(&project_id, &tx)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    Ok(json_ok(&tx))
}

pub(crate) async fn delete_transaction_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path((project_id, transaction_id)): Path<(String, String)>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let transaction_id = parse_transaction_id(&transaction_id).map_err(|e| trace.reject(e))?;
    require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    state
        .gateway
        .delete_transaction(&project_id, &transaction_id)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    Ok(json_ok(&MessageResponse {
        message: format!("transaction {transaction_id} deleted"),
    }))
}

async fn common_items_response(
    state: &AppState,
    trace: &RequestTrace,
    headers: &HeaderMap,
    project_id: &flowkeep_model::ProjectId,
    kind: TransactionKind,
) -> HandlerResult {
    let project = require_project(state, headers, project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    Ok(json_ok(&json!({
        "kind": kind,
        "items": project.common_items(kind),
    })))
}

pub(crate) async fn clear_common_items_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path((project_id, kind)): Path<(String, String)>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let kind = parse_kind(&kind).map_err(|e| trace.reject(e))?;
    require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    state
        .gateway
        .clear_common_items(&project_id, kind)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    common_items_response(&state, &trace, &headers, &project_id, kind).await
}

pub(crate) async fn delete_common_item_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path((project_id, kind, item)): Path<(String, String, String)>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let kind = parse_kind(&kind).map_err(|e| trace.reject(e))?;
    require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    state
        .gateway
        .delete_common_item(&project_id, kind, &item)
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    common_items_response(&state, &trace, &headers, &project_id, kind).await
}
