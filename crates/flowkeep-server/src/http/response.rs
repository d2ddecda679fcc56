// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flowkeep_api::error_mapping::map_error;
use flowkeep_api::{ApiError, ApiErrorCode};
use flowkeep_fontcheck::FontCheckError;
use flowkeep_store::StoreError;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, warn};

/// `{"error": ApiError}` with the status assigned by the error mapping.
#[derive(Debug)]
pub(crate) struct ApiFailure(pub ApiError);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(map_error(&self.0).status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = %self.0.code, message = %self.0.message, "request failed");
        }
        (status, Json(json!({ "error": self.0 }))).into_response()
    }
}

pub(crate) type HandlerResult = Result<Response, ApiFailure>;

#[must_use]
pub(crate) fn store_error(err: StoreError) -> ApiError {
    let code = ApiErrorCode::from(err.code.as_error_code());
    ApiError::new(
        code,
        err.message,
        json!({ "store_code": err.code.as_str() }),
        "req-unknown",
    )
}

#[must_use]
pub(crate) fn font_error(err: &FontCheckError) -> ApiError {
    match err {
        FontCheckError::InvalidInput => ApiError::invalid_input(err.to_string()),
        FontCheckError::ListUnavailable { list, .. } => {
            warn!(error = %err, "character list unavailable");
            ApiError::new(
                ApiErrorCode::NotConfigured,
                err.to_string(),
                json!({ "list": list }),
                "req-unknown",
            )
        }
        _ => ApiError::internal(err.to_string()),
    }
}

/// Decodes a JSON request body, answering malformed input with `InvalidInput`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            ApiErrorCode::InvalidInput,
            "invalid request body",
            json!({ "reason": e.to_string() }),
            "req-unknown",
        )
    })
}

pub(crate) fn json_ok<T: serde::Serialize>(body: &T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) fn json_created<T: serde::Serialize>(body: &T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}
