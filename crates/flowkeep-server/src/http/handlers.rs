// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flowkeep_api::{
    openapi_v1_spec, parse_validate_font_request, HealthResponse, LegacyErrorBody,
    ValidateFontResponse, LEGACY_INTERNAL_ERROR, LEGACY_INVALID_INPUT,
};
use flowkeep_fontcheck::FontCheckError;
use tracing::{error, info};

use crate::http::response::json_ok;
use crate::AppState;

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Response {
    json_ok(&HealthResponse {
        status: "ok".to_string(),
        store_backend: state.gateway.backend_tag().to_string(),
        font_source: state.validator.cache().source_description(),
    })
}

pub(crate) async fn openapi_handler() -> Response {
    json_ok(&openapi_v1_spec())
}

fn legacy_error(status: StatusCode, message: &str) -> Response {
    (status, Json(LegacyErrorBody::new(message))).into_response()
}

/// `POST /api/validate-font`. Errors keep the flat `{"error": "..."}` body.
pub(crate) async fn validate_font_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_validate_font_request(&body) {
        Ok(request) => request,
        Err(rejection) => return (StatusCode::BAD_REQUEST, Json(rejection)).into_response(),
    };
    match state.validator.validate(&request.text).await {
        Ok(check) => {
            info!(
                supported = check.is_supported,
                unsupported = check.unsupported_chars.len(),
                "font validated"
            );
            json_ok(&ValidateFontResponse {
                is_supported: check.is_supported,
                unsupported_chars: check.unsupported_chars,
                reason: check.reason.map(|r| r.as_str().to_string()),
            })
        }
        Err(FontCheckError::InvalidInput) => {
            legacy_error(StatusCode::BAD_REQUEST, LEGACY_INVALID_INPUT)
        }
        Err(err) => {
            error!(error = %err, "font validation failed");
            legacy_error(StatusCode::INTERNAL_SERVER_ERROR, LEGACY_INTERNAL_ERROR)
        }
    }
}
