// SPDX-License-Identifier: Apache-2.0

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use flowkeep_api::{ApiError, ApiErrorCode};
use serde_json::json;
use tracing::warn;

use crate::http::request_tracing::RequestTrace;
use crate::AppState;

pub(crate) async fn timeout_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let trace = request.extensions().get::<RequestTrace>().cloned();
    let limit = state.config.request_timeout;
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "request timed out");
            let error = ApiError::new(
                ApiErrorCode::Timeout,
                "request timed out",
                json!({"timeout_ms": limit.as_millis() as u64}),
                "req-unknown",
            );
            match trace {
                Some(trace) => trace.reject(error).into_response(),
                None => crate::http::response::ApiFailure(error).into_response(),
            }
        }
    }
}
