// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use flowkeep_api::{ApiError, HEADER_REQUEST_ID};

use crate::http::response::ApiFailure;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    pub request_id: String,
}

impl RequestTrace {
    /// Stamps the request id onto an error on its way out.
    #[must_use]
    pub(crate) fn reject(&self, error: ApiError) -> ApiFailure {
        ApiFailure(error.with_request_id(self.request_id.clone()))
    }
}

#[must_use]
pub(crate) fn extract_request_trace(headers: &HeaderMap, state: &AppState) -> RequestTrace {
    let request_id = headers
        .get(HEADER_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{id:016x}")
        });
    RequestTrace { request_id }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestTrace {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestTrace>()
            .cloned()
            .unwrap_or_else(|| RequestTrace {
                request_id: "req-unknown".to_string(),
            }))
    }
}
