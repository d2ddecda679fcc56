// SPDX-License-Identifier: Apache-2.0

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use flowkeep_api::HEADER_REQUEST_ID;
use tracing::Instrument;

use crate::http::request_tracing::extract_request_trace;
use crate::AppState;

pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let trace = extract_request_trace(request.headers(), &state);
    request.extensions_mut().insert(trace.clone());

    let span = tracing::info_span!(
        "http.request",
        request_id = %trace.request_id,
        method = %method,
        route = %route,
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "request completed");
    });
    if let Ok(value) = HeaderValue::from_str(&trace.request_id) {
        response.headers_mut().insert(HEADER_REQUEST_ID, value);
    }
    response
}
