// SPDX-License-Identifier: Apache-2.0

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::http::{admin, fonts, handlers, projects, transactions};
use crate::middleware::request_tracing::request_tracing_middleware;
use crate::middleware::timeout::timeout_middleware;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/v1/openapi.json", get(handlers::openapi_handler))
        .route("/api/validate-font", post(handlers::validate_font_handler))
        .route("/v1/admin/verify", post(admin::verify_admin_handler))
        .route("/v1/admin/passcode", post(admin::change_admin_passcode_handler))
        .route(
            "/v1/projects",
            get(projects::list_projects_handler).post(projects::create_project_handler),
        )
        .route("/v1/projects/directory", get(projects::directory_handler))
        .route(
            "/v1/projects/:project_id",
            get(projects::project_detail_handler)
                .put(projects::update_project_handler)
                .delete(projects::delete_project_handler),
        )
        .route(
            "/v1/projects/:project_id/unlock",
            post(projects::unlock_project_handler),
        )
        .route(
            "/v1/projects/:project_id/statistics",
            get(projects::project_statistics_handler),
        )
        .route(
            "/v1/projects/:project_id/export.xlsx",
            get(projects::export_project_handler),
        )
        .route(
            "/v1/projects/:project_id/transactions",
            post(transactions::create_transaction_handler),
        )
        .route(
            "/v1/projects/:project_id/transactions/:transaction_id",
            put(transactions::update_transaction_handler)
                .delete(transactions::delete_transaction_handler),
        )
        .route(
            "/v1/projects/:project_id/common-items/:kind",
            delete(transactions::clear_common_items_handler),
        )
        .route(
            "/v1/projects/:project_id/common-items/:kind/:item",
            delete(transactions::delete_common_item_handler),
        )
        .route(
            "/v1/fonts/unsupported",
            get(fonts::list_unsupported_handler).post(fonts::add_unsupported_handler),
        )
        .route(
            "/v1/fonts/unsupported/reload",
            post(fonts::reload_unsupported_handler),
        )
        .route(
            "/v1/fonts/cache/invalidate",
            post(fonts::invalidate_font_cache_handler),
        )
        .layer(from_fn_with_state(state.clone(), timeout_middleware))
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
