// SPDX-License-Identifier: Apache-2.0

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use flowkeep_api::{
    ApiError, ApiErrorCode, DeleteProjectRequest, DeleteProjectResponse, ProjectDetailDto,
    ProjectSummaryDto, SaveProjectRequest, SaveProjectResponse, UnlockProjectRequest,
    UnlockProjectResponse,
};
use flowkeep_export::{export_project, XLSX_CONTENT_TYPE};
use flowkeep_model::{ProjectConflict, ProjectListing, ProjectStatistics};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::json;
use tracing::{error, info};

use crate::http::auth::{parse_project_id, require_admin, require_project, unlock_project};
use crate::http::request_tracing::RequestTrace;
use crate::http::response::{json_created, json_ok, parse_body, store_error, HandlerResult};
use crate::services::projects::{self, ProjectServiceError, SaveProjectInput};
use crate::AppState;

fn service_error(err: ProjectServiceError) -> ApiError {
    let message = err.to_string();
    match err {
        ProjectServiceError::Invalid(fields) => ApiError::validation_failed(message, &fields),
        ProjectServiceError::Conflict(ProjectConflict::PasscodeMatchesAdmin) => {
            ApiError::validation_failed(message, &[])
        }
        ProjectServiceError::Conflict(ProjectConflict::DuplicateName) => ApiError::new(
            ApiErrorCode::DuplicateProjectName,
            message,
            json!({}),
            "req-unknown",
        ),
        ProjectServiceError::Conflict(ProjectConflict::DuplicatePasscode) => ApiError::new(
            ApiErrorCode::DuplicateProjectPasscode,
            message,
            json!({}),
            "req-unknown",
        ),
        ProjectServiceError::WrongConfirmation => ApiError::unauthorized(message),
        ProjectServiceError::Store(err) => store_error(err),
    }
}

/// Public directory: ids, names and font flags only.
pub(crate) async fn directory_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
) -> HandlerResult {
    let projects = state
        .gateway
        .list_projects()
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    let listing: Vec<ProjectListing> = projects.iter().map(|p| p.listing()).collect();
    Ok(json_ok(&listing))
}

pub(crate) async fn list_projects_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let projects = state
        .gateway
        .list_projects()
        .await
        .map_err(|e| trace.reject(store_error(e)))?;
    let summaries: Vec<ProjectSummaryDto> = projects.iter().map(ProjectSummaryDto::from).collect();
    Ok(json_ok(&summaries))
}

pub(crate) async fn create_project_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let request: SaveProjectRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let saved = projects::save_project(
        &state.gateway,
        &state.validator,
        None,
        SaveProjectInput {
            name: request.name,
            passcode: request.passcode,
        },
    )
    .await
    .map_err(|e| trace.reject(service_error(e)))?;
    Ok(json_created(&SaveProjectResponse {
        project: ProjectSummaryDto::from(&saved.project),
        font_warning: saved.font_warning,
    }))
}

pub(crate) async fn update_project_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let request: SaveProjectRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let saved = projects::save_project(
        &state.gateway,
        &state.validator,
        Some(&project_id),
        SaveProjectInput {
            name: request.name,
            passcode: request.passcode,
        },
    )
    .await
    .map_err(|e| trace.reject(service_error(e)))?;
    Ok(json_ok(&SaveProjectResponse {
        project: ProjectSummaryDto::from(&saved.project),
        font_warning: saved.font_warning,
    }))
}

pub(crate) async fn delete_project_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    require_admin(&state, &headers)
        .await
        .map_err(|e| trace.reject(e))?;
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let request: DeleteProjectRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let deleted = projects::delete_project(&state.gateway, &project_id, &request.confirm_passcode)
        .await
        .map_err(|e| trace.reject(service_error(e)))?;
    Ok(json_ok(&DeleteProjectResponse {
        deleted_transactions: deleted,
    }))
}

pub(crate) async fn unlock_project_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    Path(project_id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let request: UnlockProjectRequest = parse_body(&body).map_err(|e| trace.reject(e))?;
    let project = unlock_project(&state, &project_id, Some(request.passcode.trim()))
        .await
        .map_err(|e| trace.reject(e))?;
    info!(project_id = %project.id, "project unlocked");
    Ok(json_ok(&UnlockProjectResponse {
        project_id: project.id,
        ok: true,
    }))
}

pub(crate) async fn project_detail_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let project = require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    Ok(json_ok(&ProjectDetailDto::from(project)))
}

pub(crate) async fn project_statistics_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let project = require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    Ok(json_ok(&ProjectStatistics::from_transactions(&project.transactions)))
}

/// RFC 6266 attachment header; the UTF-8 name goes in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

pub(crate) async fn export_project_handler(
    State(state): State<AppState>,
    trace: RequestTrace,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> HandlerResult {
    let project_id = parse_project_id(&project_id).map_err(|e| trace.reject(e))?;
    let project = require_project(&state, &headers, &project_id)
        .await
        .map_err(|e| trace.reject(e))?;
    let workbook = export_project(&project).map_err(|e| {
        error!(project_id = %project_id, error = %e, "xlsx export failed");
        trace.reject(ApiError::internal(e.to_string()))
    })?;
    info!(
        project_id = %project_id,
        rows = project.transactions.len(),
        bytes = workbook.bytes.len(),
        "project exported"
    );
    let mut response = (StatusCode::OK, Body::from(workbook.bytes)).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&workbook.file_name)) {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
