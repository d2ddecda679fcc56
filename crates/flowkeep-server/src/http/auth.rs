// SPDX-License-Identifier: Apache-2.0

use axum::http::HeaderMap;
use flowkeep_api::{ApiError, ApiErrorCode, HEADER_ADMIN_PASSCODE, HEADER_PROJECT_PASSCODE};
use flowkeep_model::messages::{ADMIN_PASSCODE_WRONG, PROJECT_NOT_FOUND, PROJECT_PASSCODE_WRONG};
use flowkeep_model::{Project, ProjectId};
use serde_json::json;
use tracing::warn;

use crate::http::response::store_error;
use crate::AppState;

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    ProjectId::parse(raw).map_err(|_| {
        ApiError::new(
            ApiErrorCode::ProjectNotFound,
            PROJECT_NOT_FOUND,
            json!({ "project_id": raw }),
            "req-unknown",
        )
    })
}

/// Compares `x-admin-passcode` with the stored admin passcode on every call.
pub(crate) async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(given) = header_value(headers, HEADER_ADMIN_PASSCODE) else {
        return Err(ApiError::unauthorized(ADMIN_PASSCODE_WRONG));
    };
    check_admin_passcode(state, given).await
}

pub(crate) async fn check_admin_passcode(state: &AppState, given: &str) -> Result<(), ApiError> {
    let stored = state.gateway.get_admin_passcode().await.map_err(store_error)?;
    if given == stored {
        Ok(())
    } else {
        warn!("admin passcode rejected");
        Err(ApiError::unauthorized(ADMIN_PASSCODE_WRONG))
    }
}

/// Loads a project and checks `given` against its passcode; the admin passcode
/// unlocks every project.
pub(crate) async fn unlock_project(
    state: &AppState,
    project_id: &ProjectId,
    given: Option<&str>,
) -> Result<Project, ApiError> {
    let project = state
        .gateway
        .get_project(project_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| {
            ApiError::new(
                ApiErrorCode::ProjectNotFound,
                PROJECT_NOT_FOUND,
                json!({ "project_id": project_id.as_str() }),
                "req-unknown",
            )
        })?;
    let Some(given) = given else {
        return Err(ApiError::unauthorized(PROJECT_PASSCODE_WRONG));
    };
    if given == project.passcode {
        return Ok(project);
    }
    match state.gateway.get_admin_passcode().await {
        Ok(admin) if admin == given => Ok(project),
        Ok(_) => {
            warn!(project_id = %project_id, "project passcode rejected");
            Err(ApiError::unauthorized(PROJECT_PASSCODE_WRONG))
        }
        Err(err) => {
            warn!(error = %err, "admin passcode unavailable while unlocking project");
            Err(ApiError::unauthorized(PROJECT_PASSCODE_WRONG))
        }
    }
}

pub(crate) async fn require_project(
    state: &AppState,
    headers: &HeaderMap,
    project_id: &ProjectId,
) -> Result<Project, ApiError> {
    unlock_project(state, project_id, header_value(headers, HEADER_PROJECT_PASSCODE)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_state, seed_project};
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn admin_header_must_match_stored_passcode() {
        let state = memory_state();
        state.gateway.set_admin_passcode("admin-123").await.expect("seed admin");

        let mut headers = HeaderMap::new();
        assert_eq!(
            require_admin(&state, &headers).await.map_err(|e| e.code),
            Err(ApiErrorCode::Unauthorized)
        );
        headers.insert(HEADER_ADMIN_PASSCODE, HeaderValue::from_static("nope"));
        assert!(require_admin(&state, &headers).await.is_err());
        headers.insert(HEADER_ADMIN_PASSCODE, HeaderValue::from_static("admin-123"));
        assert_eq!(require_admin(&state, &headers).await, Ok(()));
    }

    #[tokio::test]
    async fn admin_passcode_unlocks_any_project() {
        let state = memory_state();
        state.gateway.set_admin_passcode("admin-123").await.expect("seed admin");
        let project = seed_project(&state, "春季健行", "1234").await;

        let own = unlock_project(&state, &project.id, Some("1234")).await;
        assert_eq!(own.map(|p| p.name), Ok("春季健行".to_string()));
        assert!(unlock_project(&state, &project.id, Some("admin-123")).await.is_ok());
        let wrong = unlock_project(&state, &project.id, Some("9999")).await;
        assert_eq!(wrong.map_err(|e| e.message), Err(PROJECT_PASSCODE_WRONG.to_string()));
        assert!(unlock_project(&state, &project.id, None).await.is_err());
    }

    #[tokio::test]
    async fn unknown_project_is_not_found_before_auth() {
        let state = memory_state();
        let id = ProjectId::parse("missing").expect("id");
        let err = unlock_project(&state, &id, Some("1234")).await.expect_err("missing");
        assert_eq!(err.code, ApiErrorCode::ProjectNotFound);
    }
}
