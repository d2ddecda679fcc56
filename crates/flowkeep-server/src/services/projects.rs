// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use flowkeep_fontcheck::FontValidator;
use flowkeep_model::messages::{PROJECT_DELETE_PASSCODE_WRONG, PROJECT_NOT_FOUND};
use flowkeep_model::{
    check_project_fields, check_project_uniqueness, FieldError, Project, ProjectConflict,
    ProjectData, ProjectId, ProjectPatch,
};
use flowkeep_store::{SheetsGateway, StoreError, StoreErrorCode};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveProjectInput {
    pub name: String,
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    pub project: Project,
    /// Soft font warning; the save went through regardless.
    pub font_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectServiceError {
    Invalid(Vec<FieldError>),
    Conflict(ProjectConflict),
    WrongConfirmation,
    Store(StoreError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => match errors.first() {
                Some(first) => write!(f, "{}", first.message),
                None => write!(f, "invalid project"),
            },
            Self::Conflict(conflict) => f.write_str(conflict.message()),
            Self::WrongConfirmation => f.write_str(PROJECT_DELETE_PASSCODE_WRONG),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ProjectServiceError {}

impl From<StoreError> for ProjectServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

fn project_not_found() -> StoreError {
    StoreError::new(StoreErrorCode::ProjectNotFound, PROJECT_NOT_FOUND)
}

/// Creates (`editing = None`) or updates a project.
///
/// Blocking checks run in order: required fields and lengths, passcode differs
/// from the admin passcode, unique name, unique passcode. The font check runs
/// last and only sets the Kiwi Maru flags and a warning.
pub async fn save_project(
    gateway: &SheetsGateway,
    validator: &FontValidator,
    editing: Option<&ProjectId>,
    input: SaveProjectInput,
) -> Result<SavedProject, ProjectServiceError> {
    let (name, passcode) =
        check_project_fields(&input.name, &input.passcode).map_err(ProjectServiceError::Invalid)?;
    let admin_passcode = gateway.get_admin_passcode().await?;
    let projects = gateway.list_projects().await?;
    if let Some(id) = editing {
        if !projects.iter().any(|p| &p.id == id) {
            return Err(project_not_found().into());
        }
    }
    check_project_uniqueness(&name, &passcode, &admin_passcode, &projects, editing)
        .map_err(ProjectServiceError::Conflict)?;

    let verdict = validator.validate_event_name(&name).await;
    let font_warning = if verdict.is_valid {
        None
    } else {
        verdict.message.clone()
    };

    let project = match editing {
        Some(id) => {
            let patch = ProjectPatch {
                name: Some(name),
                passcode: Some(passcode),
                use_kiwi_maru: Some(verdict.is_valid),
                kiwi_maru_supported: Some(verdict.is_valid),
            };
            gateway.update_project(id, &patch).await?
        }
        None => {
            gateway
                .add_project(ProjectData {
                    name,
                    passcode,
                    use_kiwi_maru: verdict.is_valid,
                    kiwi_maru_supported: verdict.is_valid,
                    common_income_items: Vec::new(),
                    common_expense_items: Vec::new(),
                })
                .await?
        }
    };
    info!(
        project_id = %project.id,
        kiwi_maru = verdict.is_valid,
        created = editing.is_none(),
        "project saved"
    );
    Ok(SavedProject {
        project,
        font_warning,
    })
}

/// Deletes a project once the caller has retyped its passcode.
pub async fn delete_project(
    gateway: &SheetsGateway,
    project_id: &ProjectId,
    confirm_passcode: &str,
) -> Result<usize, ProjectServiceError> {
    let project = gateway
        .get_project(project_id)
        .await?
        .ok_or_else(project_not_found)?;
    if confirm_passcode.trim() != project.passcode {
        return Err(ProjectServiceError::WrongConfirmation);
    }
    Ok(gateway.delete_project(project_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_state, seed_project};
    use flowkeep_model::messages;

    fn input(name: &str, passcode: &str) -> SaveProjectInput {
        SaveProjectInput {
            name: name.to_string(),
            passcode: passcode.to_string(),
        }
    }

    #[tokio::test]
    async fn save_trims_and_sets_font_flags_from_verdict() {
        let state = memory_state();
        state.gateway.set_admin_passcode("admin-123").await.expect("admin");
        let saved = save_project(&state.gateway, &state.validator, None, input("  Spring  ", " 1234 "))
            .await
            .expect("saved");
        assert_eq!(saved.project.name, "Spring");
        assert_eq!(saved.project.passcode, "1234");
        assert!(saved.project.use_kiwi_maru);
        assert!(saved.project.kiwi_maru_supported);
        assert_eq!(saved.font_warning, None);
    }

    #[tokio::test]
    async fn unsupported_name_saves_with_warning() {
        let state = memory_state();
        state.gateway.set_admin_passcode("admin-123").await.expect("admin");
        let saved = save_project(&state.gateway, &state.validator, None, input("Trip 好", "1234"))
            .await
            .expect("saved despite warning");
        assert!(!saved.project.use_kiwi_maru);
        assert!(!saved.project.kiwi_maru_supported);
        let warning = saved.font_warning.expect("warning");
        assert!(warning.contains('好'));
    }

    #[tokio::test]
    async fn blocking_checks_run_in_order() {
        let state = memory_state();
        state.gateway.set_admin_passcode("adm1234").await.expect("admin");
        seed_project(&state, "Taken", "5555").await;

        let err = save_project(&state.gateway, &state.validator, None, input("", ""))
            .await
            .expect_err("empty");
        assert!(matches!(err, ProjectServiceError::Invalid(_)));
        assert_eq!(err.to_string(), messages::PROJECT_FIELDS_REQUIRED);

        let err = save_project(&state.gateway, &state.validator, None, input("x", "12"))
            .await
            .expect_err("short");
        assert_eq!(err.to_string(), messages::PROJECT_PASSCODE_LENGTH);

        let err = save_project(&state.gateway, &state.validator, None, input("x", "adm1234"))
            .await
            .expect_err("admin passcode");
        assert_eq!(err, ProjectServiceError::Conflict(ProjectConflict::PasscodeMatchesAdmin));

        let err = save_project(&state.gateway, &state.validator, None, input("taken ", "7777"))
            .await
            .expect_err("dup name");
        assert_eq!(err, ProjectServiceError::Conflict(ProjectConflict::DuplicateName));

        let err = save_project(&state.gateway, &state.validator, None, input("Other", "5555"))
            .await
            .expect_err("dup passcode");
        assert_eq!(err, ProjectServiceError::Conflict(ProjectConflict::DuplicatePasscode));
    }

    #[tokio::test]
    async fn editing_excludes_the_project_itself() {
        let state = memory_state();
        state.gateway.set_admin_passcode("admin-123").await.expect("admin");
        let project = seed_project(&state, "Taken", "5555").await;
        let saved = save_project(
            &state.gateway,
            &state.validator,
            Some(&project.id),
            input("Taken", "5555"),
        )
        .await
        .expect("same values are fine");
        assert_eq!(saved.project.id, project.id);
    }

    #[tokio::test]
    async fn delete_requires_matching_confirmation() {
        let state = memory_state();
        let project = seed_project(&state, "Gone", "5555").await;
        let err = delete_project(&state.gateway, &project.id, "0000")
            .await
            .expect_err("wrong");
        assert_eq!(err, ProjectServiceError::WrongConfirmation);
        assert_eq!(delete_project(&state.gateway, &project.id, "5555").await, Ok(0));
        assert_eq!(state.gateway.get_project(&project.id).await, Ok(None));
    }
}
