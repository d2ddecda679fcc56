// SPDX-License-Identifier: Apache-2.0

use flowkeep_model::{Project, ProjectId, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LEGACY_INVALID_INPUT: &str = "Invalid input";
pub const LEGACY_INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateFontRequest {
    pub text: String,
}

/// Accepts only a JSON object whose `text` is a non-empty string.
pub fn parse_validate_font_request(body: &[u8]) -> Result<ValidateFontRequest, LegacyErrorBody> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| LegacyErrorBody::new(LEGACY_INVALID_INPUT))?;
    match value.get("text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(ValidateFontRequest {
            text: text.to_string(),
        }),
        _ => Err(LegacyErrorBody::new(LEGACY_INVALID_INPUT)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateFontResponse {
    pub is_supported: bool,
    pub unsupported_chars: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error shape kept by the font endpoint for existing clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyErrorBody {
    pub error: String,
}

impl LegacyErrorBody {
    #[must_use]
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store_backend: String,
    pub font_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminVerifyRequest {
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminVerifyResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAdminPasscodeRequest {
    pub current_passcode: String,
    pub new_passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockProjectRequest {
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockProjectResponse {
    pub project_id: ProjectId,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProjectRequest {
    pub name: String,
    pub passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    pub confirm_passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectResponse {
    pub deleted_transactions: usize,
}

/// Admin listing row; the only view that exposes project passcodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummaryDto {
    pub id: ProjectId,
    pub name: String,
    pub passcode: String,
    pub use_kiwi_maru: bool,
    pub kiwi_maru_supported: bool,
    pub transaction_count: usize,
}

impl From<&Project> for ProjectSummaryDto {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            passcode: project.passcode.clone(),
            use_kiwi_maru: project.use_kiwi_maru,
            kiwi_maru_supported: project.kiwi_maru_supported,
            transaction_count: project.transactions.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProjectResponse {
    pub project: ProjectSummaryDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_warning: Option<String>,
}

/// Project page payload: everything but the passcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailDto {
    pub id: ProjectId,
    pub name: String,
    pub use_kiwi_maru: bool,
    pub kiwi_maru_supported: bool,
    pub transactions: Vec<Transaction>,
    pub common_income_items: Vec<String>,
    pub common_expense_items: Vec<String>,
}

impl From<Project> for ProjectDetailDto {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            use_kiwi_maru: project.use_kiwi_maru,
            kiwi_maru_supported: project.kiwi_maru_supported,
            transactions: project.transactions,
            common_income_items: project.common_income_items,
            common_expense_items: project.common_expense_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUnsupportedCharsRequest {
    pub chars: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedCharsResponse {
    pub chars: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<usize>,
}
