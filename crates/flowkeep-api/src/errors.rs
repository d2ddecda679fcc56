// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use flowkeep_core::ErrorCode;
use flowkeep_model::FieldError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidInput,
    ValidationFailed,
    DuplicateProjectName,
    DuplicateProjectPasscode,
    Unauthorized,
    ProjectNotFound,
    TransactionNotFound,
    SheetNotFound,
    NotConfigured,
    UpstreamUnavailable,
    PayloadTooLarge,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::ValidationFailed => "ValidationFailed",
            Self::DuplicateProjectName => "DuplicateProjectName",
            Self::DuplicateProjectPasscode => "DuplicateProjectPasscode",
            Self::Unauthorized => "Unauthorized",
            Self::ProjectNotFound => "ProjectNotFound",
            Self::TransactionNotFound => "TransactionNotFound",
            Self::SheetNotFound => "SheetNotFound",
            Self::NotConfigured => "NotConfigured",
            Self::UpstreamUnavailable => "UpstreamUnavailable",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::Timeout => "Timeout",
            Self::Internal => "Internal",
        }
    }
}

impl Display for ApiErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCode> for ApiErrorCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidInput => Self::InvalidInput,
            ErrorCode::ValidationFailed => Self::ValidationFailed,
            ErrorCode::DuplicateProjectName => Self::DuplicateProjectName,
            ErrorCode::DuplicateProjectPasscode => Self::DuplicateProjectPasscode,
            ErrorCode::Unauthorized => Self::Unauthorized,
            ErrorCode::ProjectNotFound => Self::ProjectNotFound,
            ErrorCode::TransactionNotFound => Self::TransactionNotFound,
            ErrorCode::SheetNotFound => Self::SheetNotFound,
            ErrorCode::NotConfigured => Self::NotConfigured,
            ErrorCode::UpstreamUnavailable => Self::UpstreamUnavailable,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidInput, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>, field_errors: &[FieldError]) -> Self {
        let fields: Vec<Value> = field_errors
            .iter()
            .map(|e| json!({"field": e.field, "message": e.message}))
            .collect();
        Self::new(
            ApiErrorCode::ValidationFailed,
            message,
            json!({ "field_errors": fields }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Unauthorized, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
