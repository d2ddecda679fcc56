// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCode {
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
    Internal,
}

pub const ERROR_CODES: &[ErrorCode] = &[
    ErrorCode::InvalidInput,
    ErrorCode::ValidationFailed,
    ErrorCode::DuplicateProjectName,
    ErrorCode::DuplicateProjectPasscode,
    ErrorCode::Unauthorized,
    ErrorCode::ProjectNotFound,
    ErrorCode::TransactionNotFound,
    ErrorCode::SheetNotFound,
    ErrorCode::NotConfigured,
    ErrorCode::UpstreamUnavailable,
    ErrorCode::Internal,
];

impl ErrorCode {
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
            Self::Internal => "Internal",
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> ExitCode {
        match self {
            Self::InvalidInput
            | Self::ValidationFailed
            | Self::DuplicateProjectName
            | Self::DuplicateProjectPasscode
            | Self::Unauthorized => ExitCode::Validation,
            Self::ProjectNotFound | Self::TransactionNotFound => ExitCode::Usage,
            Self::SheetNotFound | Self::NotConfigured | Self::UpstreamUnavailable => {
                ExitCode::DependencyFailure
            }
            Self::Internal => ExitCode::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
