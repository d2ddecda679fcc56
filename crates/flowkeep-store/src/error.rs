// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use flowkeep_core::{ErrorCode, ErrorContext};

use crate::codec::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotConfigured,
    AccessDenied,
    SheetNotFound,
    ProjectNotFound,
    TransactionNotFound,
    Codec,
    Network,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::AccessDenied => "access_denied",
            Self::SheetNotFound => "sheet_not_found",
            Self::ProjectNotFound => "project_not_found",
            Self::TransactionNotFound => "transaction_not_found",
            Self::Codec => "codec_error",
            Self::Network => "network_error",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }

    #[must_use]
    pub const fn as_error_code(self) -> ErrorCode {
        match self {
            Self::NotConfigured | Self::AccessDenied => ErrorCode::NotConfigured,
            Self::SheetNotFound => ErrorCode::SheetNotFound,
            Self::ProjectNotFound => ErrorCode::ProjectNotFound,
            Self::TransactionNotFound => ErrorCode::TransactionNotFound,
            Self::Network => ErrorCode::UpstreamUnavailable,
            Self::Codec | Self::Io | Self::Internal => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ErrorContext<std::io::Error>> for StoreError {
    fn from(err: ErrorContext<std::io::Error>) -> Self {
        Self::new(StoreErrorCode::Io, err.to_string())
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<CodecError> for StoreError {
    fn from(err: CodecError) -> Self {
        Self::new(StoreErrorCode::Codec, err.to_string())
    }
}
