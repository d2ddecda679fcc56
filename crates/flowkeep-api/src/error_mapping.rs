// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

pub const API_ERROR_SCHEMA_REF: &str = "#/components/schemas/ApiError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
    pub schema_ref: &'static str,
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::InvalidInput | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::Unauthorized => 401,
        ApiErrorCode::ProjectNotFound | ApiErrorCode::TransactionNotFound => 404,
        ApiErrorCode::DuplicateProjectName | ApiErrorCode::DuplicateProjectPasscode => 409,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::SheetNotFound
        | ApiErrorCode::NotConfigured
        | ApiErrorCode::UpstreamUnavailable => 503,
        ApiErrorCode::Timeout => 504,
        _ => 500,
    };

    ApiErrorMapping {
        status_code,
        schema_ref: API_ERROR_SCHEMA_REF,
    }
}
