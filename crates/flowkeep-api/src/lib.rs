// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Wire contract of the FlowKeep HTTP API: request and response bodies, the
//! error envelope and the OpenAPI document.

mod dto;
pub mod error_mapping;
mod errors;
pub mod openapi;

pub use dto::{
    parse_validate_font_request, AddUnsupportedCharsRequest, AdminVerifyRequest,
    AdminVerifyResponse, ChangeAdminPasscodeRequest, DeleteProjectRequest,
    DeleteProjectResponse, HealthResponse, LegacyErrorBody, MessageResponse, ProjectDetailDto,
    ProjectSummaryDto, SaveProjectRequest, SaveProjectResponse, UnlockProjectRequest,
    UnlockProjectResponse, UnsupportedCharsResponse, ValidateFontRequest, ValidateFontResponse,
    LEGACY_INTERNAL_ERROR, LEGACY_INVALID_INPUT,
};
pub use errors::{ApiError, ApiErrorCode};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "flowkeep-api";

pub const HEADER_ADMIN_PASSCODE: &str = "x-admin-passcode";
pub const HEADER_PROJECT_PASSCODE: &str = "x-project-passcode";
pub const HEADER_REQUEST_ID: &str = "x-request-id";
