// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod errors;
pub mod ids;

pub use errors::{ErrorCode, ErrorContext, ExitCode, MachineError, ResultExt, ERROR_CODES};
pub use ids::{IdGenerator, SequentialIdGenerator, TimeSeededIdGenerator};

pub const CRATE_NAME: &str = "flowkeep-core";

pub const ENV_FLOWKEEP_LOG_JSON: &str = "FLOWKEEP_LOG_JSON";
