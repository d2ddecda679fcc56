// SPDX-License-Identifier: Apache-2.0

mod codes;
mod context;
mod model;

pub use codes::{ErrorCode, ERROR_CODES};
pub use context::{ErrorContext, ResultExt};
pub use model::{ExitCode, MachineError};
