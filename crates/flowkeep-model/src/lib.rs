// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Event ledger model: projects (events), their transactions and the rules
//! a save must satisfy.

mod ids;
pub mod messages;
mod project;
mod statistics;
mod transaction;
mod validation;

pub use ids::{ProjectId, TransactionId, ValidationError, ADMIN_CONFIG_ID, ID_MAX_LEN};
pub use project::{Project, ProjectData, ProjectListing, ProjectPatch};
pub use statistics::{ItemTotal, ProjectStatistics};
pub use transaction::{Transaction, TransactionData, TransactionKind, VoucherType};
pub use validation::{
    check_admin_passcode_change, check_project_fields, check_project_uniqueness,
    check_transaction, FieldError, PasscodeChangeRejection, ProjectConflict,
    ADMIN_PASSCODE_MIN_LEN, PROJECT_NAME_MAX_LEN,
    PROJECT_PASSCODE_MAX_LEN, PROJECT_PASSCODE_MIN_LEN,
};

pub const CRATE_NAME: &str = "flowkeep-model";
