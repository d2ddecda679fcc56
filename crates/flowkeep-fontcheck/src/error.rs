// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontCheckError {
    /// Empty or whitespace-only text.
    InvalidInput,
    /// A character list could not be read and the policy forbids falling back.
    ListUnavailable { list: &'static str, reason: String },
    /// Writing newly discovered characters to the unsupported list failed.
    AppendFailed(String),
}

impl Display for FontCheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::ListUnavailable { list, reason } => {
                write!(f, "{list} character list unavailable: {reason}")
            }
            Self::AppendFailed(reason) => write!(f, "unsupported list append failed: {reason}"),
        }
    }
}

impl std::error::Error for FontCheckError {}
