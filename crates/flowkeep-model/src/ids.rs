// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Row id of the sentinel line in the projects sheet that stores the admin passcode.
pub const ADMIN_CONFIG_ID: &str = "__ADMIN_CONFIG__";

pub const ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

fn validate_id(kind: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError(format!("{kind} must not be empty")));
    }
    if value.chars().count() > ID_MAX_LEN {
        return Err(ValidationError(format!(
            "{kind} exceeds max length {ID_MAX_LEN}"
        )));
    }
    if value.chars().any(|c| c == ',' || c.is_control() || c.is_whitespace()) {
        return Err(ValidationError(format!(
            "{kind} must not contain commas, whitespace or control characters"
        )));
    }
    Ok(())
}

macro_rules! opaque_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                validate_id($kind, &value)?;
                Ok(Self(value))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, ValidationError> {
                Self::parse(value)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, ValidationError> {
                Self::parse(s)
            }
        }
    };
}

opaque_id!(ProjectId, "project id");
opaque_id!(TransactionId, "transaction id");

impl ProjectId {
    #[must_use]
    pub fn is_admin_sentinel(&self) -> bool {
        self.0 == ADMIN_CONFIG_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_empty_commas_and_whitespace() {
        assert!(ProjectId::parse("").is_err());
        assert!(ProjectId::parse("a,b").is_err());
        assert!(TransactionId::parse("a b").is_err());
        assert!(TransactionId::parse("x".repeat(ID_MAX_LEN + 1)).is_err());
        assert_eq!(
            ProjectId::parse("1718000000000abc1234").expect("id").as_str(),
            "1718000000000abc1234"
        );
    }

    #[test]
    fn sentinel_is_recognised() {
        assert!(ProjectId::parse(ADMIN_CONFIG_ID)
            .expect("sentinel id")
            .is_admin_sentinel());
    }
}
