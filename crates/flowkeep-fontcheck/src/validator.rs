// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::FontCharCache;
use crate::charset::unique_units;
use crate::error::FontCheckError;

pub const NAME_INVALID_INPUT: &str = "無效的輸入";
pub const NAME_VALIDATOR_UNAVAILABLE: &str = "字型驗證服務暫時不可用";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontCheckReason {
    FoundInUnsupportedList,
}

impl FontCheckReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FoundInUnsupportedList => "found_in_unsupported_list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCheck {
    pub is_supported: bool,
    pub unsupported_chars: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FontCheckReason>,
}

impl FontCheck {
    fn found_in_unsupported_list(c: char) -> Self {
        Self {
            is_supported: false,
            unsupported_chars: vec![c.to_string()],
            reason: Some(FontCheckReason::FoundInUnsupportedList),
        }
    }

    fn from_missing(missing: &[char]) -> Self {
        Self {
            is_supported: missing.is_empty(),
            unsupported_chars: missing.iter().map(char::to_string).collect(),
            reason: None,
        }
    }

    /// User-facing warning, `None` when the text is fully supported.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if self.is_supported {
            return None;
        }
        Some(format!(
            "以下字元不支援 Kiwi Maru 字型: {}",
            self.unsupported_chars.join(" ")
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameFontVerdict {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Authoritative server-side check against the cached character lists.
#[derive(Clone)]
pub struct FontValidator {
    cache: Arc<FontCharCache>,
}

impl FontValidator {
    #[must_use]
    pub fn new(cache: Arc<FontCharCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<FontCharCache> {
        &self.cache
    }

    pub async fn validate(&self, text: &str) -> Result<FontCheck, FontCheckError> {
        let units = unique_units(text);
        if units.is_empty() {
            return Err(FontCheckError::InvalidInput);
        }
        let lists = self.cache.get().await?;

        // Any known-bad character decides the whole text.
        if let Some(hit) = units.iter().copied().find(|c| lists.unsupported.contains(*c)) {
            debug!(char = %hit, "font check short-circuited on unsupported list");
            return Ok(FontCheck::found_in_unsupported_list(hit));
        }

        let missing: Vec<char> = units
            .into_iter()
            .filter(|c| !lists.supported.contains(*c))
            .collect();
        if !missing.is_empty() {
            if let Err(err) = self.cache.record_unsupported(&missing).await {
                warn!(error = %err, count = missing.len(), "failed to persist unsupported chars");
            }
        }
        Ok(FontCheck::from_missing(&missing))
    }

    /// Name check used by the project form; never blocks a save.
    pub async fn validate_event_name(&self, name: &str) -> NameFontVerdict {
        match self.validate(name).await {
            Ok(check) => NameFontVerdict {
                is_valid: check.is_supported,
                message: check.message(),
            },
            Err(FontCheckError::InvalidInput) => NameFontVerdict {
                is_valid: false,
                message: Some(NAME_INVALID_INPUT.to_string()),
            },
            Err(err) => {
                warn!(error = %err, "event name font check failed");
                NameFontVerdict {
                    is_valid: false,
                    message: Some(NAME_VALIDATOR_UNAVAILABLE.to_string()),
                }
            }
        }
    }
}
