// SPDX-License-Identifier: Apache-2.0

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use flowkeep_core::{ErrorContext, ResultExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::charset::CharSet;
use crate::error::FontCheckError;

pub const SUPPORTED_LIST_FILE: &str = "kiwi-maru-supported-chars.txt";
pub const UNSUPPORTED_LIST_FILE: &str = "kiwi-maru-unsupported-chars.txt";

fn append_failed(err: ErrorContext<std::io::Error>) -> FontCheckError {
    FontCheckError::AppendFailed(err.to_string())
}

/// What to do when a character list cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFilePolicy {
    /// Supported list falls back to ASCII alphanumerics; a missing unsupported
    /// list is created empty.
    #[default]
    Fallback,
    Error,
}

impl MissingFilePolicy {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown missing-file policy: {other}")),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Error => "error",
        }
    }
}

#[async_trait]
pub trait CharListSource: Send + Sync + 'static {
    async fn load_supported(&self) -> Result<CharSet, FontCheckError>;
    async fn load_unsupported(&self) -> Result<CharSet, FontCheckError>;
    async fn append_unsupported(&self, chars: &[char]) -> Result<(), FontCheckError>;
    fn describe(&self) -> String;
}

/// Both lists as flat UTF-8 files on local disk.
#[derive(Debug, Clone)]
pub struct FsCharLists {
    supported_path: PathBuf,
    unsupported_path: PathBuf,
    on_missing: MissingFilePolicy,
}

impl FsCharLists {
    #[must_use]
    pub fn new(
        supported_path: impl Into<PathBuf>,
        unsupported_path: impl Into<PathBuf>,
        on_missing: MissingFilePolicy,
    ) -> Self {
        Self {
            supported_path: supported_path.into(),
            unsupported_path: unsupported_path.into(),
            on_missing,
        }
    }

    /// Both files under one directory with their conventional names.
    #[must_use]
    pub fn in_dir(dir: &Path, on_missing: MissingFilePolicy) -> Self {
        Self::new(
            dir.join(SUPPORTED_LIST_FILE),
            dir.join(UNSUPPORTED_LIST_FILE),
            on_missing,
        )
    }

    #[must_use]
    pub fn unsupported_path(&self) -> &Path {
        &self.unsupported_path
    }
}

#[async_trait]
impl CharListSource for FsCharLists {
    async fn load_supported(&self) -> Result<CharSet, FontCheckError> {
        match tokio::fs::read_to_string(&self.supported_path).await {
            Ok(text) => Ok(CharSet::from_flat_text(&text)),
            Err(err) => match self.on_missing {
                MissingFilePolicy::Fallback => {
                    warn!(
                        path = %self.supported_path.display(),
                        error = %err,
                        "supported list unreadable, using alphanumeric fallback"
                    );
                    Ok(CharSet::fallback())
                }
                MissingFilePolicy::Error => Err(FontCheckError::ListUnavailable {
                    list: "supported",
                    reason: format!("{}: {err}", self.supported_path.display()),
                }),
            },
        }
    }

    async fn load_unsupported(&self) -> Result<CharSet, FontCheckError> {
        let err = match tokio::fs::read_to_string(&self.unsupported_path).await {
            Ok(text) => return Ok(CharSet::from_flat_text(&text)),
            Err(err) => err,
        };
        if self.on_missing == MissingFilePolicy::Error {
            return Err(FontCheckError::ListUnavailable {
                list: "unsupported",
                reason: format!("{}: {err}", self.unsupported_path.display()),
            });
        }
        if err.kind() == ErrorKind::NotFound {
            if let Some(parent) = self.unsupported_path.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(dir_err) = tokio::fs::create_dir_all(parent).await {
                        warn!(
                            path = %parent.display(),
                            error = %dir_err,
                            "could not create unsupported list directory"
                        );
                    }
                }
            }
            match tokio::fs::write(&self.unsupported_path, "").await {
                Ok(()) => info!(
                    path = %self.unsupported_path.display(),
                    "created empty unsupported list"
                ),
                Err(create_err) => warn!(
                    path = %self.unsupported_path.display(),
                    error = %create_err,
                    "could not create unsupported list"
                ),
            }
        } else {
            warn!(
                path = %self.unsupported_path.display(),
                error = %err,
                "unsupported list unreadable, starting empty"
            );
        }
        Ok(CharSet::new())
    }

    async fn append_unsupported(&self, chars: &[char]) -> Result<(), FontCheckError> {
        if chars.is_empty() {
            return Ok(());
        }
        let payload: String = chars.iter().collect();
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.unsupported_path)
            .await
            .with_context("open unsupported list")
            .map_err(append_failed)?;
        file.write_all(payload.as_bytes())
            .await
            .with_context("write unsupported chars")
            .map_err(append_failed)?;
        file.flush()
            .await
            .with_context("flush unsupported list")
            .map_err(append_failed)?;
        debug!(count = chars.len(), path = %self.unsupported_path.display(), "appended unsupported chars");
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "fs:{}|{}",
            self.supported_path.display(),
            self.unsupported_path.display()
        )
    }
}

/// Read-only lists published as static files over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCharLists {
    client: reqwest::Client,
    base_url: String,
    on_missing: MissingFilePolicy,
}

impl HttpCharLists {
    #[must_use]
    pub fn new(base_url: impl Into<String>, on_missing: MissingFilePolicy) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, on_missing)
    }

    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        on_missing: MissingFilePolicy,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            on_missing,
        }
    }

    fn list_url(&self, file: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("{}/{file}?t={millis}", self.base_url)
    }

    async fn fetch(&self, file: &str) -> Result<String, String> {
        let response = self
            .client
            .get(self.list_url(file))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("status {status}"));
        }
        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CharListSource for HttpCharLists {
    async fn load_supported(&self) -> Result<CharSet, FontCheckError> {
        match self.fetch(SUPPORTED_LIST_FILE).await {
            Ok(text) => Ok(CharSet::from_flat_text(&text)),
            Err(reason) => match self.on_missing {
                MissingFilePolicy::Fallback => {
                    warn!(base_url = %self.base_url, error = %reason, "supported list fetch failed, using fallback");
                    Ok(CharSet::fallback())
                }
                MissingFilePolicy::Error => Err(FontCheckError::ListUnavailable {
                    list: "supported",
                    reason,
                }),
            },
        }
    }

    async fn load_unsupported(&self) -> Result<CharSet, FontCheckError> {
        match self.fetch(UNSUPPORTED_LIST_FILE).await {
            Ok(text) => Ok(CharSet::from_flat_text(&text)),
            Err(reason) => {
                warn!(base_url = %self.base_url, error = %reason, "unsupported list fetch failed, starting empty");
                Ok(CharSet::new())
            }
        }
    }

    async fn append_unsupported(&self, chars: &[char]) -> Result<(), FontCheckError> {
        let discovered: String = chars.iter().collect();
        info!(chars = %discovered, "unsupported chars kept in memory only for remote lists");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }
}
