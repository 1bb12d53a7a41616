//! Persisted session record.
//!
//! A single JSON document holds `{user, token, refreshToken, locale,
//! defaultPostVisibility}`. It is read once at startup and rewritten after
//! every mutation of those fields. Tokens are only accepted as a pair: a
//! record carrying one token without the other is treated as signed out.

use std::fs;
use std::path::{Path, PathBuf};

use memento_api_models::{PostVisibility, TokenPair, User};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

fn default_locale() -> String {
    "en".to_string()
}

/// On-disk shape of the session record.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    user: Option<User>,
    token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(default = "default_locale")]
    locale: String,
    #[serde(rename = "defaultPostVisibility", default)]
    default_post_visibility: PostVisibility,
}

impl SessionRecord {
    fn from_session(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            token: session.token.as_ref().map(|t| t.access_token.clone()),
            refresh_token: session.token.as_ref().map(|t| t.refresh_token.clone()),
            locale: session.locale.clone(),
            default_post_visibility: session.default_visibility,
        }
    }

    fn into_session(self) -> Session {
        let token = match (self.token, self.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(TokenPair {
                access_token,
                refresh_token,
            }),
            _ => None,
        };
        Session {
            user: self.user,
            token,
            locale: self.locale,
            default_visibility: self.default_post_visibility,
        }
    }
}

/// File-backed store for the session record.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the given file path. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session. A missing file yields a default,
    /// signed-out session; a corrupt file is an error.
    pub fn load(&self) -> ClientResult<Session> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Session::default());
            }
            Err(source) => {
                return Err(ClientError::Storage {
                    operation: "read session record",
                    source,
                });
            }
        };
        let record: SessionRecord =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { source })?;
        Ok(record.into_session())
    }

    /// Write the session record, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ClientError::Storage {
                operation: "create session directory",
                source,
            })?;
        }
        let record = SessionRecord::from_session(session);
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|source| ClientError::Decode { source })?;
        fs::write(&self.path, json).map_err(|source| ClientError::Storage {
            operation: "write session record",
            source,
        })
    }
}
