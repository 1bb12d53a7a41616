//! Typed per-resource calls over the request pipeline.
//!
//! Layout mirrors the server's route groups: `posts`, `comments`, `users`,
//! `files`, `admin`. Everything funnels through [`crate::pipeline::Pipeline`],
//! so authentication, refresh, and error mapping behave identically for
//! every endpoint.

mod admin;
mod comments;
mod files;
mod posts;
mod users;

use std::sync::Arc;

use memento_api_models::{AuthResponse, User};

use crate::error::ClientResult;
use crate::events::EventBus;
use crate::pipeline::{ApiRequest, Pipeline};
use crate::session::SessionHandle;

pub use comments::UserCommentFeed;
pub use posts::PostFeed;

/// A file payload for multipart endpoints (attachments, avatars, icons).
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Name reported to the server.
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Client for the Memento REST API.
///
/// Cheap to clone; all clones share one pipeline, session, and event bus.
#[derive(Debug, Clone)]
pub struct MemoClient {
    pipeline: Arc<Pipeline>,
}

impl MemoClient {
    /// Client over an already constructed pipeline.
    #[must_use]
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Session handle shared with the pipeline.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        self.pipeline.session()
    }

    /// Event bus carrying session-expiry and toast events.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        self.pipeline.events()
    }

    pub(crate) fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Exchange username/password for a token pair and install it in the
    /// session.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let request = ApiRequest::post_form(
            "/api/user/login",
            vec![
                ("username", username.to_string()),
                ("password", password.to_string()),
            ],
        );
        let auth: AuthResponse = self.pipeline.get_json(&request).await?;
        self.install_auth(auth)
    }

    /// Register a new account. The server may require a captcha token when
    /// registration protection is enabled.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        captcha_token: Option<&str>,
    ) -> ClientResult<User> {
        let mut fields = vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ];
        if let Some(token) = captcha_token {
            fields.push(("captchaToken", token.to_string()));
        }
        let request = ApiRequest::post_form("/api/user/create", fields);
        let auth: AuthResponse = self.pipeline.get_json(&request).await?;
        self.install_auth(auth)
    }

    /// Drop the session locally. The server keeps no session state beyond
    /// the tokens, so no request is made.
    pub fn sign_out(&self) {
        self.session().clear();
        self.pipeline.persist_session();
    }

    fn install_auth(&self, auth: AuthResponse) -> ClientResult<User> {
        self.session().apply_login(auth.user.clone(), auth.token);
        self.pipeline.persist_session();
        Ok(auth.user)
    }
}
