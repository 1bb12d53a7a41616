//! Session state shared between the request pipeline and the hosting UI.
//!
//! The session is an explicitly constructed value behind a cloneable handle,
//! injected into whatever needs it. Tokens live in a single [`TokenPair`], so
//! readers can never observe a new access token paired with an old refresh
//! token: the pair is swapped or cleared as one unit under one lock.

use std::sync::{Arc, Mutex, MutexGuard};

use memento_api_models::{PostVisibility, TokenPair, User};

/// In-memory session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Profile of the signed-in user, if any.
    pub user: Option<User>,
    /// Current credential pair, if signed in.
    pub token: Option<TokenPair>,
    /// UI locale tag.
    pub locale: String,
    /// Visibility preselected when composing a post.
    pub default_visibility: PostVisibility,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            locale: "en".to_string(),
            default_visibility: PostVisibility::default(),
        }
    }
}

impl Session {
    /// Whether the session holds a credential pair.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Cloneable, thread-safe handle to the process-wide session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    /// Wrap an existing session, typically loaded from storage at startup.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Copy of the current session state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Current access token, if signed in.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().token.as_ref().map(|t| t.access_token.clone())
    }

    /// Current refresh token, if signed in.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().token.as_ref().map(|t| t.refresh_token.clone())
    }

    /// Whether the session holds a credential pair.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Install the user and credential pair issued by login or registration.
    pub fn apply_login(&self, user: User, token: TokenPair) {
        let mut session = self.lock();
        session.user = Some(user);
        session.token = Some(token);
    }

    /// Swap in a freshly rotated credential pair.
    pub fn replace_tokens(&self, token: TokenPair) {
        self.lock().token = Some(token);
    }

    /// Replace the stored user profile, e.g. after a profile edit.
    pub fn set_user(&self, user: User) {
        self.lock().user = Some(user);
    }

    /// Update the UI locale.
    pub fn set_locale(&self, locale: impl Into<String>) {
        self.lock().locale = locale.into();
    }

    /// Update the default post visibility preference.
    pub fn set_default_visibility(&self, visibility: PostVisibility) {
        self.lock().default_visibility = visibility;
    }

    /// Sign out: drop the user and both tokens together. Preferences are
    /// kept so they survive re-login.
    pub fn clear(&self) {
        let mut session = self.lock();
        session.user = None;
        session.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(name: &str) -> User {
        User {
            username: name.to_string(),
            nickname: name.to_string(),
            bio: String::new(),
            total_liked: 0,
            total_comment: 0,
            total_posts: 0,
            total_files: 0,
            total_follower: 0,
            total_follows: 0,
            registered_at: Utc::now(),
            avatar: String::new(),
            is_followed: false,
            is_admin: false,
        }
    }

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn login_installs_user_and_token_pair() {
        let handle = SessionHandle::default();
        assert!(!handle.is_authenticated());

        handle.apply_login(sample_user("ada"), pair("a1", "r1"));
        assert!(handle.is_authenticated());
        assert_eq!(handle.access_token().as_deref(), Some("a1"));
        assert_eq!(handle.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn token_swap_is_observed_as_a_complete_pair() {
        let handle = SessionHandle::default();
        handle.apply_login(sample_user("ada"), pair("a1", "r1"));
        handle.replace_tokens(pair("a2", "r2"));

        let snapshot = handle.snapshot();
        let token = snapshot.token.expect("pair present");
        assert_eq!(
            (token.access_token.as_str(), token.refresh_token.as_str()),
            ("a2", "r2"),
        );
    }

    #[test]
    fn clear_drops_both_tokens_and_keeps_preferences() {
        let handle = SessionHandle::default();
        handle.set_locale("de");
        handle.apply_login(sample_user("ada"), pair("a1", "r1"));
        handle.clear();

        let snapshot = handle.snapshot();
        assert!(snapshot.user.is_none());
        assert!(snapshot.token.is_none());
        assert_eq!(snapshot.locale, "de");
    }

    #[test]
    fn clones_share_state() {
        let handle = SessionHandle::default();
        let other = handle.clone();
        handle.apply_login(sample_user("ada"), pair("a1", "r1"));
        assert!(other.is_authenticated());
    }
}
