//! CLI error split, client construction, and logging setup.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use memento_client::{
    ClientError, MemoClient, Pipeline, PipelineConfig, Session, SessionHandle, SessionStore,
};
use tracing_subscriber::EnvFilter;
use url::Url;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }

    /// Failure wrapper for local filesystem access in command handlers.
    pub(crate) fn file_access(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::failure(anyhow::anyhow!(
            "failed to access '{}': {err}",
            path.display()
        ))
    }
}

impl From<ClientError> for CliError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ServerRejected { message } | ClientError::InvalidRequest { message } => {
                Self::validation(message)
            }
            ClientError::Unauthorized => {
                Self::validation("not signed in (run `memento login` first)")
            }
            ClientError::RefreshFailed => {
                Self::validation("session expired; sign in again with `memento login`")
            }
            other => Self::failure(other),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: MemoClient,
    pub(crate) output: crate::cli::OutputFormat,
}

/// Construct a client over the persisted session, tagging every request
/// with the per-invocation trace id.
pub(crate) fn build_client(
    api_url: Url,
    session_file: PathBuf,
    timeout_secs: u64,
    trace_id: &str,
) -> CliResult<MemoClient> {
    let store = SessionStore::new(session_file);
    let session = match store.load() {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(
                path = %store.path().display(),
                error = %err,
                "discarding unreadable session file"
            );
            Session::default()
        }
    };

    let mut config = PipelineConfig::new(api_url);
    config.timeout = std::time::Duration::from_secs(timeout_secs);
    config.request_id = Some(trace_id.to_string());

    let pipeline = Pipeline::new(
        config,
        SessionHandle::new(session),
        Some(store),
        memento_client::EventBus::new(),
    )?;
    Ok(MemoClient::new(Arc::new(pipeline)))
}

/// Install the process-wide tracing subscriber. Diagnostic output goes to
/// stderr so stdout stays machine-readable under `--output json`.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env("MEMENTO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Resolve a password from a flag value or an interactive prompt.
pub(crate) fn resolve_password(flag: Option<String>, prompt: &str) -> CliResult<String> {
    if let Some(value) = flag {
        if value.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        let pass = rpassword::prompt_password(prompt)
            .map_err(|err| CliError::failure(anyhow::anyhow!("failed to read password: {err}")))?;
        if pass.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        Ok(pass)
    } else {
        Err(CliError::validation(
            "password required; supply via --password when running non-interactively",
        ))
    }
}
