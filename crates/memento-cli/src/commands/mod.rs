//! Command handlers grouped by resource.

use anyhow::anyhow;
use memento_client::PageLoader;

use crate::client::{CliError, CliResult};

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod files;
pub(crate) mod posts;
pub(crate) mod users;

/// Walk a page loader for up to `pages` pages and return the accumulated
/// items. Stops early at exhaustion; an unadvanced cursor means the fetch
/// failed, which becomes an error instead of a silently short listing.
pub(crate) async fn drain_pages<T: Clone + Send>(
    loader: &PageLoader<T>,
    pages: u32,
) -> CliResult<Vec<T>> {
    for _ in 0..pages {
        let before = loader.next_page();
        if !loader.load_more().await {
            break;
        }
        if loader.next_page() == before {
            return Err(CliError::failure(anyhow!("failed to load page {before}")));
        }
    }
    Ok(loader.items())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::Arc;

    use httpmock::MockServer;
    use memento_api_models::TokenPair;
    use memento_client::{
        EventBus, MemoClient, Pipeline, PipelineConfig, SessionHandle, SessionStore,
    };

    use crate::cli::OutputFormat;
    use crate::client::AppContext;

    pub(crate) fn context_for(server: &MockServer, session_file: &Path) -> AppContext {
        let config = PipelineConfig::new(server.base_url().parse().expect("valid URL"));
        let store = SessionStore::new(session_file.to_path_buf());
        let pipeline = Pipeline::new(
            config,
            SessionHandle::default(),
            Some(store),
            EventBus::new(),
        )
        .expect("pipeline builds");
        AppContext {
            client: MemoClient::new(Arc::new(pipeline)),
            output: OutputFormat::Table,
        }
    }

    pub(crate) fn signed_in_context_for(server: &MockServer, session_file: &Path) -> AppContext {
        let ctx = context_for(server, session_file);
        ctx.client.session().replace_tokens(TokenPair {
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
        });
        ctx
    }

    pub(crate) fn user_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "Username": name,
            "Nickname": name,
            "Bio": "",
            "TotalLiked": 0,
            "TotalComment": 0,
            "TotalPosts": 0,
            "RegisteredAt": "2024-01-15T09:30:00Z"
        })
    }
}
