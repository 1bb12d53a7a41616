//! Comment listing, authoring, and reactions.

use std::sync::Arc;

use async_trait::async_trait;
use memento_api_models::{Comment, CommentPage, CommentWithPost, UserCommentPage};

use crate::error::ClientResult;
use crate::loader::{FetchPage, FetchedPage, PageLoader};
use crate::pipeline::ApiRequest;

use super::MemoClient;

/// Marker for the per-user comment listing, which joins each comment with
/// the post it was left on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCommentFeed {
    /// Comment author account name.
    pub username: String,
}

impl MemoClient {
    /// One page of a post's comments.
    pub async fn post_comments(&self, post_id: u64, page: u32) -> ClientResult<CommentPage> {
        let request = ApiRequest::get("/api/comment/postComments")
            .query("id", post_id.to_string())
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of a user's comments, each joined with its post.
    pub async fn user_comments(&self, username: &str, page: u32) -> ClientResult<UserCommentPage> {
        let request = ApiRequest::get("/api/comment/userComments")
            .query("username", username)
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// Leave a comment on a post.
    pub async fn create_comment(&self, post_id: u64, content: &str) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/comment/create",
            vec![
                ("id", post_id.to_string()),
                ("content", content.to_string()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Like a comment.
    pub async fn like_comment(&self, comment_id: u64) -> ClientResult<()> {
        let request =
            ApiRequest::post_form("/api/comment/like", vec![("id", comment_id.to_string())]);
        self.pipeline().execute(&request).await
    }

    /// Remove a like from a comment.
    pub async fn unlike_comment(&self, comment_id: u64) -> ClientResult<()> {
        let request =
            ApiRequest::post_form("/api/comment/unlike", vec![("id", comment_id.to_string())]);
        self.pipeline().execute(&request).await
    }

    /// Loader over one post's comments.
    #[must_use]
    pub fn comment_loader(&self, post_id: u64) -> PageLoader<Comment> {
        let source = PostCommentSource {
            client: self.clone(),
            post_id,
        };
        PageLoader::new(Arc::new(source), self.events().clone())
    }

    /// Loader over a user's comments joined with their posts.
    #[must_use]
    pub fn user_comment_loader(&self, feed: UserCommentFeed) -> PageLoader<CommentWithPost> {
        let source = UserCommentSource {
            client: self.clone(),
            feed,
        };
        PageLoader::new(Arc::new(source), self.events().clone())
    }
}

struct PostCommentSource {
    client: MemoClient,
    post_id: u64,
}

#[async_trait]
impl FetchPage<Comment> for PostCommentSource {
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<Comment>> {
        let fetched = self.client.post_comments(self.post_id, page).await?;
        Ok(FetchedPage {
            items: fetched.comments,
            max_page: fetched.max_page,
        })
    }
}

struct UserCommentSource {
    client: MemoClient,
    feed: UserCommentFeed,
}

#[async_trait]
impl FetchPage<CommentWithPost> for UserCommentSource {
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<CommentWithPost>> {
        let fetched = self.client.user_comments(&self.feed.username, page).await?;
        Ok(FetchedPage {
            items: fetched.comments,
            max_page: fetched.max_page,
        })
    }
}
