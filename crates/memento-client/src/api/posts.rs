//! Post retrieval, authoring, and reactions.

use std::sync::Arc;

use async_trait::async_trait;
use memento_api_models::{Post, PostPage, PostVisibility};

use crate::error::ClientResult;
use crate::loader::{FetchPage, FetchedPage, PageLoader};
use crate::pipeline::ApiRequest;

use super::MemoClient;

/// Logical post collections the server can page through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFeed {
    /// Every public post.
    All,
    /// Posts authored by one user.
    User {
        /// Author account name.
        username: String,
    },
    /// Posts from accounts the signed-in user follows.
    Following,
    /// Posts a user has liked.
    Liked {
        /// Liking account name.
        username: String,
    },
    /// Posts carrying a tag.
    Tagged {
        /// Tag text including its `#` prefix as the server stores it.
        tag: String,
    },
    /// Full-text search results.
    Search {
        /// Search keyword.
        keyword: String,
    },
}

impl MemoClient {
    /// One page of every public post.
    pub async fn all_posts(&self, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/post/all").query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of a user's posts.
    pub async fn user_posts(&self, username: &str, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/post/userPosts")
            .query("username", username)
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of posts from followed accounts.
    pub async fn following_posts(&self, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/post/following").query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of posts a user has liked.
    pub async fn liked_posts(&self, username: &str, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/post/likedPosts")
            .query("username", username)
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of posts carrying a tag.
    pub async fn tagged_posts(&self, tag: &str, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/post/taggedPosts")
            .query("tag", tag)
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// One page of full-text search results.
    pub async fn search_posts(&self, keyword: &str, page: u32) -> ClientResult<PostPage> {
        let request = ApiRequest::get("/api/search/post")
            .query("keyword", keyword)
            .query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// A single post by id.
    pub async fn post(&self, id: u64) -> ClientResult<Post> {
        let request = ApiRequest::get("/api/post/get").query("id", id.to_string());
        self.pipeline().get_json(&request).await
    }

    /// Tags in use, either site-wide or only the signed-in user's.
    pub async fn tags(&self, all: bool) -> ClientResult<Vec<String>> {
        let request =
            ApiRequest::get("/api/post/tags").query("type", if all { "all" } else { "user" });
        self.pipeline().get_json(&request).await
    }

    /// Create a post.
    pub async fn create_post(
        &self,
        content: &str,
        visibility: PostVisibility,
    ) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/post/create",
            vec![
                ("content", content.to_string()),
                ("permission", visibility.as_str().to_string()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Edit an existing post.
    pub async fn edit_post(
        &self,
        id: u64,
        content: &str,
        visibility: PostVisibility,
    ) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/post/edit",
            vec![
                ("id", id.to_string()),
                ("content", content.to_string()),
                ("permission", visibility.as_str().to_string()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Delete a post by id.
    pub async fn delete_post(&self, id: u64) -> ClientResult<()> {
        let request = ApiRequest::delete(format!("/api/post/delete/{id}"));
        self.pipeline().execute(&request).await
    }

    /// Like a post.
    pub async fn like_post(&self, id: u64) -> ClientResult<()> {
        let request =
            ApiRequest::post_form("/api/post/like", vec![("id", id.to_string())]);
        self.pipeline().execute(&request).await
    }

    /// Remove a like from a post.
    pub async fn unlike_post(&self, id: u64) -> ClientResult<()> {
        let request =
            ApiRequest::post_form("/api/post/unlike", vec![("id", id.to_string())]);
        self.pipeline().execute(&request).await
    }

    /// Loader over a post feed, for incremental scrolling.
    #[must_use]
    pub fn post_loader(&self, feed: PostFeed) -> PageLoader<Post> {
        let source = PostFeedSource {
            client: self.clone(),
            feed,
        };
        PageLoader::new(Arc::new(source), self.events().clone())
    }
}

struct PostFeedSource {
    client: MemoClient,
    feed: PostFeed,
}

#[async_trait]
impl FetchPage<Post> for PostFeedSource {
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<Post>> {
        let fetched = match &self.feed {
            PostFeed::All => self.client.all_posts(page).await?,
            PostFeed::User { username } => self.client.user_posts(username, page).await?,
            PostFeed::Following => self.client.following_posts(page).await?,
            PostFeed::Liked { username } => self.client.liked_posts(username, page).await?,
            PostFeed::Tagged { tag } => self.client.tagged_posts(tag, page).await?,
            PostFeed::Search { keyword } => self.client.search_posts(keyword, page).await?,
        };
        Ok(FetchedPage {
            items: fetched.posts,
            max_page: fetched.max_page,
        })
    }
}
