#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Memento REST API.
//!
//! The server renders view models with PascalCase field names and wraps
//! paginated results in envelopes keyed by resource name plus a camelCase
//! `maxPage`. These types pin that contract in one place so the client and
//! CLI encode/decode identically.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile view of a user as rendered by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique account name.
    #[serde(rename = "Username")]
    pub username: String,
    /// Display name, defaults to the username at registration.
    #[serde(rename = "Nickname")]
    pub nickname: String,
    /// Free-form profile text.
    #[serde(rename = "Bio")]
    pub bio: String,
    /// Likes received across all posts.
    #[serde(rename = "TotalLiked")]
    pub total_liked: i64,
    /// Comments authored.
    #[serde(rename = "TotalComment")]
    pub total_comment: i64,
    /// Posts authored.
    #[serde(rename = "TotalPosts")]
    pub total_posts: i64,
    /// Files uploaded.
    #[serde(rename = "TotalFiles", default)]
    pub total_files: i64,
    /// Accounts following this user.
    #[serde(rename = "TotalFollower", default)]
    pub total_follower: i64,
    /// Accounts this user follows.
    #[serde(rename = "TotalFollows", default)]
    pub total_follows: i64,
    /// Account creation time.
    #[serde(rename = "RegisteredAt")]
    pub registered_at: DateTime<Utc>,
    /// Avatar URL, empty when unset.
    #[serde(rename = "Avatar", default)]
    pub avatar: String,
    /// Whether the requesting user follows this one.
    #[serde(rename = "IsFollowed", default)]
    pub is_followed: bool,
    /// Whether this account holds admin rights.
    #[serde(rename = "IsAdmin", default)]
    pub is_admin: bool,
}

/// A single memo post with its author snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Whether the requesting user has liked this post.
    #[serde(rename = "IsLiked")]
    pub is_liked: bool,
    /// Visibility flag; private posts are only served to their author.
    #[serde(rename = "IsPrivate")]
    pub is_private: bool,
    /// Server-assigned post identifier.
    #[serde(rename = "PostID")]
    pub post_id: u64,
    /// Author profile snapshot.
    #[serde(rename = "User")]
    pub user: User,
    /// Like count.
    #[serde(rename = "TotalLiked")]
    pub total_liked: i64,
    /// Comment count.
    #[serde(rename = "TotalComment")]
    pub total_comment: i64,
    /// Creation time.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    #[serde(rename = "EditedAt")]
    pub edited_at: DateTime<Utc>,
    /// Markdown body.
    #[serde(rename = "Content")]
    pub content: String,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Server-assigned comment identifier.
    #[serde(rename = "CommentID")]
    pub comment_id: u64,
    /// Post this comment belongs to.
    #[serde(rename = "PostID")]
    pub post_id: u64,
    /// Author profile snapshot.
    #[serde(rename = "User")]
    pub user: User,
    /// Creation time.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    #[serde(rename = "EditedAt")]
    pub edited_at: DateTime<Utc>,
    /// Comment body.
    #[serde(rename = "Content")]
    pub content: String,
    /// Like count.
    #[serde(rename = "Liked")]
    pub liked: i64,
    /// Whether the requesting user has liked this comment.
    #[serde(rename = "IsLiked")]
    pub is_liked: bool,
}

/// A comment joined with the post it was left on, as returned by the
/// per-user comment listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentWithPost {
    /// The comment itself.
    #[serde(flatten)]
    pub comment: Comment,
    /// The post the comment belongs to.
    #[serde(rename = "Post")]
    pub post: Post,
}

/// An uploaded file attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    /// Server-assigned file identifier.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Original file name.
    #[serde(rename = "Filename")]
    pub filename: String,
    /// Upload time.
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
}

/// Access/refresh credential pair issued at login, registration, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Longer-lived credential used solely to mint a new pair.
    pub refresh_token: String,
}

/// Response body of the login, registration, and refresh endpoints.
///
/// Older server revisions returned bare `accessToken`/`refreshToken` fields
/// from the refresh endpoint; the canonical shape is this one, emitted by the
/// same helper for all three endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Freshly minted credential pair.
    pub token: TokenPair,
    /// Profile of the authenticated user.
    pub user: User,
}

/// Site-wide configuration readable and writable by administrators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Whether new registrations are accepted.
    pub enable_register: bool,
    /// Site display name.
    pub site_name: String,
    /// Site description blurb.
    pub description: String,
    /// Monotonic icon version used for cache busting.
    #[serde(default)]
    pub icon_version: i64,
}

/// Per-user activity heat-map: posts-per-day over the trailing year plus
/// aggregate counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatMap {
    /// Total posts authored.
    pub memos: u64,
    /// Total likes received.
    pub likes: i64,
    /// Post count per `YYYY-MM-DD` day.
    pub map: BTreeMap<String, u32>,
}

/// One page of posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostPage {
    /// Posts in server order.
    pub posts: Vec<Post>,
    /// Last valid page index, inclusive.
    #[serde(rename = "maxPage")]
    pub max_page: u32,
}

/// One page of comments on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentPage {
    /// Comments in server order.
    pub comments: Vec<Comment>,
    /// Last valid page index, inclusive.
    #[serde(rename = "maxPage")]
    pub max_page: u32,
}

/// One page of a user's comments joined with their posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserCommentPage {
    /// Comments in server order.
    pub comments: Vec<CommentWithPost>,
    /// Last valid page index, inclusive.
    #[serde(rename = "maxPage")]
    pub max_page: u32,
}

/// One page of file attachments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilePage {
    /// Files in server order.
    pub files: Vec<FileEntry>,
    /// Last valid page index, inclusive.
    #[serde(rename = "maxPage")]
    pub max_page: u32,
}

/// One page of user accounts from the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPage {
    /// Users in server order.
    pub users: Vec<User>,
    /// Last valid page index, inclusive.
    #[serde(rename = "maxPage")]
    pub max_page: u32,
    /// Total registered accounts.
    #[serde(rename = "totalUsers", default)]
    pub total_users: i64,
}

/// Response body of the file upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// Server-assigned identifier of the stored file.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Echoed original file name.
    #[serde(rename = "Filename")]
    pub filename: String,
}

/// Error payload attached to 400 responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    /// Human-readable rejection reason.
    pub message: String,
}

/// Post visibility selector sent on create/edit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostVisibility {
    /// Visible to everyone.
    #[default]
    Public,
    /// Visible only to the author.
    Private,
}

impl PostVisibility {
    /// Form-encoded value expected by the server.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}
