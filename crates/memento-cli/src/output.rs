//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use memento_api_models::{Comment, FileEntry, HeatMap, Post, ServerConfig, User};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const CONTENT_PREVIEW_CHARS: usize = 60;

pub(crate) fn render_posts(posts: &[Post], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&posts),
        OutputFormat::Table => {
            println!("{:<8} {:<16} {:>5} {:>5} {:<20} CONTENT", "ID", "AUTHOR", "LIKES", "CMTS", "CREATED");
            for post in posts {
                println!(
                    "{:<8} {:<16} {:>5} {:>5} {:<20} {}{}",
                    post.post_id,
                    post.user.username,
                    post.total_liked,
                    post.total_comment,
                    post.created_at.format("%Y-%m-%d %H:%M"),
                    visibility_marker(post),
                    preview(&post.content)
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_post(post: &Post, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(post),
        OutputFormat::Table => {
            println!("id: {}", post.post_id);
            println!("author: {} ({})", post.user.nickname, post.user.username);
            println!("created: {}", post.created_at.to_rfc3339());
            if post.edited_at != post.created_at {
                println!("edited: {}", post.edited_at.to_rfc3339());
            }
            println!(
                "likes: {} (liked: {}), comments: {}",
                post.total_liked, post.is_liked, post.total_comment
            );
            if post.is_private {
                println!("visibility: private");
            }
            println!();
            println!("{}", post.content);
            Ok(())
        }
    }
}

pub(crate) fn render_comments(comments: &[Comment], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&comments),
        OutputFormat::Table => {
            println!("{:<8} {:<16} {:>5} {:<20} CONTENT", "ID", "AUTHOR", "LIKES", "CREATED");
            for comment in comments {
                println!(
                    "{:<8} {:<16} {:>5} {:<20} {}",
                    comment.comment_id,
                    comment.user.username,
                    comment.liked,
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    preview(&comment.content)
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_user(user: &User, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user),
        OutputFormat::Table => {
            println!("username: {}", user.username);
            println!("nickname: {}", user.nickname);
            if !user.bio.is_empty() {
                println!("bio: {}", user.bio);
            }
            println!(
                "posts: {}, comments: {}, files: {}",
                user.total_posts, user.total_comment, user.total_files
            );
            println!(
                "likes received: {}, followers: {}, following: {}",
                user.total_liked, user.total_follower, user.total_follows
            );
            println!("registered: {}", user.registered_at.to_rfc3339());
            if user.is_admin {
                println!("role: admin");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_users(users: &[User], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&users),
        OutputFormat::Table => {
            println!("{:<16} {:<16} {:>6} {:>6} ADMIN", "USERNAME", "NICKNAME", "POSTS", "FILES");
            for user in users {
                println!(
                    "{:<16} {:<16} {:>6} {:>6} {}",
                    user.username, user.nickname, user.total_posts, user.total_files, user.is_admin
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_files(files: &[FileEntry], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&files),
        OutputFormat::Table => {
            println!("{:<8} {:<20} NAME", "ID", "UPLOADED");
            for file in files {
                println!(
                    "{:<8} {:<20} {}",
                    file.id,
                    file.time.format("%Y-%m-%d %H:%M"),
                    file.filename
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_heat_map(map: &HeatMap, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(map),
        OutputFormat::Table => {
            println!("memos: {}, likes: {}", map.memos, map.likes);
            for (day, count) in &map.map {
                println!("{day}: {count}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_config(config: &ServerConfig, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(config),
        OutputFormat::Table => {
            println!("site name: {}", config.site_name);
            println!("description: {}", config.description);
            println!("registration enabled: {}", config.enable_register);
            println!("icon version: {}", config.icon_version);
            Ok(())
        }
    }
}

pub(crate) fn render_tags(tags: &[String], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&tags),
        OutputFormat::Table => {
            for tag in tags {
                println!("{tag}");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn visibility_marker(post: &Post) -> &'static str {
    if post.is_private { "[private] " } else { "" }
}

/// First line of the content, truncated on a character boundary.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(CONTENT_PREVIEW_CHARS).collect();
    if first_line.chars().count() > CONTENT_PREVIEW_CHARS || content.lines().count() > 1 {
        out.push('…');
    }
    out
}
