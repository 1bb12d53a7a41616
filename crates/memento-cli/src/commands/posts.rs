//! Timeline browsing and post authoring commands.

use memento_api_models::PostVisibility;
use memento_client::PostFeed;

use crate::cli::{PostCreateArgs, PostEditArgs, PostIdArgs, TagsArgs, TimelineArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::drain_pages;
use crate::output;

pub(crate) async fn handle_timeline(ctx: &AppContext, args: TimelineArgs) -> CliResult<()> {
    let feed = resolve_feed(&args);
    let loader = ctx.client.post_loader(feed);
    let posts = drain_pages(&loader, args.pages).await?;
    output::render_posts(&posts, ctx.output)?;
    if !loader.is_exhausted() {
        eprintln!("more pages available (rerun with --pages {})", args.pages + 1);
    }
    Ok(())
}

pub(crate) async fn handle_tags(ctx: &AppContext, args: TagsArgs) -> CliResult<()> {
    let tags = ctx.client.tags(args.all).await?;
    output::render_tags(&tags, ctx.output)
}

pub(crate) async fn handle_show(ctx: &AppContext, args: PostIdArgs) -> CliResult<()> {
    let post = ctx.client.post(args.id).await?;
    output::render_post(&post, ctx.output)
}

pub(crate) async fn handle_create(ctx: &AppContext, args: PostCreateArgs) -> CliResult<()> {
    ctx.client
        .create_post(&args.content, visibility(args.private))
        .await?;
    println!("post created");
    Ok(())
}

pub(crate) async fn handle_edit(ctx: &AppContext, args: PostEditArgs) -> CliResult<()> {
    ctx.client
        .edit_post(args.id, &args.content, visibility(args.private))
        .await?;
    println!("post {} updated", args.id);
    Ok(())
}

pub(crate) async fn handle_delete(ctx: &AppContext, args: PostIdArgs) -> CliResult<()> {
    ctx.client.delete_post(args.id).await?;
    println!("post {} deleted", args.id);
    Ok(())
}

pub(crate) async fn handle_like(ctx: &AppContext, args: PostIdArgs) -> CliResult<()> {
    ctx.client.like_post(args.id).await?;
    println!("post {} liked", args.id);
    Ok(())
}

pub(crate) async fn handle_unlike(ctx: &AppContext, args: PostIdArgs) -> CliResult<()> {
    ctx.client.unlike_post(args.id).await?;
    println!("post {} unliked", args.id);
    Ok(())
}

fn resolve_feed(args: &TimelineArgs) -> PostFeed {
    if let Some(username) = &args.user {
        PostFeed::User {
            username: username.clone(),
        }
    } else if args.following {
        PostFeed::Following
    } else if let Some(username) = &args.liked {
        PostFeed::Liked {
            username: username.clone(),
        }
    } else if let Some(tag) = &args.tag {
        PostFeed::Tagged { tag: tag.clone() }
    } else if let Some(keyword) = &args.search {
        PostFeed::Search {
            keyword: keyword.clone(),
        }
    } else {
        PostFeed::All
    }
}

const fn visibility(private: bool) -> PostVisibility {
    if private {
        PostVisibility::Private
    } else {
        PostVisibility::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{signed_in_context_for, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    fn post_json(id: u64, content: &str) -> serde_json::Value {
        json!({
            "IsLiked": false,
            "IsPrivate": false,
            "PostID": id,
            "User": user_json("ada"),
            "TotalLiked": 0,
            "TotalComment": 0,
            "CreatedAt": "2024-02-01T00:00:00Z",
            "EditedAt": "2024-02-01T00:00:00Z",
            "Content": content
        })
    }

    #[test]
    fn feed_selectors_map_to_endpoint_feeds() {
        let args = TimelineArgs {
            tag: Some("rust".to_string()),
            ..TimelineArgs::default()
        };
        assert!(matches!(resolve_feed(&args), PostFeed::Tagged { tag } if tag == "rust"));
        assert!(matches!(
            resolve_feed(&TimelineArgs::default()),
            PostFeed::All
        ));
    }

    #[tokio::test]
    async fn timeline_walks_the_requested_pages() {
        let server = MockServer::start_async().await;
        let first = server.mock(|when, then| {
            when.method(GET).path("/api/post/all").query_param("page", "0");
            then.status(200)
                .json_body(json!({"posts": [post_json(1, "a")], "maxPage": 1}));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/api/post/all").query_param("page", "1");
            then.status(200)
                .json_body(json!({"posts": [post_json(2, "b")], "maxPage": 1}));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_timeline(
            &ctx,
            TimelineArgs {
                pages: 2,
                ..TimelineArgs::default()
            },
        )
        .await
        .expect("timeline should succeed");
        first.assert();
        second.assert();
    }

    #[tokio::test]
    async fn timeline_surfaces_a_failed_page_as_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/post/all");
            then.status(503);
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        let args = TimelineArgs {
            pages: 1,
            ..TimelineArgs::default()
        };
        let err = handle_timeline(&ctx, args)
            .await
            .expect_err("failed page must not render partial output");
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn create_sends_content_and_visibility() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/post/create")
                .form_urlencoded_tuple("content", "remember")
                .form_urlencoded_tuple("permission", "private");
            then.status(200);
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_create(
            &ctx,
            PostCreateArgs {
                content: "remember".to_string(),
                private: true,
            },
        )
        .await
        .expect("create should succeed");
        mock.assert();
    }
}
