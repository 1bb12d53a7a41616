//! Comment listing and authoring commands.

use crate::cli::{CommentCreateArgs, CommentIdArgs, CommentListArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::drain_pages;
use crate::output;

pub(crate) async fn handle_list(ctx: &AppContext, args: CommentListArgs) -> CliResult<()> {
    let loader = ctx.client.comment_loader(args.post_id);
    let comments = drain_pages(&loader, args.pages).await?;
    output::render_comments(&comments, ctx.output)
}

pub(crate) async fn handle_create(ctx: &AppContext, args: CommentCreateArgs) -> CliResult<()> {
    ctx.client
        .create_comment(args.post_id, &args.content)
        .await?;
    println!("comment added to post {}", args.post_id);
    Ok(())
}

pub(crate) async fn handle_like(ctx: &AppContext, args: CommentIdArgs) -> CliResult<()> {
    ctx.client.like_comment(args.id).await?;
    println!("comment {} liked", args.id);
    Ok(())
}

pub(crate) async fn handle_unlike(ctx: &AppContext, args: CommentIdArgs) -> CliResult<()> {
    ctx.client.unlike_comment(args.id).await?;
    println!("comment {} unliked", args.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{signed_in_context_for, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_walks_the_comment_pages() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/comment/postComments")
                .query_param("id", "7")
                .query_param("page", "0");
            then.status(200).json_body(json!({
                "comments": [{
                    "CommentID": 11,
                    "PostID": 7,
                    "User": user_json("bob"),
                    "CreatedAt": "2024-02-02T00:00:00Z",
                    "EditedAt": "2024-02-02T00:00:00Z",
                    "Content": "nice",
                    "Liked": 0,
                    "IsLiked": false
                }],
                "maxPage": 0
            }));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_list(
            &ctx,
            CommentListArgs {
                post_id: 7,
                pages: 1,
            },
        )
        .await
        .expect("listing should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn create_posts_the_comment_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/comment/create")
                .form_urlencoded_tuple("id", "7")
                .form_urlencoded_tuple("content", "nice");
            then.status(200);
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_create(
            &ctx,
            CommentCreateArgs {
                post_id: 7,
                content: "nice".to_string(),
            },
        )
        .await
        .expect("create should succeed");
        mock.assert();
    }
}
