//! Attachment upload, download, and housekeeping commands.

use std::io::Write as _;

use crate::cli::{FileDownloadArgs, FileIdArgs, FileListArgs, FileUploadArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{drain_pages, users::read_upload};
use crate::output;

pub(crate) async fn handle_upload(ctx: &AppContext, args: FileUploadArgs) -> CliResult<()> {
    let upload = read_upload(&args.path)?;
    let stored = ctx.client.upload_file(upload).await?;
    println!("uploaded {} (id: {})", stored.filename, stored.id);
    Ok(())
}

pub(crate) async fn handle_download(ctx: &AppContext, args: FileDownloadArgs) -> CliResult<()> {
    let bytes = ctx.client.download_file(args.id).await?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &bytes).map_err(|err| CliError::file_access(path, &err))?;
            println!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|err| CliError::failure(anyhow::anyhow!("failed to write stdout: {err}")))?;
        }
    }
    Ok(())
}

pub(crate) async fn handle_delete(ctx: &AppContext, args: FileIdArgs) -> CliResult<()> {
    ctx.client.delete_file(args.id).await?;
    println!("file {} deleted", args.id);
    Ok(())
}

pub(crate) async fn handle_list(ctx: &AppContext, args: FileListArgs) -> CliResult<()> {
    let loader = ctx.client.file_loader();
    let files = drain_pages(&loader, args.pages).await?;
    output::render_files(&files, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::signed_in_context_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn upload_reads_the_local_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/file/upload")
                .body_includes("notes.txt");
            then.status(200)
                .json_body(json!({"ID": 9, "Filename": "notes.txt"}));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&source).expect("create file");
        file.write_all(b"remember this").expect("write file");

        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_upload(&ctx, FileUploadArgs { path: source })
            .await
            .expect("upload should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn download_writes_the_destination_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/file/download/9");
            then.status(200).body("remember this");
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("notes.txt");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_download(
            &ctx,
            FileDownloadArgs {
                id: 9,
                out: Some(out.clone()),
            },
        )
        .await
        .expect("download should succeed");
        mock.assert();
        assert_eq!(
            std::fs::read(&out).expect("file written"),
            b"remember this"
        );
    }

    #[tokio::test]
    async fn list_walks_the_file_pages() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/file/all").query_param("page", "0");
            then.status(200).json_body(json!({
                "files": [{"ID": 9, "Filename": "notes.txt", "Time": "2024-02-01T00:00:00Z"}],
                "maxPage": 0
            }));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in_context_for(&server, &dir.path().join("session.json"));
        handle_list(&ctx, FileListArgs { pages: 1 })
            .await
            .expect("listing should succeed");
        mock.assert();
    }
}
