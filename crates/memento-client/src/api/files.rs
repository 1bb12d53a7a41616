//! File attachment storage.

use std::sync::Arc;

use async_trait::async_trait;
use memento_api_models::{FileEntry, FilePage, UploadResponse};

use crate::error::ClientResult;
use crate::loader::{FetchPage, FetchedPage, PageLoader};
use crate::pipeline::{ApiRequest, FilePart, MultipartForm};

use super::{FileUpload, MemoClient};

impl MemoClient {
    /// Upload a file attachment.
    pub async fn upload_file(&self, upload: FileUpload) -> ClientResult<UploadResponse> {
        let form = MultipartForm {
            texts: Vec::new(),
            files: vec![FilePart {
                field: "file",
                file_name: upload.file_name,
                bytes: upload.bytes,
            }],
        };
        let request = ApiRequest::post_multipart("/api/file/upload", form);
        self.pipeline().get_json(&request).await
    }

    /// Download a file's raw content by id.
    pub async fn download_file(&self, id: u64) -> ClientResult<Vec<u8>> {
        let request = ApiRequest::get(format!("/api/file/download/{id}"));
        self.pipeline().get_bytes(&request).await
    }

    /// Delete an uploaded file by id.
    pub async fn delete_file(&self, id: u64) -> ClientResult<()> {
        let request = ApiRequest::delete(format!("/api/file/delete/{id}"));
        self.pipeline().execute(&request).await
    }

    /// One page of the signed-in user's uploads.
    pub async fn files(&self, page: u32) -> ClientResult<FilePage> {
        let request = ApiRequest::get("/api/file/all").query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// Loader over the signed-in user's uploads.
    #[must_use]
    pub fn file_loader(&self) -> PageLoader<FileEntry> {
        let source = FileSource {
            client: self.clone(),
        };
        PageLoader::new(Arc::new(source), self.events().clone())
    }
}

struct FileSource {
    client: MemoClient,
}

#[async_trait]
impl FetchPage<FileEntry> for FileSource {
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<FileEntry>> {
        let fetched = self.client.files(page).await?;
        Ok(FetchedPage {
            items: fetched.files,
            max_page: fetched.max_page,
        })
    }
}
