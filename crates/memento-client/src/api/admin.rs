//! Site administration: configuration, branding, and account management.

use std::sync::Arc;

use async_trait::async_trait;
use memento_api_models::{ServerConfig, User, UserPage};

use crate::error::ClientResult;
use crate::loader::{FetchPage, FetchedPage, PageLoader};
use crate::pipeline::{ApiRequest, FilePart, MultipartForm};

use super::{FileUpload, MemoClient};

impl MemoClient {
    /// Current site configuration.
    pub async fn server_config(&self) -> ClientResult<ServerConfig> {
        let request = ApiRequest::get("/api/admin/config");
        self.pipeline().get_json(&request).await
    }

    /// Update the site configuration.
    pub async fn set_server_config(&self, config: &ServerConfig) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/admin/config",
            vec![
                ("enable_register", config.enable_register.to_string()),
                ("site_name", config.site_name.clone()),
                ("description", config.description.clone()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Replace the site icon.
    pub async fn set_site_icon(&self, icon: FileUpload) -> ClientResult<()> {
        let form = MultipartForm {
            texts: Vec::new(),
            files: vec![FilePart {
                field: "icon",
                file_name: icon.file_name,
                bytes: icon.bytes,
            }],
        };
        let request = ApiRequest::post_multipart("/api/admin/setIcon", form);
        self.pipeline().execute(&request).await
    }

    /// One page of all registered accounts.
    pub async fn list_users(&self, page: u32) -> ClientResult<UserPage> {
        let request = ApiRequest::get("/api/admin/listUsers").query("page", page.to_string());
        self.pipeline().get_json(&request).await
    }

    /// Delete an account and its content.
    pub async fn delete_user(&self, username: &str) -> ClientResult<()> {
        let request = ApiRequest::delete(format!("/api/admin/deleteUser/{username}"));
        self.pipeline().execute(&request).await
    }

    /// Grant or revoke admin rights.
    pub async fn set_permission(&self, username: &str, is_admin: bool) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/admin/setPermission",
            vec![
                ("username", username.to_string()),
                ("is_admin", is_admin.to_string()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Loader over the account listing.
    #[must_use]
    pub fn admin_user_loader(&self) -> PageLoader<User> {
        let source = AdminUserSource {
            client: self.clone(),
        };
        PageLoader::new(Arc::new(source), self.events().clone())
    }
}

struct AdminUserSource {
    client: MemoClient,
}

#[async_trait]
impl FetchPage<User> for AdminUserSource {
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<User>> {
        let fetched = self.client.list_users(page).await?;
        Ok(FetchedPage {
            items: fetched.users,
            max_page: fetched.max_page,
        })
    }
}
