//! Profiles, relationships, and account settings.

use memento_api_models::{HeatMap, User};

use crate::error::ClientResult;
use crate::pipeline::{ApiRequest, FilePart, MultipartForm};

use super::{FileUpload, MemoClient};

impl MemoClient {
    /// Public profile of a user.
    pub async fn user(&self, username: &str) -> ClientResult<User> {
        let request = ApiRequest::get("/api/user/get").query("username", username);
        self.pipeline().get_json(&request).await
    }

    /// Activity heat-map of a user over the trailing year.
    pub async fn heat_map(&self, username: &str) -> ClientResult<HeatMap> {
        let request = ApiRequest::get("/api/user/heatmap").query("username", username);
        self.pipeline().get_json(&request).await
    }

    /// Update the signed-in user's profile. Only provided fields are sent;
    /// the refreshed profile is stored in the session and persisted.
    pub async fn edit_profile(
        &self,
        nickname: Option<&str>,
        bio: Option<&str>,
        avatar: Option<FileUpload>,
    ) -> ClientResult<User> {
        let mut form = MultipartForm::default();
        if let Some(nickname) = nickname {
            form.texts.push(("nickname", nickname.to_string()));
        }
        if let Some(bio) = bio {
            form.texts.push(("bio", bio.to_string()));
        }
        if let Some(avatar) = avatar {
            form.files.push(FilePart {
                field: "avatar",
                file_name: avatar.file_name,
                bytes: avatar.bytes,
            });
        }
        let request = ApiRequest::post_multipart("/api/user/edit", form);
        let user: User = self.pipeline().get_json(&request).await?;
        self.session().set_user(user.clone());
        self.pipeline().persist_session();
        Ok(user)
    }

    /// Change the signed-in user's password.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/user/changePwd",
            vec![
                ("oldPassword", old_password.to_string()),
                ("newPassword", new_password.to_string()),
            ],
        );
        self.pipeline().execute(&request).await
    }

    /// Follow another user.
    pub async fn follow(&self, followee: &str) -> ClientResult<()> {
        let request =
            ApiRequest::post_form("/api/user/follow", vec![("followee", followee.to_string())]);
        self.pipeline().execute(&request).await
    }

    /// Stop following another user.
    pub async fn unfollow(&self, followee: &str) -> ClientResult<()> {
        let request = ApiRequest::post_form(
            "/api/user/unfollow",
            vec![("followee", followee.to_string())],
        );
        self.pipeline().execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{signed_in_client_for, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn heat_map_decodes_day_counts() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/user/heatmap")
                .query_param("username", "ada");
            then.status(200).json_body(json!({
                "memos": 4,
                "likes": 9,
                "map": {"2024-03-01": 2}
            }));
        });

        let client = signed_in_client_for(&server);
        let map = client.heat_map("ada").await.expect("request succeeds");
        mock.assert();
        assert_eq!(map.memos, 4);
        assert_eq!(map.map.get("2024-03-01"), Some(&2));
    }

    #[tokio::test]
    async fn edit_profile_updates_the_session_user() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/user/edit")
                .body_includes("nickname")
                .body_includes("Countess");
            then.status(200).json_body(user_json("ada"));
        });

        let client = signed_in_client_for(&server);
        assert!(client.session().snapshot().user.is_none());
        client
            .edit_profile(Some("Countess"), None, None)
            .await
            .expect("request succeeds");
        mock.assert();
        let session_user = client.session().snapshot().user.expect("user stored");
        assert_eq!(session_user.username, "ada");
    }

    #[tokio::test]
    async fn follow_posts_the_followee_field() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/user/follow")
                .form_urlencoded_tuple("followee", "bob");
            then.status(200);
        });

        let client = signed_in_client_for(&server);
        client.follow("bob").await.expect("request succeeds");
        mock.assert();
    }
}
