//! Sign-in, sign-out, registration, and identity commands.

use crate::cli::{LoginArgs, RegisterArgs};
use crate::client::{AppContext, CliError, CliResult, resolve_password};
use crate::output;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let password = resolve_password(args.password, "Password: ")?;
    let user = ctx.client.login(&args.username, &password).await?;
    println!("signed in as {} ({})", user.nickname, user.username);
    Ok(())
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    if !ctx.client.session().is_authenticated() {
        println!("already signed out");
        return Ok(());
    }
    ctx.client.sign_out();
    println!("signed out");
    Ok(())
}

pub(crate) async fn handle_register(ctx: &AppContext, args: RegisterArgs) -> CliResult<()> {
    let password = resolve_password(args.password, "Password: ")?;
    let user = ctx
        .client
        .register(&args.username, &password, args.captcha_token.as_deref())
        .await?;
    println!("registered and signed in as {}", user.username);
    Ok(())
}

pub(crate) async fn handle_whoami(ctx: &AppContext) -> CliResult<()> {
    let Some(local) = ctx.client.session().snapshot().user else {
        return Err(CliError::validation(
            "not signed in (run `memento login` first)",
        ));
    };
    // Refetch so counters reflect activity from other devices.
    let user = ctx.client.user(&local.username).await?;
    output::render_user(&user, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context_for, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn login_persists_the_session_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/user/login")
                .form_urlencoded_tuple("username", "ada")
                .form_urlencoded_tuple("password", "hunter2");
            then.status(200).json_body(json!({
                "token": {"access_token": "acc", "refresh_token": "ref"},
                "user": user_json("ada")
            }));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let session_file = dir.path().join("session.json");
        let ctx = context_for(&server, &session_file);
        handle_login(
            &ctx,
            LoginArgs {
                username: "ada".to_string(),
                password: Some("hunter2".to_string()),
            },
        )
        .await
        .expect("login should succeed");
        mock.assert();

        let raw = std::fs::read_to_string(&session_file).expect("session file written");
        assert!(raw.contains("acc"));
    }

    #[tokio::test]
    async fn logout_clears_the_persisted_session() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let session_file = dir.path().join("session.json");
        let ctx = crate::commands::test_support::signed_in_context_for(&server, &session_file);

        handle_logout(&ctx).expect("logout should succeed");
        assert!(!ctx.client.session().is_authenticated());
        let raw = std::fs::read_to_string(&session_file).expect("session file written");
        assert!(!raw.contains("acc"));
    }

    #[tokio::test]
    async fn whoami_requires_a_signed_in_user() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_for(&server, &dir.path().join("session.json"));

        let err = handle_whoami(&ctx).await.expect_err("must fail signed out");
        assert_eq!(err.exit_code(), 2);
    }
}
