//! Profile, relationship, and account-settings commands.

use memento_client::FileUpload;

use crate::cli::{PasswdArgs, UserEditArgs, UsernameArgs};
use crate::client::{AppContext, CliError, CliResult, resolve_password};
use crate::output;

pub(crate) async fn handle_show(ctx: &AppContext, args: UsernameArgs) -> CliResult<()> {
    let user = ctx.client.user(&args.username).await?;
    output::render_user(&user, ctx.output)
}

pub(crate) async fn handle_heatmap(ctx: &AppContext, args: UsernameArgs) -> CliResult<()> {
    let map = ctx.client.heat_map(&args.username).await?;
    output::render_heat_map(&map, ctx.output)
}

pub(crate) async fn handle_edit(ctx: &AppContext, args: UserEditArgs) -> CliResult<()> {
    if args.nickname.is_none() && args.bio.is_none() && args.avatar.is_none() {
        return Err(CliError::validation(
            "nothing to change; pass --nickname, --bio, and/or --avatar",
        ));
    }
    let avatar = match &args.avatar {
        Some(path) => Some(read_upload(path)?),
        None => None,
    };
    let user = ctx
        .client
        .edit_profile(args.nickname.as_deref(), args.bio.as_deref(), avatar)
        .await?;
    println!("profile updated");
    output::render_user(&user, ctx.output)
}

pub(crate) async fn handle_passwd(ctx: &AppContext, args: PasswdArgs) -> CliResult<()> {
    let old_password = resolve_password(args.old_password, "Current password: ")?;
    let new_password = resolve_password(args.new_password, "New password: ")?;
    ctx.client.change_password(&old_password, &new_password).await?;
    println!("password changed");
    Ok(())
}

pub(crate) async fn handle_follow(ctx: &AppContext, args: UsernameArgs) -> CliResult<()> {
    ctx.client.follow(&args.username).await?;
    println!("now following {}", args.username);
    Ok(())
}

pub(crate) async fn handle_unfollow(ctx: &AppContext, args: UsernameArgs) -> CliResult<()> {
    ctx.client.unfollow(&args.username).await?;
    println!("no longer following {}", args.username);
    Ok(())
}

/// Read a local file into an upload payload named after its final path
/// component.
pub(crate) fn read_upload(path: &std::path::Path) -> CliResult<FileUpload> {
    let bytes = std::fs::read(path).map_err(|err| CliError::file_access(path, &err))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| "upload".to_string(), str::to_string);
    Ok(FileUpload { file_name, bytes })
}
