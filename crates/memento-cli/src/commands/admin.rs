//! Site administration commands.

use crate::cli::{
    AdminSetConfigArgs, AdminSetIconArgs, AdminSetPermissionArgs, AdminUsersArgs, UsernameArgs,
};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{drain_pages, users::read_upload};
use crate::output;

pub(crate) async fn handle_config_get(ctx: &AppContext) -> CliResult<()> {
    let config = ctx.client.server_config().await?;
    output::render_config(&config, ctx.output)
}

/// Read-modify-write: the endpoint replaces the whole configuration, so
/// unchanged fields are carried over from the current one.
pub(crate) async fn handle_config_set(ctx: &AppContext, args: AdminSetConfigArgs) -> CliResult<()> {
    if args.enable_register.is_none() && args.site_name.is_none() && args.description.is_none() {
        return Err(CliError::validation(
            "nothing to change; pass --enable-register, --site-name, and/or --description",
        ));
    }
    let mut config = ctx.client.server_config().await?;
    if let Some(enable_register) = args.enable_register {
        config.enable_register = enable_register;
    }
    if let Some(site_name) = args.site_name {
        config.site_name = site_name;
    }
    if let Some(description) = args.description {
        config.description = description;
    }
    ctx.client.set_server_config(&config).await?;
    println!("configuration updated");
    Ok(())
}

pub(crate) async fn handle_set_icon(ctx: &AppContext, args: AdminSetIconArgs) -> CliResult<()> {
    let icon = read_upload(&args.path)?;
    ctx.client.set_site_icon(icon).await?;
    println!("site icon replaced");
    Ok(())
}

pub(crate) async fn handle_list_users(ctx: &AppContext, args: AdminUsersArgs) -> CliResult<()> {
    let loader = ctx.client.admin_user_loader();
    let users = drain_pages(&loader, args.pages).await?;
    output::render_users(&users, ctx.output)
}

pub(crate) async fn handle_delete_user(ctx: &AppContext, args: UsernameArgs) -> CliResult<()> {
    ctx.client.delete_user(&args.username).await?;
    println!("account {} deleted", args.username);
    Ok(())
}

pub(crate) async fn handle_set_permission(
    ctx: &AppContext,
    args: AdminSetPermissionArgs,
) -> CliResult<()> {
    ctx.client.set_permission(&args.username, args.admin).await?;
    println!(
        "{} admin rights for {}",
        if args.admin { "granted" } else { "revoked" },
        args.username
    );
    Ok(())
}
