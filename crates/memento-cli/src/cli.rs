//! Argument parsing and command dispatch for the `memento` CLI.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, build_client, init_logging};
use crate::commands::{admin, auth, comments, files, posts, users};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5323";
const DEFAULT_SESSION_FILE: &str = ".memento/session.json";

/// Parses CLI arguments, executes the requested command, and maps the
/// outcome to a process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_logging();

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let trace_id = Uuid::new_v4().to_string();
    let client = build_client(cli.api_url, cli.session_file, cli.timeout, &trace_id)?;
    let ctx = AppContext {
        client,
        output: cli.output,
    };

    match cli.command {
        Command::Login(args) => auth::handle_login(&ctx, args).await,
        Command::Logout => auth::handle_logout(&ctx),
        Command::Register(args) => auth::handle_register(&ctx, args).await,
        Command::Whoami => auth::handle_whoami(&ctx).await,
        Command::Timeline(args) => posts::handle_timeline(&ctx, args).await,
        Command::Tags(args) => posts::handle_tags(&ctx, args).await,
        Command::Post(post) => match post {
            PostCommand::Show(args) => posts::handle_show(&ctx, args).await,
            PostCommand::Create(args) => posts::handle_create(&ctx, args).await,
            PostCommand::Edit(args) => posts::handle_edit(&ctx, args).await,
            PostCommand::Delete(args) => posts::handle_delete(&ctx, args).await,
            PostCommand::Like(args) => posts::handle_like(&ctx, args).await,
            PostCommand::Unlike(args) => posts::handle_unlike(&ctx, args).await,
        },
        Command::Comment(comment) => match comment {
            CommentCommand::Ls(args) => comments::handle_list(&ctx, args).await,
            CommentCommand::Create(args) => comments::handle_create(&ctx, args).await,
            CommentCommand::Like(args) => comments::handle_like(&ctx, args).await,
            CommentCommand::Unlike(args) => comments::handle_unlike(&ctx, args).await,
        },
        Command::User(user) => match user {
            UserCommand::Show(args) => users::handle_show(&ctx, args).await,
            UserCommand::Heatmap(args) => users::handle_heatmap(&ctx, args).await,
            UserCommand::Edit(args) => users::handle_edit(&ctx, args).await,
            UserCommand::Passwd(args) => users::handle_passwd(&ctx, args).await,
            UserCommand::Follow(args) => users::handle_follow(&ctx, args).await,
            UserCommand::Unfollow(args) => users::handle_unfollow(&ctx, args).await,
        },
        Command::File(file) => match file {
            FileCommand::Upload(args) => files::handle_upload(&ctx, args).await,
            FileCommand::Download(args) => files::handle_download(&ctx, args).await,
            FileCommand::Rm(args) => files::handle_delete(&ctx, args).await,
            FileCommand::Ls(args) => files::handle_list(&ctx, args).await,
        },
        Command::Admin(admin_command) => match admin_command {
            AdminCommand::Config => admin::handle_config_get(&ctx).await,
            AdminCommand::SetConfig(args) => admin::handle_config_set(&ctx, args).await,
            AdminCommand::SetIcon(args) => admin::handle_set_icon(&ctx, args).await,
            AdminCommand::Users(args) => admin::handle_list_users(&ctx, args).await,
            AdminCommand::DeleteUser(args) => admin::handle_delete_user(&ctx, args).await,
            AdminCommand::SetPermission(args) => admin::handle_set_permission(&ctx, args).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "memento", about = "Command-line client for a Memento server")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "MEMENTO_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "MEMENTO_SESSION_FILE",
        default_value = DEFAULT_SESSION_FILE,
        help = "Where the signed-in session is persisted"
    )]
    session_file: PathBuf,
    #[arg(
        long,
        global = true,
        env = "MEMENTO_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login(LoginArgs),
    Logout,
    Register(RegisterArgs),
    Whoami,
    Timeline(TimelineArgs),
    Tags(TagsArgs),
    #[command(subcommand)]
    Post(PostCommand),
    #[command(subcommand)]
    Comment(CommentCommand),
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    File(FileCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(help = "Account name")]
    pub(crate) username: String,
    #[arg(long, env = "MEMENTO_PASSWORD", help = "Password (prompted if omitted)")]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(help = "Account name")]
    pub(crate) username: String,
    #[arg(long, env = "MEMENTO_PASSWORD", help = "Password (prompted if omitted)")]
    pub(crate) password: Option<String>,
    #[arg(long, help = "Captcha token when registration protection is enabled")]
    pub(crate) captcha_token: Option<String>,
}

#[derive(Args, Default)]
#[command(group = ArgGroup::new("feed").multiple(false))]
pub(crate) struct TimelineArgs {
    #[arg(long, group = "feed", help = "Posts of one user")]
    pub(crate) user: Option<String>,
    #[arg(long, group = "feed", help = "Posts from followed accounts")]
    pub(crate) following: bool,
    #[arg(long, group = "feed", value_name = "USERNAME", help = "Posts a user has liked")]
    pub(crate) liked: Option<String>,
    #[arg(long, group = "feed", help = "Posts carrying a tag")]
    pub(crate) tag: Option<String>,
    #[arg(long, group = "feed", help = "Full-text search keyword")]
    pub(crate) search: Option<String>,
    #[arg(long, default_value_t = 1, help = "Number of pages to fetch")]
    pub(crate) pages: u32,
}

#[derive(Args)]
pub(crate) struct TagsArgs {
    #[arg(long, help = "List site-wide tags instead of the signed-in user's")]
    pub(crate) all: bool,
}

#[derive(Subcommand)]
enum PostCommand {
    Show(PostIdArgs),
    Create(PostCreateArgs),
    Edit(PostEditArgs),
    Delete(PostIdArgs),
    Like(PostIdArgs),
    Unlike(PostIdArgs),
}

#[derive(Args)]
pub(crate) struct PostIdArgs {
    #[arg(help = "Post identifier")]
    pub(crate) id: u64,
}

#[derive(Args)]
pub(crate) struct PostCreateArgs {
    #[arg(help = "Markdown body of the post")]
    pub(crate) content: String,
    #[arg(long, help = "Make the post visible only to its author")]
    pub(crate) private: bool,
}

#[derive(Args)]
pub(crate) struct PostEditArgs {
    #[arg(help = "Post identifier")]
    pub(crate) id: u64,
    #[arg(help = "Replacement markdown body")]
    pub(crate) content: String,
    #[arg(long, help = "Make the post visible only to its author")]
    pub(crate) private: bool,
}

#[derive(Subcommand)]
enum CommentCommand {
    Ls(CommentListArgs),
    Create(CommentCreateArgs),
    Like(CommentIdArgs),
    Unlike(CommentIdArgs),
}

#[derive(Args)]
pub(crate) struct CommentListArgs {
    #[arg(help = "Post identifier")]
    pub(crate) post_id: u64,
    #[arg(long, default_value_t = 1, help = "Number of pages to fetch")]
    pub(crate) pages: u32,
}

#[derive(Args)]
pub(crate) struct CommentCreateArgs {
    #[arg(help = "Post identifier")]
    pub(crate) post_id: u64,
    #[arg(help = "Comment body")]
    pub(crate) content: String,
}

#[derive(Args)]
pub(crate) struct CommentIdArgs {
    #[arg(help = "Comment identifier")]
    pub(crate) id: u64,
}

#[derive(Subcommand)]
enum UserCommand {
    Show(UsernameArgs),
    Heatmap(UsernameArgs),
    Edit(UserEditArgs),
    Passwd(PasswdArgs),
    Follow(UsernameArgs),
    Unfollow(UsernameArgs),
}

#[derive(Args)]
pub(crate) struct UsernameArgs {
    #[arg(help = "Account name")]
    pub(crate) username: String,
}

#[derive(Args)]
pub(crate) struct UserEditArgs {
    #[arg(long, help = "Replacement display name")]
    pub(crate) nickname: Option<String>,
    #[arg(long, help = "Replacement profile text")]
    pub(crate) bio: Option<String>,
    #[arg(long, help = "Path to a replacement avatar image")]
    pub(crate) avatar: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct PasswdArgs {
    #[arg(long, help = "Current password (prompted if omitted)")]
    pub(crate) old_password: Option<String>,
    #[arg(long, help = "New password (prompted if omitted)")]
    pub(crate) new_password: Option<String>,
}

#[derive(Subcommand)]
enum FileCommand {
    Upload(FileUploadArgs),
    Download(FileDownloadArgs),
    Rm(FileIdArgs),
    Ls(FileListArgs),
}

#[derive(Args)]
pub(crate) struct FileUploadArgs {
    #[arg(help = "Path of the file to upload")]
    pub(crate) path: PathBuf,
}

#[derive(Args)]
pub(crate) struct FileDownloadArgs {
    #[arg(help = "File identifier")]
    pub(crate) id: u64,
    #[arg(long, help = "Destination path (defaults to stdout)")]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct FileIdArgs {
    #[arg(help = "File identifier")]
    pub(crate) id: u64,
}

#[derive(Args, Default)]
pub(crate) struct FileListArgs {
    #[arg(long, default_value_t = 1, help = "Number of pages to fetch")]
    pub(crate) pages: u32,
}

#[derive(Subcommand)]
enum AdminCommand {
    Config,
    SetConfig(AdminSetConfigArgs),
    SetIcon(AdminSetIconArgs),
    Users(AdminUsersArgs),
    DeleteUser(UsernameArgs),
    SetPermission(AdminSetPermissionArgs),
}

#[derive(Args)]
pub(crate) struct AdminSetConfigArgs {
    #[arg(long, help = "Whether new registrations are accepted")]
    pub(crate) enable_register: Option<bool>,
    #[arg(long, help = "Replacement site display name")]
    pub(crate) site_name: Option<String>,
    #[arg(long, help = "Replacement site description")]
    pub(crate) description: Option<String>,
}

#[derive(Args)]
pub(crate) struct AdminSetIconArgs {
    #[arg(help = "Path to the replacement icon image")]
    pub(crate) path: PathBuf,
}

#[derive(Args, Default)]
pub(crate) struct AdminUsersArgs {
    #[arg(long, default_value_t = 1, help = "Number of pages to fetch")]
    pub(crate) pages: u32,
}

#[derive(Args)]
pub(crate) struct AdminSetPermissionArgs {
    #[arg(help = "Account name")]
    pub(crate) username: String,
    #[arg(long, help = "Grant (true) or revoke (false) admin rights")]
    pub(crate) admin: bool,
}

/// Output format for commands that render structured data.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_url_rejects_invalid_input() {
        let err = parse_url("not-a-url").expect_err("invalid URL should fail");
        assert!(err.contains("invalid URL"));
    }

    #[test]
    fn timeline_feed_selectors_are_exclusive() {
        let result = Cli::try_parse_from([
            "memento",
            "timeline",
            "--following",
            "--tag",
            "rust",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_parse_before_subcommands() {
        let cli = Cli::try_parse_from([
            "memento",
            "--api-url",
            "http://localhost:9999",
            "--output",
            "json",
            "whoami",
        ])
        .expect("valid invocation");
        assert_eq!(cli.api_url.as_str(), "http://localhost:9999/");
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
