//! Command-line surface shared by both utilities.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use vk_core::{ApiError, Credentials, VkClient, DEFAULT_API_VERSION, DEFAULT_BASE_URL};

/// Flags every utility accepts.
#[derive(Debug, Clone, Args)]
pub struct ApiArgs {
    /// A token for the VK API access_token parameter
    #[arg(long, env = "VK_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// Which VK API version to use
    #[arg(long = "api", value_name = "VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Whether to print debug information
    #[arg(long, short)]
    pub verbose: bool,

    #[arg(long, env = "VK_API_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,
}

impl ApiArgs {
    pub fn credentials(&self) -> Result<Credentials, ApiError> {
        Credentials::new(self.token.as_str(), self.api_version.as_str()).map_err(|err| match err {
            ApiError::Argument(msg) => ApiError::Argument(format!("{msg} (set --token or VK_TOKEN, and --api)")),
            other => other,
        })
    }

    pub fn client(&self) -> Result<VkClient, ApiError> {
        VkClient::new(&self.base_url, self.credentials()?)
    }
}

/// Parse a command line into `P`.
///
/// `--help` and `--version` print and exit as clap does. Every other clap
/// error becomes a one-line `ApiError::Argument` so it is reported through
/// the same pipeline as any other failure.
pub fn parse<P, I, T>(args: I) -> Result<P, ApiError>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    P::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => ApiError::Argument(one_line(&err)),
    })
}

/// clap's message without the usage block, folded onto a single line.
fn one_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let message = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    message.trim_start_matches("error: ").to_string()
}

/// List VK friends with their names.
#[derive(Debug, Parser)]
#[command(name = "vk-friends", version)]
pub struct FriendsCli {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Resolve names with one users.get call per friend instead of batches
    #[arg(long)]
    pub per_item: bool,

    #[command(subcommand)]
    pub command: FriendsCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum FriendsCommand {
    /// Friends that are online right now
    Online,
    /// All friends
    List,
}

/// Read and write the VK key/value storage.
///
/// Example:
///   vk-storage --token $TOKEN set mykey 123
///   vk-storage --token $TOKEN get mykey
#[derive(Debug, Parser)]
#[command(name = "vk-storage", version, verbatim_doc_comment)]
pub struct StorageCli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: StorageCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum StorageCommand {
    /// Print the value stored under KEY
    Get { key: String },
    /// Store VALUE under KEY
    Set { key: String, value: String },
}
