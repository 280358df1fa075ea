//! CLI command definitions and execution
//!
//! Every command resolves one `BucketConfig` up front, builds the HTTP client and a
//! `Library` around it, and renders whatever the library returns. Listing failures
//! never abort a command: they surface as a banner above mock data.

use clap::{Args, Parser, Subcommand};
use jukebox_core::{BucketConfig, ConfigManager, Library, Origin, ProfileManager};
use jukebox_s3::HttpListingClient;
use tracing::debug;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod browse;
mod completions;
mod download;
mod files;
mod folders;
mod play;
mod profile;
mod url;

/// Region used when `--bucket` is given without `--region`
pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// jukebox - browse and play MP3s from a public S3 bucket
///
/// Folders are the top-level prefixes of the bucket; files are the `.mp3` objects
/// directly inside a folder. Without a configured bucket every command runs in
/// preview mode against built-in sample data.
#[derive(Parser, Debug)]
#[command(name = "jukebox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub bucket: BucketArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Bucket selection, highest precedence first
#[derive(Args, Debug, Clone, Default)]
pub struct BucketArgs {
    /// Bucket name; overrides any profile
    #[arg(long, global = true, env = "JUKEBOX_BUCKET")]
    pub bucket: Option<String>,

    /// Bucket region (with --bucket; default: us-east-1)
    #[arg(long, global = true, env = "JUKEBOX_REGION")]
    pub region: Option<String>,

    /// Named profile from the config file
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Custom S3-compatible endpoint; selects path-style URLs
    #[arg(long, global = true, env = "JUKEBOX_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl BucketArgs {
    /// Resolve flags, then the named or default profile, then the placeholder
    pub fn resolve(&self) -> jukebox_core::Result<BucketConfig> {
        let bucket = match &self.bucket {
            Some(name) => BucketConfig::new(
                name.as_str(),
                self.region.as_deref().unwrap_or(DEFAULT_REGION),
            ),
            None => ProfileManager::new()?.resolve(self.profile.as_deref())?,
        };

        Ok(match &self.endpoint {
            Some(endpoint) => bucket.with_endpoint(endpoint.as_str()),
            None => bucket,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the folders at the bucket root
    Folders(folders::FoldersArgs),

    /// List the MP3 files in a folder
    Files(files::FilesArgs),

    /// Select a file and hand it to a player
    Play(play::PlayArgs),

    /// Download a file to disk
    Download(download::DownloadArgs),

    /// Print the public URL of an object key
    Url(url::UrlArgs),

    /// Browse folders and files interactively
    Browse(browse::BrowseArgs),

    /// Manage bucket profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let flags = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        force_color: false,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let output_config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => flags.merge(&config.defaults),
        Err(e) => {
            debug!(error = %e, "using built-in output defaults");
            flags
        }
    };
    output_config.apply_color_mode();

    match cli.command {
        Commands::Folders(args) => folders::execute(args, &cli.bucket, output_config).await,
        Commands::Files(args) => files::execute(args, &cli.bucket, output_config).await,
        Commands::Play(args) => play::execute(args, &cli.bucket, output_config).await,
        Commands::Download(args) => download::execute(args, &cli.bucket, output_config).await,
        Commands::Url(args) => url::execute(args, &cli.bucket, output_config),
        Commands::Browse(args) => browse::execute(args, &cli.bucket, output_config).await,
        Commands::Profile(cmd) => profile::execute(cmd, &cli.bucket, output_config),
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve the bucket and build the HTTP client for it
pub(crate) fn connect(
    bucket_args: &BucketArgs,
    formatter: &Formatter,
) -> Result<HttpListingClient, ExitCode> {
    let bucket = bucket_args.resolve().map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from_error(&e)
    })?;

    HttpListingClient::new(bucket).map_err(|e| {
        formatter.error(&format!("Invalid bucket configuration: {e}"));
        ExitCode::from_error(&e)
    })
}

/// A library over a clone of `client`
pub(crate) fn library(client: &HttpListingClient) -> Library<HttpListingClient> {
    Library::new(client.clone(), client.bucket().clone())
}

/// Tell the user where a listing came from, when it did not come from the bucket
pub(crate) fn report_origin(formatter: &Formatter, origin: &Origin) {
    match origin {
        Origin::Live => {}
        Origin::Preview => formatter.warning(
            "No bucket configured; showing preview data. Set one with `jukebox profile set`.",
        ),
        Origin::Fallback { reason } => formatter.banner(reason),
    }
}

/// Folder argument as a listing prefix: `Rock` and `Rock/` both mean `Rock/`
pub(crate) fn folder_prefix(folder: &str) -> String {
    if folder.is_empty() || folder.ends_with('/') {
        folder.to_string()
    } else {
        format!("{folder}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_folder_prefix() {
        assert_eq!(folder_prefix("Rock"), "Rock/");
        assert_eq!(folder_prefix("Rock/"), "Rock/");
        assert_eq!(folder_prefix("Live Sets/2024"), "Live Sets/2024/");
        assert_eq!(folder_prefix(""), "");
    }

    #[test]
    fn test_bucket_flags_win() {
        let args = BucketArgs {
            bucket: Some("mixes".into()),
            region: Some("eu-west-1".into()),
            profile: Some("does-not-matter".into()),
            endpoint: None,
        };
        let bucket = args.resolve().unwrap();
        assert_eq!(bucket.bucket_name, "mixes");
        assert_eq!(bucket.region, "eu-west-1");
        assert!(bucket.is_configured());
    }

    #[test]
    fn test_bucket_flag_default_region_and_endpoint() {
        let args = BucketArgs {
            bucket: Some("mixes".into()),
            endpoint: Some("http://127.0.0.1:9000".into()),
            ..Default::default()
        };
        let bucket = args.resolve().unwrap();
        assert_eq!(bucket.region, DEFAULT_REGION);
        assert_eq!(bucket.base_url(), "http://127.0.0.1:9000/mixes");
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "jukebox", "files", "Rock", "--bucket", "mixes", "--region", "us-west-2", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.bucket.bucket.as_deref(), Some("mixes"));
        assert!(matches!(cli.command, Commands::Files(_)));
    }
}
