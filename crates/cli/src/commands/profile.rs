//! Profile management commands
//!
//! Profiles are named bucket locations stored in the config file, selected with
//! `--profile NAME` or made the default with `profile default NAME`. `profile set`
//! takes the region and endpoint from the global `--region` and `--endpoint` flags.

use clap::Subcommand;
use jukebox_core::{Error, Profile, ProfileManager};
use serde::Serialize;

use super::{BucketArgs, DEFAULT_REGION};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands for managing bucket locations
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(NameArgs),

    /// Use a profile when no --profile or --bucket is given
    Default(NameArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "mixes", "podcasts")
    pub name: String,

    /// Bucket name
    pub bucket_name: String,

    /// Also make this the default profile
    #[arg(long, default_value = "false")]
    pub default: bool,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including endpoints
    #[arg(short, long)]
    pub long: bool,
}

/// A profile name argument
#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Profile name
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    default_profile: Option<String>,
    profiles: Vec<Profile>,
}

/// JSON output for profile set/remove/default operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub fn execute(
    cmd: ProfileCommands,
    bucket: &BucketArgs,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match ProfileManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, bucket, &manager, &formatter),
        ProfileCommands::List(args) => execute_list(args, &manager, &formatter),
        ProfileCommands::Remove(args) => execute_remove(args, &manager, &formatter),
        ProfileCommands::Default(args) => execute_default(args, &manager, &formatter),
    }
}

fn execute_set(
    args: SetArgs,
    bucket: &BucketArgs,
    manager: &ProfileManager,
    formatter: &Formatter,
) -> ExitCode {
    if args.name.trim().is_empty() {
        formatter.error("Profile name cannot be empty");
        return ExitCode::UsageError;
    }

    let existed = manager.exists(&args.name).unwrap_or(false);
    let region = bucket.region.as_deref().unwrap_or(DEFAULT_REGION);
    let mut profile = Profile::new(&args.name, &args.bucket_name, region);
    profile.endpoint = bucket.endpoint.clone();

    if let Err(e) = manager.set(profile) {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }
    if args.default {
        if let Err(e) = manager.set_default(&args.name) {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    }

    let verb = if existed { "updated" } else { "configured" };
    report(
        formatter,
        &args.name,
        format!("Profile '{}' {verb} successfully", args.name),
    );
    ExitCode::Success
}

fn execute_list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let loaded = manager
        .list()
        .and_then(|profiles| Ok((profiles, manager.default_name()?)));
    let (profiles, default_profile) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ProfileListOutput {
            default_profile,
            profiles,
        });
        return ExitCode::Success;
    }

    if profiles.is_empty() {
        formatter.println("No profiles configured.");
        return ExitCode::Success;
    }

    for profile in &profiles {
        let marker = if default_profile.as_deref() == Some(profile.name.as_str()) {
            '*'
        } else {
            ' '
        };
        if args.long {
            let endpoint = profile.endpoint.as_deref().unwrap_or("aws");
            formatter.println(&format!(
                "{marker} {:<12} {} (region: {}, endpoint: {endpoint})",
                profile.name, profile.bucket_name, profile.region
            ));
        } else {
            formatter.println(&format!("{marker} {:<12} {}", profile.name, profile.bucket_name));
        }
    }
    ExitCode::Success
}

fn execute_remove(args: NameArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            report(
                formatter,
                &args.name,
                format!("Profile '{}' removed successfully", args.name),
            );
            ExitCode::Success
        }
        Err(Error::ProfileNotFound(_)) => {
            formatter.error(&format!("Profile '{}' not found", args.name));
            ExitCode::NotFound
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::GeneralError
        }
    }
}

fn execute_default(args: NameArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.set_default(&args.name) {
        Ok(()) => {
            report(
                formatter,
                &args.name,
                format!("Profile '{}' is now the default", args.name),
            );
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn report(formatter: &Formatter, name: &str, message: String) {
    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: name.to_string(),
            message,
        });
    } else {
        formatter.success(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn parse_set(args: &[&str]) -> (SetArgs, BucketArgs) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let Commands::Profile(ProfileCommands::Set(set)) = cli.command else {
            panic!("expected profile set");
        };
        (set, cli.bucket)
    }

    #[test]
    fn test_set_args_defaults() {
        let (args, _) = parse_set(&["jukebox", "profile", "set", "mixes", "my-mixes"]);
        assert_eq!(args.name, "mixes");
        assert_eq!(args.bucket_name, "my-mixes");
        assert!(!args.default);
    }

    #[test]
    fn test_set_takes_region_and_endpoint_from_global_flags() {
        let (args, bucket) = parse_set(&[
            "jukebox",
            "profile",
            "set",
            "local",
            "music",
            "--region",
            "eu-west-1",
            "--endpoint",
            "http://localhost:9000",
            "--default",
        ]);
        assert!(args.default);
        assert_eq!(bucket.region.as_deref(), Some("eu-west-1"));
        assert_eq!(bucket.endpoint.as_deref(), Some("http://localhost:9000"));
    }
}
