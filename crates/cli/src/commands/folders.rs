//! folders command - List the folders at the bucket root

use clap::Args;
use jukebox_core::{FolderItem, Origin};
use serde::Serialize;

use super::BucketArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// List folders
#[derive(Args, Debug)]
pub struct FoldersArgs {
    /// Fail instead of falling back to preview data
    #[arg(long)]
    pub strict: bool,
}

/// Output structure for the folders command (JSON format)
#[derive(Debug, Serialize)]
struct FoldersOutput {
    bucket: String,
    origin: Origin,
    folders: Vec<FolderItem>,
}

/// Execute the folders command
pub async fn execute(
    args: FoldersArgs,
    bucket: &BucketArgs,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let client = match super::connect(bucket, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let library = super::library(&client);
    if args.strict && !library.is_configured() {
        formatter.error("--strict needs a configured bucket");
        return ExitCode::UsageError;
    }

    let spinner = ProgressBar::spinner(formatter.config(), "Loading...");
    let (folders, origin) = if args.strict {
        match library.try_list_folders().await {
            Ok(folders) => (folders, Origin::Live),
            Err(e) => {
                spinner.finish_and_clear();
                formatter.error(&format!("Error listing folders: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    } else {
        let listing = library.list_folders().await;
        (listing.items, listing.origin)
    };
    spinner.finish_and_clear();

    let items: Vec<FolderItem> = folders.iter().map(FolderItem::from).collect();

    if formatter.is_json() {
        formatter.json(&FoldersOutput {
            bucket: library.bucket().bucket_name.clone(),
            origin,
            folders: items,
        });
        return ExitCode::Success;
    }

    super::report_origin(&formatter, &origin);
    if items.is_empty() {
        formatter.println("No folders found.");
    }
    for item in &items {
        formatter.println(&item.label);
    }

    ExitCode::Success
}
