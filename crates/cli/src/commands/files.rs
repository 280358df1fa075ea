//! files command - List the MP3 files in a folder

use clap::Args;
use jukebox_core::{FileItem, Origin};
use serde::Serialize;

use super::BucketArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// List files in a folder
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Folder name as shown by `jukebox folders` (e.g. "Rock/")
    pub folder: String,

    /// Show the download URL of each file
    #[arg(short, long)]
    pub long: bool,

    /// Fail instead of falling back to preview data
    #[arg(long)]
    pub strict: bool,
}

/// Output structure for the files command (JSON format)
#[derive(Debug, Serialize)]
struct FilesOutput {
    folder: String,
    origin: Origin,
    files: Vec<FileItem>,
}

/// Execute the files command
pub async fn execute(
    args: FilesArgs,
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

    let prefix = super::folder_prefix(&args.folder);
    let spinner = ProgressBar::spinner(formatter.config(), "Loading...");
    let (files, origin) = if args.strict {
        match library.try_list_files(&prefix).await {
            Ok(files) => (files, Origin::Live),
            Err(e) => {
                spinner.finish_and_clear();
                formatter.error(&format!("Error listing files: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    } else {
        let listing = library.list_files(&prefix).await;
        (listing.items, listing.origin)
    };
    spinner.finish_and_clear();

    let items: Vec<FileItem> = files.iter().map(FileItem::from).collect();

    if formatter.is_json() {
        formatter.json(&FilesOutput {
            folder: prefix,
            origin,
            files: items,
        });
        return ExitCode::Success;
    }

    super::report_origin(&formatter, &origin);
    if items.is_empty() {
        formatter.println("No .mp3 files found in this folder.");
        return ExitCode::Success;
    }

    let mut header = vec!["Name", "Size", "Last Modified"];
    if args.long {
        header.push("URL");
    }
    let mut table = formatter.table(header);
    for item in &items {
        let modified = item
            .last_modified
            .map(|ts| ts.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let mut row = vec![item.label.clone(), item.size_human.clone(), modified];
        if args.long {
            row.push(item.download_url.clone());
        }
        table.add_row(row);
    }
    formatter.print_table(&table);

    ExitCode::Success
}
