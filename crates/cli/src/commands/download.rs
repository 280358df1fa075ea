//! download command - Stream an MP3 to disk

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use jukebox_core::FileItem;
use jukebox_s3::HttpListingClient;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::BucketArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Download a file
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Folder containing the file
    pub folder: String,

    /// File name as shown by `jukebox files`
    pub name: String,

    /// Destination file or directory (default: the file name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DownloadOutput {
    key: String,
    path: String,
    bytes: u64,
}

/// Execute the download command
pub async fn execute(
    args: DownloadArgs,
    bucket: &BucketArgs,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let client = match super::connect(bucket, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let library = super::library(&client);

    let listing = library.list_files(&super::folder_prefix(&args.folder)).await;
    super::report_origin(&formatter, &listing.origin);

    let Some(item) = listing
        .items
        .iter()
        .find(|f| f.name == args.name)
        .map(FileItem::from)
    else {
        formatter.error(&format!("No file named '{}' in this folder", args.name));
        return ExitCode::NotFound;
    };

    if !item.downloadable {
        formatter.error("This is a preview. Download is disabled.");
        return ExitCode::UsageError;
    }

    let path = destination(args.output.as_deref(), &item.download_name);
    match fetch_to(&client, &item, &path, &formatter).await {
        Ok(bytes) => {
            if formatter.is_json() {
                formatter.json(&DownloadOutput {
                    key: item.key,
                    path: path.display().to_string(),
                    bytes,
                });
            } else {
                formatter.success(&format!(
                    "Downloaded {} ({}) to {}",
                    item.label,
                    jukebox_core::format_file_size(bytes),
                    path.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Download failed: {e:#}"));
            e.downcast_ref::<jukebox_core::Error>()
                .map(ExitCode::from_error)
                .unwrap_or(ExitCode::GeneralError)
        }
    }
}

/// `output` itself, `output/name` when it is a directory, or `name`
fn destination(output: Option<&Path>, name: &str) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => dir.join(name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(name),
    }
}

/// Stream `item` into a new file at `path`
///
/// A file this call created is removed again if the transfer fails. When `create`
/// itself fails nothing at `path` is touched.
async fn fetch_to(
    client: &HttpListingClient,
    item: &FileItem,
    path: &Path,
    formatter: &Formatter,
) -> anyhow::Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let result = stream_into(client, item, &mut file, path, formatter).await;
    if result.is_err() {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!(error = %e, path = %path.display(), "partial file not removed");
        }
    }
    result
}

async fn stream_into(
    client: &HttpListingClient,
    item: &FileItem,
    file: &mut tokio::fs::File,
    path: &Path,
    formatter: &Formatter,
) -> anyhow::Result<u64> {
    let progress = ProgressBar::new(formatter.config(), item.size);
    let written = client
        .download(&item.download_url, file, |done, total| {
            if let Some(total) = total {
                progress.set_length(total);
            }
            progress.set_position(done);
        })
        .await;
    progress.finish_and_clear();

    let written = written?;
    file.flush()
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(written)
}
