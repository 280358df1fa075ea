//! url command - Print the public URL of an object key

use clap::Args;
use serde::Serialize;

use super::BucketArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print an object URL
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Full object key (e.g. "Rock/Song One.mp3")
    pub key: String,
}

#[derive(Debug, Serialize)]
struct UrlOutput {
    key: String,
    url: String,
    configured: bool,
}

/// Execute the url command
pub fn execute(args: UrlArgs, bucket: &BucketArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let bucket = match bucket.resolve().and_then(|b| b.validate().map(|()| b)) {
        Ok(bucket) => bucket,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let url = bucket.object_url(&args.key);
    if formatter.is_json() {
        formatter.json(&UrlOutput {
            key: args.key,
            url,
            configured: bucket.is_configured(),
        });
        return ExitCode::Success;
    }

    if !bucket.is_configured() {
        formatter.warning("No bucket configured; this URL points at the placeholder bucket.");
    }
    formatter.println(&url);
    ExitCode::Success
}
