//! play command - Select a file and hand it to a player
//!
//! The navigator decides what to play; an external program (for example `mpv` or
//! `ffplay -nodisp`) does the playing. Without `--player` the URL is printed so it
//! can be piped elsewhere.

use async_trait::async_trait;
use clap::Args;
use jukebox_core::{AudioSink, Command, Error, Folder, Navigator, Outcome, PlaybackRequest};
use serde::Serialize;
use tokio::process::Command as Process;

use super::BucketArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Play a file
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Folder containing the file
    pub folder: String,

    /// File name; defaults to the first file in the folder
    pub name: Option<String>,

    /// Player command; the file URL is appended as the last argument
    #[arg(long, env = "JUKEBOX_PLAYER")]
    pub player: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlayOutput {
    now_playing: PlaybackRequest,
    started: bool,
}

/// Runs a player program and waits for it to exit
///
/// The child is killed if the wait is abandoned, for example on Ctrl+C in `browse`.
pub(crate) struct ExternalPlayer {
    program: String,
    args: Vec<String>,
}

impl ExternalPlayer {
    /// Split a command line such as `ffplay -nodisp -autoexit` on whitespace
    pub(crate) fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

#[async_trait]
impl AudioSink for ExternalPlayer {
    async fn play(&mut self, url: &str, _name: &str) -> jukebox_core::Result<()> {
        let status = Process::new(&self.program)
            .args(&self.args)
            .arg(url)
            .kill_on_drop(true)
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::General(format!("{} exited with {status}", self.program)))
        }
    }
}

/// Execute the play command
pub async fn execute(
    args: PlayArgs,
    bucket: &BucketArgs,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let client = match super::connect(bucket, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let mut navigator = Navigator::new(super::library(&client));

    let folder = Folder::new(super::folder_prefix(&args.folder));
    navigator.dispatch(Command::SelectFolder(folder)).await;
    if let Some(origin) = navigator.files_origin() {
        super::report_origin(&formatter, origin);
    }

    let file = match &args.name {
        Some(name) => navigator.files().iter().find(|f| &f.name == name),
        None => navigator.files().first(),
    }
    .cloned();
    let Some(file) = file else {
        match &args.name {
            Some(name) => formatter.error(&format!("No file named '{name}' in this folder")),
            None => formatter.error("No .mp3 files found in this folder."),
        }
        return ExitCode::NotFound;
    };

    let Outcome::Play(request) = navigator.dispatch(Command::SelectFile(file)).await else {
        return ExitCode::GeneralError;
    };

    let mut player = args.player.as_deref().and_then(ExternalPlayer::parse);
    if formatter.is_json() {
        let started = match player.as_mut() {
            Some(player) => match request.start(player).await {
                Ok(started) => started,
                Err(e) => {
                    formatter.error(&e.to_string());
                    return ExitCode::from_error(&e);
                }
            },
            None => false,
        };
        formatter.json(&PlayOutput {
            now_playing: request,
            started,
        });
        return ExitCode::Success;
    }

    let suffix = if navigator.is_preview() { " (Preview)" } else { "" };
    formatter.println(&format!("Now Playing: {}{suffix}", request.name));

    if request.preview {
        formatter.warning("This is a preview. Playback is disabled.");
        return ExitCode::Success;
    }

    match player.as_mut() {
        Some(player) => match request.start(player).await {
            Ok(_) => ExitCode::Success,
            Err(e) => {
                formatter.error(&format!("Player failed: {e}"));
                ExitCode::from_error(&e)
            }
        },
        None => {
            formatter.println(&request.url);
            ExitCode::Success
        }
    }
}
