//! browse command - Interactive folder and file navigation
//!
//! A small line-oriented shell over the `Navigator`. Each input line becomes one
//! navigation command; the screen is re-rendered from navigator state afterwards.

use std::io::Write as _;

use anyhow::bail;
use clap::Args;
use jukebox_core::{Command, Navigator, Outcome, format_file_size};
use jukebox_s3::HttpListingClient;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::BucketArgs;
use super::play::ExternalPlayer;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

const HELP: &str = "\
Commands:
  ls          show folders and files
  cd N        open folder N
  play N      play file N
  refresh     reload the folder list
  dismiss     hide the error banner
  help        show this help
  quit        leave";

/// Browse interactively
#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Player command; the file URL is appended as the last argument
    #[arg(long, env = "JUKEBOX_PLAYER")]
    pub player: Option<String>,
}

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    List,
    Open(usize),
    Play(usize),
    Refresh,
    Dismiss,
    Help,
    Quit,
}

/// Execute the browse command
pub async fn execute(
    args: BrowseArgs,
    bucket: &BucketArgs,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    if formatter.is_json() {
        formatter.error("browse is interactive and has no JSON output");
        return ExitCode::UsageError;
    }

    let client = match super::connect(bucket, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let mut navigator = Navigator::new(super::library(&client));
    let mut player = args.player.as_deref().and_then(ExternalPlayer::parse);

    navigator.dispatch(Command::LoadFolders).await;
    if navigator.is_preview() {
        formatter.warning(
            "No bucket configured; showing preview data. Set one with `jukebox profile set`.",
        );
    }
    render(&navigator, &formatter);
    formatter.hint("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("jukebox> ");
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "prompt flush failed");
        }

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                return ExitCode::Interrupted;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                formatter.error(&format!("Failed to read input: {e}"));
                return ExitCode::GeneralError;
            }
        };

        match parse_input(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => {
                // Dropping `step` on Ctrl+C also kills a running player
                let result = tokio::select! {
                    result = step(&mut navigator, input, player.as_mut(), &formatter) => result,
                    _ = tokio::signal::ctrl_c() => {
                        println!();
                        return ExitCode::Interrupted;
                    }
                };
                if let Err(e) = result {
                    formatter.error(&format!("{e:#}"));
                }
            }
            Err(message) => formatter.error(&message),
        }
    }

    ExitCode::Success
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Empty);
    };
    let index = |arg: Option<&str>| -> Result<usize, String> {
        let arg = arg.ok_or_else(|| format!("`{verb}` needs a number"))?;
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("Not a list number: {arg}")),
        }
    };

    match verb {
        "ls" | "list" => Ok(Input::List),
        "cd" | "open" => index(words.next()).map(Input::Open),
        "play" | "p" => index(words.next()).map(Input::Play),
        "refresh" => Ok(Input::Refresh),
        "dismiss" => Ok(Input::Dismiss),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(format!("Unknown command: {other} (try `help`)")),
    }
}

async fn step(
    navigator: &mut Navigator<HttpListingClient>,
    input: Input,
    player: Option<&mut ExternalPlayer>,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    match input {
        Input::Empty | Input::Quit => {}
        Input::List => render(navigator, formatter),
        Input::Help => formatter.println(HELP),
        Input::Refresh => {
            navigator.dispatch(Command::LoadFolders).await;
            render(navigator, formatter);
        }
        Input::Dismiss => {
            navigator.dispatch(Command::DismissBanner).await;
            render(navigator, formatter);
        }
        Input::Open(n) => {
            let Some(folder) = navigator.folders().get(n - 1).cloned() else {
                bail!("No folder numbered {n}");
            };
            navigator.dispatch(Command::SelectFolder(folder)).await;
            render(navigator, formatter);
        }
        Input::Play(n) => {
            let Some(file) = navigator.files().get(n - 1).cloned() else {
                bail!("No file numbered {n}; open a folder with `cd` first");
            };
            let Outcome::Play(request) = navigator.dispatch(Command::SelectFile(file)).await
            else {
                bail!("Selecting a file did not produce a playback request");
            };

            let suffix = if navigator.is_preview() { " (Preview)" } else { "" };
            formatter.println(&format!("Now Playing: {}{suffix}", request.name));
            if request.preview {
                formatter.warning("This is a preview. In a real app, this would play the MP3.");
            } else if let Some(player) = player {
                request.start(player).await?;
            } else {
                formatter.println(&request.url);
            }
        }
    }
    Ok(())
}

fn render(navigator: &Navigator<HttpListingClient>, formatter: &Formatter) {
    if let Some(banner) = navigator.banner() {
        formatter.banner(banner);
        formatter.hint("(`dismiss` to hide)");
    }

    let selected = navigator
        .state()
        .selected_folder
        .as_ref()
        .map(|f| f.prefix.as_str());

    formatter.println("Folders:");
    if navigator.folders().is_empty() {
        formatter.println("  No folders found.");
    }
    for (i, folder) in navigator.folders().iter().enumerate() {
        let marker = if Some(folder.prefix.as_str()) == selected { '>' } else { ' ' };
        formatter.println(&format!("{marker} {:>2}. {}", i + 1, folder.name));
    }

    let Some(folder) = &navigator.state().selected_folder else {
        return;
    };
    formatter.println("");
    formatter.println(&format!("Files in {}:", folder.name));
    if navigator.files().is_empty() {
        formatter.println("  No .mp3 files found in this folder.");
    }
    let current = navigator.state().current_file.as_ref().map(|f| f.key.as_str());
    for (i, file) in navigator.files().iter().enumerate() {
        let marker = if Some(file.key.as_str()) == current { '>' } else { ' ' };
        formatter.println(&format!(
            "{marker} {:>2}. {}  ({})",
            i + 1,
            file.name,
            format_file_size(file.size)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_input() {
        assert_eq!(parse_input(""), Ok(Input::Empty));
        assert_eq!(parse_input("  ls "), Ok(Input::List));
        assert_eq!(parse_input("cd 2"), Ok(Input::Open(2)));
        assert_eq!(parse_input("play 1"), Ok(Input::Play(1)));
        assert_eq!(parse_input("dismiss"), Ok(Input::Dismiss));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert!(parse_input("cd").is_err());
        assert!(parse_input("cd 0").is_err());
        assert!(parse_input("play two").is_err());
        assert!(parse_input("shuffle").is_err());
    }
}
