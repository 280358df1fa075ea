//! Navigation model
//!
//! Holds the selected folder and file plus the lists currently on screen. Front ends
//! send `Command`s through `Navigator::dispatch` and render from the accessors; the
//! navigator itself never touches a terminal or an audio device.
//!
//! Every files fetch is tagged with a `FetchTicket`. Only the response carrying the
//! most recently issued ticket is applied, so when folders are clicked in quick
//! succession a slow earlier response cannot overwrite the later selection.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::library::{Library, Listing, Origin};
use crate::listing::{FileEntry, Folder};
use crate::mock;
use crate::traits::{AudioSink, ListingSource};

/// The current selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub selected_folder: Option<Folder>,
    pub current_file: Option<FileEntry>,
}

/// User actions the navigator understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the root folder list
    LoadFolders,
    /// Select a folder and fetch its files
    SelectFolder(Folder),
    /// Select a file for playback
    SelectFile(FileEntry),
    /// Hide the error banner
    DismissBanner,
}

/// What a dispatched command resulted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    FoldersLoaded,
    FilesLoaded,
    /// A newer folder selection superseded this response
    Stale,
    Play(PlaybackRequest),
    BannerDismissed,
}

/// Handed to the audio collaborator when a file is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackRequest {
    pub url: String,
    pub name: String,
    /// Mock entry; there is nothing to play
    pub preview: bool,
}

impl PlaybackRequest {
    /// Pass the request to `sink`; preview requests are not played and return false
    pub async fn start<A: AudioSink + ?Sized>(&self, sink: &mut A) -> Result<bool> {
        if self.preview {
            return Ok(false);
        }
        sink.play(&self.url, &self.name).await?;
        Ok(true)
    }
}

/// Sequence number of a files fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Navigation state machine over a `Library`
pub struct Navigator<S> {
    library: Library<S>,
    state: NavigationState,
    folders: Vec<Folder>,
    files: Vec<FileEntry>,
    folders_origin: Option<Origin>,
    files_origin: Option<Origin>,
    banner: Option<String>,
    latest: u64,
}

impl<S: ListingSource> Navigator<S> {
    pub fn new(library: Library<S>) -> Self {
        Self {
            library,
            state: NavigationState::default(),
            folders: Vec::new(),
            files: Vec::new(),
            folders_origin: None,
            files_origin: None,
            banner: None,
            latest: 0,
        }
    }

    pub fn library(&self) -> &Library<S> {
        &self.library
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Origin of the folder list, `None` before the first load
    pub fn folders_origin(&self) -> Option<&Origin> {
        self.folders_origin.as_ref()
    }

    /// Origin of the file list, `None` until a folder's files arrive
    pub fn files_origin(&self) -> Option<&Origin> {
        self.files_origin.as_ref()
    }

    /// Last caught listing failure, until dismissed
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// True when the bucket is unconfigured and everything shown is preview data
    pub fn is_preview(&self) -> bool {
        !self.library.is_configured()
    }

    pub async fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::LoadFolders => {
                self.load_folders().await;
                Outcome::FoldersLoaded
            }
            Command::SelectFolder(folder) => {
                if self.select_folder(folder).await {
                    Outcome::FilesLoaded
                } else {
                    Outcome::Stale
                }
            }
            Command::SelectFile(file) => Outcome::Play(self.select_file(file)),
            Command::DismissBanner => {
                self.banner = None;
                Outcome::BannerDismissed
            }
        }
    }

    /// Replace the folder list with a fresh root listing
    pub async fn load_folders(&mut self) {
        let listing = self.library.list_folders().await;
        self.note_banner(&listing);
        self.folders = listing.items;
        self.folders_origin = Some(listing.origin);
    }

    /// Select `folder` and fetch its files; false if a newer selection won
    pub async fn select_folder(&mut self, folder: Folder) -> bool {
        let prefix = folder.prefix.clone();
        let ticket = self.begin_select_folder(folder);
        let listing = self.library.list_files(&prefix).await;
        self.finish_select_folder(ticket, listing)
    }

    /// Record the selection and issue the ticket its files response must carry
    pub fn begin_select_folder(&mut self, folder: Folder) -> FetchTicket {
        self.latest += 1;
        debug!(prefix = %folder.prefix, ticket = self.latest, "selecting folder");
        self.state.selected_folder = Some(folder);
        self.files.clear();
        self.files_origin = None;
        FetchTicket(self.latest)
    }

    /// Apply a files response unless a later selection has been made since
    pub fn finish_select_folder(
        &mut self,
        ticket: FetchTicket,
        listing: Listing<FileEntry>,
    ) -> bool {
        if ticket.0 != self.latest {
            debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding superseded file listing"
            );
            return false;
        }
        self.note_banner(&listing);
        self.files = listing.items;
        self.files_origin = Some(listing.origin);
        true
    }

    /// Make `file` current and describe what the audio collaborator should play
    pub fn select_file(&mut self, file: FileEntry) -> PlaybackRequest {
        let request = PlaybackRequest {
            url: file.url.clone(),
            name: file.name.clone(),
            preview: mock::is_mock(&file),
        };
        self.state.current_file = Some(file);
        request
    }

    fn note_banner<T>(&mut self, listing: &Listing<T>) {
        if let Some(reason) = listing.banner() {
            self.banner = Some(reason.to_string());
        }
    }
}
