//! Built-in preview dataset
//!
//! Shown when no bucket is configured, and substituted whenever a live listing fails
//! so the browser always has something to render.

use crate::listing::{FileEntry, Folder};

/// URL carried by mock files; they cannot be played or downloaded
pub const MOCK_URL: &str = "#";

const PREVIEW_LIBRARY: &[(&str, &[&str])] = &[
    (
        "My-Mixes/",
        &["Awesome-Track-1.mp3", "Chill-Vibes.mp3", "Workout-Mix.mp3"],
    ),
    (
        "Podcast-Episodes/",
        &["Episode-101.mp3", "Tech-Talk-Weekly.mp3"],
    ),
    (
        "Audiobook-Chapters/",
        &[
            "Chapter-01.mp3",
            "Chapter-02-Part1.mp3",
            "Chapter-02-Part2.mp3",
        ],
    ),
];

const GENERIC_FILES: &[(&str, u64)] = &[("Song-1.mp3", 5_000_000), ("Song-2.mp3", 7_000_000)];

/// Size given to files of the preview folders
const PREVIEW_FILE_SIZE: u64 = 4_200_000;

/// The fixed folder set
pub fn folders() -> Vec<Folder> {
    PREVIEW_LIBRARY
        .iter()
        .map(|(prefix, _)| Folder::new(*prefix))
        .collect()
}

/// Files for `prefix`: the preview tracks for known folders, two generic songs otherwise
pub fn files(prefix: &str) -> Vec<FileEntry> {
    match PREVIEW_LIBRARY.iter().find(|(p, _)| *p == prefix) {
        Some((_, names)) => names
            .iter()
            .map(|name| entry(prefix, name, PREVIEW_FILE_SIZE))
            .collect(),
        None => GENERIC_FILES
            .iter()
            .map(|(name, size)| entry(prefix, name, *size))
            .collect(),
    }
}

/// True if `file` belongs to the mock dataset
pub fn is_mock(file: &FileEntry) -> bool {
    file.url == MOCK_URL
}

fn entry(prefix: &str, name: &str, size: u64) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        key: format!("{prefix}{name}"),
        url: MOCK_URL.to_string(),
        size,
        last_modified: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_folders() {
        let prefixes: Vec<String> = folders().into_iter().map(|f| f.prefix).collect();
        assert_eq!(
            prefixes,
            vec!["My-Mixes/", "Podcast-Episodes/", "Audiobook-Chapters/"]
        );
    }

    #[test]
    fn test_mock_files_for_known_folder() {
        let files = files("Podcast-Episodes/");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "Episode-101.mp3");
        assert_eq!(files[0].key, "Podcast-Episodes/Episode-101.mp3");
        assert!(files.iter().all(is_mock));
        assert!(files.iter().all(|f| f.size > 0));
    }

    #[test]
    fn test_mock_files_for_unknown_folder() {
        let files = files("Rock/");
        let keys: Vec<&str> = files.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["Rock/Song-1.mp3", "Rock/Song-2.mp3"]);
        assert_eq!(files[1].size, 7_000_000);
    }
}
