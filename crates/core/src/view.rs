//! Renderable items for front ends

use serde::Serialize;

use crate::listing::{FileEntry, Folder};
use crate::mock;

/// A folder row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderItem {
    pub label: String,
    pub prefix: String,
}

impl From<&Folder> for FolderItem {
    fn from(folder: &Folder) -> Self {
        Self {
            label: folder.name.clone(),
            prefix: folder.prefix.clone(),
        }
    }
}

/// A file row with its play and download targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileItem {
    pub label: String,
    pub key: String,
    pub size: u64,
    pub size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
    pub play_url: String,
    pub download_url: String,
    pub download_name: String,
    pub downloadable: bool,
}

impl From<&FileEntry> for FileItem {
    fn from(file: &FileEntry) -> Self {
        Self {
            label: file.name.clone(),
            key: file.key.clone(),
            size: file.size,
            size_human: format_file_size(file.size),
            last_modified: file.last_modified,
            play_url: file.url.clone(),
            download_url: file.url.clone(),
            download_name: download_name(&file.key),
            downloadable: !mock::is_mock(file),
        }
    }
}

/// Last `/` segment of a key, the file name a download is saved under
fn download_name(key: &str) -> String {
    key.rsplit(crate::listing::FOLDER_DELIMITER)
        .next()
        .unwrap_or(key)
        .to_string()
}

/// Base-1024 size with KB/MB/GB labels, e.g. `4.77 MB`
///
/// `WINDOWS` divides by 1024 but spells the first scale `kB`.
pub fn format_file_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::WINDOWS).replacen("kB", "KB", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_item() {
        let item = FolderItem::from(&Folder::new("Jazz/"));
        assert_eq!(item.label, "Jazz/");
        assert_eq!(item.prefix, "Jazz/");
    }

    #[test]
    fn test_file_item_targets() {
        let file = FileEntry {
            name: "Song.mp3".into(),
            key: "Rock/Song.mp3".into(),
            url: "https://b.s3.r.amazonaws.com/Rock/Song.mp3".into(),
            size: 5_000_000,
            last_modified: None,
        };
        let item = FileItem::from(&file);
        assert_eq!(item.label, "Song.mp3");
        assert_eq!(item.play_url, file.url);
        assert_eq!(item.download_url, file.url);
        assert_eq!(item.download_name, "Song.mp3");
        assert!(item.downloadable);
        assert!(item.size_human.ends_with("MB"));
    }

    #[test]
    fn test_nested_key_downloads_under_last_segment() {
        let file = FileEntry {
            name: "Live/Encore.mp3".into(),
            key: "Rock/Live/Encore.mp3".into(),
            url: "https://b.s3.r.amazonaws.com/Rock/Live/Encore.mp3".into(),
            size: 1024,
            last_modified: None,
        };
        let item = FileItem::from(&file);
        assert_eq!(item.label, "Live/Encore.mp3");
        assert_eq!(item.key, "Rock/Live/Encore.mp3");
        assert_eq!(item.download_name, "Encore.mp3");
    }

    #[test]
    fn test_download_name_never_keeps_parent_segments() {
        assert_eq!(download_name("Rock/../../etc/x.mp3"), "x.mp3");
        assert_eq!(download_name("Top.mp3"), "Top.mp3");
    }

    #[test]
    fn test_mock_file_not_downloadable() {
        let file = &mock::files("My-Mixes/")[0];
        assert!(!FileItem::from(file).downloadable);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5_000_000), "4.77 MB");
    }
}
