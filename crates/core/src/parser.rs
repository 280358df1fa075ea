//! Listing document parser
//!
//! Turns the XML body of a `ListBucket` call into folders, files or the provider's
//! error report. Elements are matched by local name at any depth, so namespaced
//! documents (`xmlns="http://s3.amazonaws.com/doc/2006-03-01/"`) parse the same way
//! as bare ones.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::bucket::BucketConfig;
use crate::error::{Error, Result};
use crate::listing::{
    AUDIO_EXTENSION, FileEntry, Folder, ListingError, ListingKind, ListingRequest, ParsedListing,
};

const UNKNOWN_CODE: &str = "Unknown";
const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Parse a listing body produced for `request`
///
/// Returns `ParsedListing::Error` as soon as an `<Error>` element closes; nothing else
/// in the document is considered once one is found. Malformed XML is reported as
/// `Error::Parse`.
pub fn parse_listing(
    xml: &str,
    request: &ListingRequest,
    bucket: &BucketConfig,
) -> Result<ParsedListing> {
    let mut scanner = Scanner::default();
    let mut reader = Reader::from_str(xml);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Parse(format!("{e} at byte {}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                scanner.open(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                scanner.open(name);
                if let Some(error) = scanner.close()? {
                    return Ok(ParsedListing::Error(error));
                }
            }
            Event::End(_) => {
                if let Some(error) = scanner.close()? {
                    return Ok(ParsedListing::Error(error));
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                scanner.text(&text);
            }
            Event::CData(e) => {
                scanner.text(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !scanner.seen_root {
        return Err(Error::Parse("document has no root element".into()));
    }
    if !scanner.stack.is_empty() {
        return Err(Error::Parse(format!(
            "unexpected end of document inside <{}>",
            scanner.stack.last().map(String::as_str).unwrap_or_default()
        )));
    }

    let listing = match request.kind() {
        ListingKind::Folders => {
            let folders: Vec<Folder> = scanner.prefixes.into_iter().map(Folder::new).collect();
            debug!(count = folders.len(), "parsed folder listing");
            ParsedListing::Folders(folders)
        }
        ListingKind::Files => {
            let files: Vec<FileEntry> = scanner
                .contents
                .into_iter()
                .filter_map(|raw| raw.into_entry(&request.prefix, bucket))
                .collect();
            debug!(count = files.len(), prefix = %request.prefix, "parsed file listing");
            ParsedListing::Files(files)
        }
    };

    Ok(listing)
}

/// Child elements whose text is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Code,
    Message,
    Prefix,
    Key,
    Size,
    LastModified,
}

/// Text collected for one field, closed when its element ends
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Debug, Default)]
struct ErrorDoc {
    depth: usize,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default)]
struct CommonPrefix {
    depth: usize,
    prefix: Option<String>,
}

#[derive(Debug, Default)]
struct RawContents {
    depth: usize,
    key: Option<String>,
    size: Option<String>,
    last_modified: Option<String>,
}

impl RawContents {
    /// Keep `.mp3` keys with a non-zero size, which also drops folder placeholder objects
    fn into_entry(self, prefix: &str, bucket: &BucketConfig) -> Option<FileEntry> {
        let key = self.key?;
        let size = self
            .size
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);

        if !key.ends_with(AUDIO_EXTENSION) || size == 0 {
            return None;
        }

        let name = key.strip_prefix(prefix).unwrap_or(&key).to_string();
        let url = bucket.object_url(&key);
        let last_modified = self
            .last_modified
            .as_deref()
            .and_then(|s| s.trim().parse::<jiff::Timestamp>().ok());

        Some(FileEntry {
            name,
            key,
            url,
            size,
            last_modified,
        })
    }
}

#[derive(Debug, Default)]
struct Scanner {
    stack: Vec<String>,
    seen_root: bool,
    capture: Option<Capture>,
    error: Option<ErrorDoc>,
    prefix: Option<CommonPrefix>,
    entry: Option<RawContents>,
    prefixes: Vec<String>,
    contents: Vec<RawContents>,
}

impl Scanner {
    fn open(&mut self, name: String) {
        self.seen_root = true;
        let depth = self.stack.len() + 1;
        let field = if self.capture.is_some() {
            None
        } else {
            self.start(&name, depth)
        };
        self.stack.push(name);

        if let Some(field) = field {
            self.capture = Some(Capture {
                field,
                depth,
                text: String::new(),
            });
        }
    }

    /// Track container elements and pick the field, if any, whose text to collect
    fn start(&mut self, name: &str, depth: usize) -> Option<Field> {
        match name {
            "Error" if self.error.is_none() => {
                self.error = Some(ErrorDoc {
                    depth,
                    ..Default::default()
                });
                None
            }
            "CommonPrefixes" if self.prefix.is_none() => {
                self.prefix = Some(CommonPrefix {
                    depth,
                    prefix: None,
                });
                None
            }
            "Contents" if self.entry.is_none() => {
                self.entry = Some(RawContents {
                    depth,
                    ..Default::default()
                });
                None
            }
            "Code" => self
                .error
                .as_ref()
                .filter(|e| e.code.is_none())
                .map(|_| Field::Code),
            "Message" => self
                .error
                .as_ref()
                .filter(|e| e.message.is_none())
                .map(|_| Field::Message),
            "Prefix" => self
                .prefix
                .as_ref()
                .filter(|p| p.prefix.is_none())
                .map(|_| Field::Prefix),
            "Key" => self
                .entry
                .as_ref()
                .filter(|c| c.key.is_none())
                .map(|_| Field::Key),
            "Size" => self
                .entry
                .as_ref()
                .filter(|c| c.size.is_none())
                .map(|_| Field::Size),
            "LastModified" => self
                .entry
                .as_ref()
                .filter(|c| c.last_modified.is_none())
                .map(|_| Field::LastModified),
            _ => None,
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = &mut self.capture {
            capture.text.push_str(text);
        }
    }

    /// Close the innermost element, returning the error report once `<Error>` ends
    fn close(&mut self) -> Result<Option<ListingError>> {
        let depth = self.stack.len();
        if self.stack.pop().is_none() {
            return Err(Error::Parse("closing tag without matching start".into()));
        }

        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                self.store(capture);
            }
        }

        if self.error.as_ref().is_some_and(|e| e.depth == depth) {
            let doc = self.error.take().unwrap_or_default();
            return Ok(Some(ListingError::new(
                doc.code.unwrap_or_else(|| UNKNOWN_CODE.to_string()),
                doc.message.unwrap_or_else(|| UNKNOWN_MESSAGE.to_string()),
            )));
        }

        if self.prefix.as_ref().is_some_and(|p| p.depth == depth) {
            if let Some(prefix) = self.prefix.take().and_then(|p| p.prefix) {
                self.prefixes.push(prefix);
            }
        }

        if self.entry.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(entry) = self.entry.take() {
                self.contents.push(entry);
            }
        }

        Ok(None)
    }

    fn store(&mut self, capture: Capture) {
        // Empty text counts as absent, matching the provider defaults for Code/Message
        if capture.text.is_empty() {
            return;
        }
        let text = Some(capture.text);
        match capture.field {
            Field::Code => {
                if let Some(e) = &mut self.error {
                    e.code = text;
                }
            }
            Field::Message => {
                if let Some(e) = &mut self.error {
                    e.message = text;
                }
            }
            Field::Prefix => {
                if let Some(p) = &mut self.prefix {
                    p.prefix = text;
                }
            }
            Field::Key => {
                if let Some(c) = &mut self.entry {
                    c.key = text;
                }
            }
            Field::Size => {
                if let Some(c) = &mut self.entry {
                    c.size = text;
                }
            }
            Field::LastModified => {
                if let Some(c) = &mut self.entry {
                    c.last_modified = text;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketConfig {
        BucketConfig::new("tasty-mixes", "us-east-1")
    }

    fn folders(xml: &str) -> Vec<Folder> {
        match parse_listing(xml, &ListingRequest::folders(), &bucket()).unwrap() {
            ParsedListing::Folders(folders) => folders,
            other => panic!("expected folders, got {other:?}"),
        }
    }

    fn files(xml: &str, prefix: &str) -> Vec<FileEntry> {
        match parse_listing(xml, &ListingRequest::files(prefix), &bucket()).unwrap() {
            ParsedListing::Files(files) => files,
            other => panic!("expected files, got {other:?}"),
        }
    }

    const ROOT_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>tasty-mixes</Name>
  <Prefix></Prefix>
  <Delimiter>/</Delimiter>
  <IsTruncated>false</IsTruncated>
  <Contents><Key>index.html</Key><Size>512</Size></Contents>
  <CommonPrefixes><Prefix>Electronic/</Prefix></CommonPrefixes>
  <CommonPrefixes><Prefix>Jazz/</Prefix></CommonPrefixes>
  <CommonPrefixes><Prefix></Prefix></CommonPrefixes>
  <CommonPrefixes><Prefix>Rock &amp; Roll/</Prefix></CommonPrefixes>
</ListBucketResult>"#;

    #[test]
    fn test_folders_in_document_order() {
        let folders = folders(ROOT_LISTING);
        let prefixes: Vec<&str> = folders.iter().map(|f| f.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["Electronic/", "Jazz/", "Rock & Roll/"]);
        assert!(folders.iter().all(|f| f.name == f.prefix));
    }

    #[test]
    fn test_folder_listing_ignores_bucket_level_prefix() {
        // The top-level <Prefix> is outside any CommonPrefixes element
        let xml = "<ListBucketResult><Prefix>ignored/</Prefix></ListBucketResult>";
        assert!(folders(xml).is_empty());
    }

    #[test]
    fn test_files_filter_extension_and_size() {
        let xml = r#"<ListBucketResult>
  <Contents><Key>Rock/</Key><Size>0</Size></Contents>
  <Contents><Key>Rock/Song.mp3</Key><Size>100</Size></Contents>
  <Contents><Key>Rock/cover.jpg</Key><Size>2048</Size></Contents>
  <Contents><Key>Rock/LOUD.MP3</Key><Size>2048</Size></Contents>
  <Contents><Key>Rock/empty.mp3</Key><Size>0</Size></Contents>
  <Contents><Key>Rock/nosize.mp3</Key></Contents>
  <Contents><Key>Rock/junk.mp3</Key><Size>abc</Size></Contents>
</ListBucketResult>"#;

        let files = files(xml, "Rock/");
        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0],
            FileEntry {
                name: "Song.mp3".into(),
                key: "Rock/Song.mp3".into(),
                url: "https://tasty-mixes.s3.us-east-1.amazonaws.com/Rock/Song.mp3".into(),
                size: 100,
                last_modified: None,
            }
        );
    }

    #[test]
    fn test_file_url_is_encoded_per_segment() {
        let xml = "<ListBucketResult><Contents><Key>My Mixes/Track One.mp3</Key>\
                   <Size>42</Size></Contents></ListBucketResult>";
        let files = files(xml, "My Mixes/");
        assert_eq!(files[0].name, "Track One.mp3");
        assert!(files[0].url.ends_with("/My%20Mixes/Track%20One.mp3"));
    }

    #[test]
    fn test_name_keeps_full_key_when_prefix_does_not_match() {
        let xml = "<ListBucketResult><Contents><Key>Jazz/Blue.mp3</Key>\
                   <Size>10</Size></Contents></ListBucketResult>";
        let files = files(xml, "Rock/");
        assert_eq!(files[0].name, "Jazz/Blue.mp3");
    }

    #[test]
    fn test_files_keep_listing_order_and_timestamps() {
        let xml = r#"<ListBucketResult>
  <Contents><Key>Jazz/b.mp3</Key><LastModified>2024-03-01T10:00:00.000Z</LastModified><Size>2</Size></Contents>
  <Contents><Key>Jazz/a.mp3</Key><LastModified>not a date</LastModified><Size>1</Size></Contents>
</ListBucketResult>"#;
        let files = files(xml, "Jazz/");
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.mp3", "a.mp3"]);
        assert_eq!(
            files[0].last_modified,
            Some("2024-03-01T10:00:00Z".parse().unwrap())
        );
        assert!(files[1].last_modified.is_none());
    }

    #[test]
    fn test_error_document() {
        let xml = "<Error><Code>AccessDenied</Code><Message>Denied</Message></Error>";
        let parsed = parse_listing(xml, &ListingRequest::folders(), &bucket()).unwrap();
        assert_eq!(
            parsed,
            ParsedListing::Error(ListingError::new("AccessDenied", "Denied"))
        );
    }

    #[test]
    fn test_error_wins_over_entries() {
        let xml = "<ListBucketResult>\
                   <Contents><Key>Rock/Song.mp3</Key><Size>100</Size></Contents>\
                   <Error><Code>SlowDown</Code></Error>\
                   </ListBucketResult>";
        let parsed = parse_listing(xml, &ListingRequest::files("Rock/"), &bucket()).unwrap();
        assert_eq!(
            parsed,
            ParsedListing::Error(ListingError::new("SlowDown", "Unknown error"))
        );
    }

    #[test]
    fn test_empty_error_uses_defaults() {
        let parsed = parse_listing("<Error/>", &ListingRequest::folders(), &bucket()).unwrap();
        assert_eq!(
            parsed,
            ParsedListing::Error(ListingError::new("Unknown", "Unknown error"))
        );
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        for xml in [
            "",
            "not xml at all",
            "<ListBucketResult><Contents>",
            "<a><b></a></b>",
        ] {
            let result = parse_listing(xml, &ListingRequest::folders(), &bucket());
            assert!(
                matches!(result, Err(Error::Parse(_))),
                "expected parse error for {xml:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_cdata_key() {
        let xml = "<ListBucketResult><Contents><Key><![CDATA[Rock/A&B.mp3]]></Key>\
                   <Size>5</Size></Contents></ListBucketResult>";
        let files = files(xml, "Rock/");
        assert_eq!(files[0].name, "A&B.mp3");
        assert!(files[0].url.ends_with("/Rock/A%26B.mp3"));
    }
}
