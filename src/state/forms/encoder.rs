//! File-to-data-URL encoding for attachment fields
//!
//! Selections are size-checked from metadata before any bytes are read.
//! Each selection for a field is stamped with a generation so a slow,
//! superseded encoding can never overwrite a newer one.

use super::error::WizardError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default attachment limit (1 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format a byte count for messages
pub fn human_bytes(bytes: u64) -> String {
    if bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{} MiB", bytes / MIB)
        } else {
            format!("{:.1} MiB", bytes as f64 / MIB as f64)
        }
    } else if bytes >= KIB {
        if bytes % KIB == 0 {
            format!("{} KiB", bytes / KIB)
        } else {
            format!("{:.1} KiB", bytes as f64 / KIB as f64)
        }
    } else {
        format!("{bytes} B")
    }
}

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Size of the payload a data URL carries, without decoding it
pub fn decoded_len(url: &str) -> Option<u64> {
    let (_, payload) = url.strip_prefix("data:")?.split_once(";base64,")?;
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    let len = payload.len();
    if len % 4 != 0 {
        return None;
    }
    Some((len / 4 * 3).saturating_sub(padding) as u64)
}

/// MIME type of a data URL, without decoding the payload
pub fn data_url_mime(url: &str) -> Option<&str> {
    let (mime, _) = url.strip_prefix("data:")?.split_once(";base64,")?;
    Some(mime)
}

/// A decoded data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn encode(mime: &str, bytes: &[u8]) -> String {
        format!("data:{mime};base64,{}", STANDARD.encode(bytes))
    }

    pub fn parse(url: &str) -> Result<Self, WizardError> {
        let (mime, payload) = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .ok_or(WizardError::MalformedDataUrl)?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| WizardError::MalformedDataUrl)?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// A local file the user picked, already size-checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: &'static str,
}

/// Reads and encodes selected files under a size limit
#[derive(Debug, Clone, Copy)]
pub struct FileEncoder {
    max_bytes: u64,
}

impl Default for FileEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl FileEncoder {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn check_size(&self, name: &str, size: u64) -> Result<(), WizardError> {
        if size > self.max_bytes {
            return Err(WizardError::FileTooLarge {
                name: name.to_string(),
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Stat a path and reject it if it is too large. No content is read.
    pub async fn select(&self, path: impl AsRef<Path>) -> Result<SelectedFile, WizardError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| WizardError::FileUnreadable {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        if !metadata.is_file() {
            return Err(WizardError::FileUnreadable {
                name,
                reason: "not a regular file".to_string(),
            });
        }
        self.check_size(&name, metadata.len())?;
        Ok(SelectedFile {
            path: path.to_path_buf(),
            mime: mime_for_path(path),
            size: metadata.len(),
            name,
        })
    }

    /// Read the file and encode it as a data URL
    pub async fn encode(&self, file: &SelectedFile) -> Result<String, WizardError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| WizardError::FileUnreadable {
                name: file.name.clone(),
                reason: e.to_string(),
            })?;
        // The file may have grown since it was selected
        self.check_size(&file.name, bytes.len() as u64)?;
        Ok(DataUrl::encode(file.mime, &bytes))
    }
}

/// Identifies one encode attempt for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeTicket {
    pub field: String,
    pub generation: u64,
}

/// Generation bookkeeping for in-flight encodings
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    /// Latest generation issued per field
    issued: HashMap<String, u64>,
    /// Fields whose latest generation has not completed
    in_flight: HashMap<String, u64>,
}

impl UploadTracker {
    pub fn issue(&mut self, field: &str) -> EncodeTicket {
        let generation = self.issued.get(field).copied().unwrap_or(0) + 1;
        self.issued.insert(field.to_string(), generation);
        self.in_flight.insert(field.to_string(), generation);
        EncodeTicket {
            field: field.to_string(),
            generation,
        }
    }

    /// Whether the ticket is the newest selection for its field
    pub fn is_current(&self, ticket: &EncodeTicket) -> bool {
        self.issued.get(&ticket.field) == Some(&ticket.generation)
    }

    /// Mark the ticket finished. Returns false for superseded tickets.
    pub fn complete(&mut self, ticket: &EncodeTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight.remove(&ticket.field);
        true
    }

    pub fn is_pending(&self, field: &str) -> bool {
        self.in_flight.contains_key(field)
    }

    pub fn any_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(2048), "2 KiB");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(DEFAULT_MAX_UPLOAD_BYTES), "1 MiB");
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("proof.pdf")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_data_url_preserves_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let url = DataUrl::encode("image/png", &bytes);
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.bytes, bytes);
        assert_eq!(decoded_len(&url), Some(256));
    }

    #[test]
    fn test_data_url_mime_reads_prefix_only() {
        assert_eq!(data_url_mime("data:application/pdf;base64,JVBE"), Some("application/pdf"));
        // The payload is not decoded, so a bad one still yields the mime
        assert_eq!(data_url_mime("data:image/png;base64,!!"), Some("image/png"));
        assert_eq!(data_url_mime("image/png;base64,AAAA"), None);
    }

    #[test]
    fn test_decoded_len_with_padding() {
        assert_eq!(decoded_len("data:text/plain;base64,YQ=="), Some(1));
        assert_eq!(decoded_len("data:text/plain;base64,YWI="), Some(2));
        assert_eq!(decoded_len("not a url"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(DataUrl::parse("hello"), Err(WizardError::MalformedDataUrl));
        assert_eq!(
            DataUrl::parse("data:image/png;base64,@@@"),
            Err(WizardError::MalformedDataUrl)
        );
    }

    #[test]
    fn test_check_size_boundary() {
        let encoder = FileEncoder::default();
        assert!(encoder.check_size("a.png", DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            encoder.check_size("a.png", DEFAULT_MAX_UPLOAD_BYTES + 1),
            Err(WizardError::FileTooLarge {
                name: "a.png".to_string(),
                size: DEFAULT_MAX_UPLOAD_BYTES + 1,
                limit: DEFAULT_MAX_UPLOAD_BYTES,
            })
        );
    }

    #[tokio::test]
    async fn test_select_and_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let content = b"\x89PNG\r\n\x1a\nfake image body";
        std::fs::File::create(&path).unwrap().write_all(content).unwrap();

        let encoder = FileEncoder::default();
        let selected = encoder.select(&path).await.unwrap();
        assert_eq!(selected.name, "photo.png");
        assert_eq!(selected.size, content.len() as u64);
        assert_eq!(selected.mime, "image/png");

        let url = encoder.encode(&selected).await.unwrap();
        let preview = DataUrl::parse(&url).unwrap();
        assert_eq!(preview.bytes, content.to_vec());
    }

    #[tokio::test]
    async fn test_select_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let encoder = FileEncoder::new(32);
        let result = encoder.select(&path).await;
        assert!(matches!(
            result,
            Err(WizardError::FileTooLarge { size: 64, limit: 32, .. })
        ));
    }

    #[tokio::test]
    async fn test_select_missing_file() {
        let encoder = FileEncoder::default();
        let result = encoder.select("/definitely/not/here.png").await;
        assert!(matches!(result, Err(WizardError::FileUnreadable { .. })));
    }

    #[tokio::test]
    async fn test_select_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileEncoder::default().select(dir.path()).await;
        assert!(matches!(result, Err(WizardError::FileUnreadable { .. })));
    }

    #[test]
    fn test_tracker_generations_increase_per_field() {
        let mut tracker = UploadTracker::default();
        let a = tracker.issue("photo");
        let b = tracker.issue("photo");
        let other = tracker.issue("id_proof");
        assert_eq!(a.generation, 1);
        assert_eq!(b.generation, 2);
        assert_eq!(other.generation, 1);
    }

    #[test]
    fn test_tracker_ignores_superseded_ticket() {
        let mut tracker = UploadTracker::default();
        let a = tracker.issue("photo");
        let b = tracker.issue("photo");

        assert!(tracker.complete(&b));
        assert!(!tracker.is_pending("photo"));
        // A finishes last and must be dropped
        assert!(!tracker.complete(&a));
        assert!(!tracker.is_pending("photo"));
    }

    #[test]
    fn test_tracker_stays_pending_until_latest_completes() {
        let mut tracker = UploadTracker::default();
        let a = tracker.issue("photo");
        let _b = tracker.issue("photo");
        assert!(!tracker.complete(&a));
        assert!(tracker.is_pending("photo"));
        assert!(tracker.any_pending());
    }
}
