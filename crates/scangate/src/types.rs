//! Core domain types shared by the gateway and the session client.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::session::ResourceRef;

/// Processing mode selector.
///
/// The two modes share an identical wire shape on both the gateway and the
/// backend; they differ only in the backend path suffix, the error label used
/// when the backend fails, and the suffix appended to suggested download
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Return a cleaned, perspective-corrected scan of the document image.
    Rectify,
    /// Return the text recognized in the document image.
    ExtractText,
}

impl Mode {
    /// Path suffix appended to the backend base URL for this mode.
    pub fn backend_path(self) -> &'static str {
        match self {
            Mode::Rectify => "/scan",
            Mode::ExtractText => "/ocr",
        }
    }

    /// Path of the client-facing gateway endpoint for this mode.
    pub fn gateway_path(self) -> &'static str {
        // Client-facing routes mirror the backend paths.
        self.backend_path()
    }

    /// Error label reported to the caller when the backend fails in this mode.
    pub fn error_label(self) -> &'static str {
        match self {
            Mode::Rectify => "backend scan failed",
            Mode::ExtractText => "backend OCR failed",
        }
    }

    /// Suffix appended to the stripped upload name for downloads.
    pub fn download_suffix(self) -> &'static str {
        match self {
            Mode::Rectify => "_scanned.jpg",
            Mode::ExtractText => "_recognized.txt",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Rectify => write!(f, "rectify"),
            Mode::ExtractText => write!(f, "extract-text"),
        }
    }
}

/// A file the user has selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name, used to derive the suggested download name.
    pub name: String,
    /// MIME type of the file contents.
    pub media_type: String,
    /// Raw file bytes, forwarded to the backend untouched.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
        Ok(Self { name, media_type, bytes })
    }
}

/// The outcome of one successful processing round trip.
///
/// Immutable once produced; a new result supersedes (never merges with) the
/// previous one. Both variants carry a [`ResourceRef`] so the result can be
/// offered for download without re-fetching.
#[derive(Debug)]
pub enum ProcessingResult {
    /// A binary artifact (the rectified image).
    Artifact {
        resource: ResourceRef,
        media_type: String,
    },
    /// Recognized text, kept decoded for inline display and also backed by a
    /// `text/plain` resource for download.
    Text { content: String, resource: ResourceRef },
}

impl ProcessingResult {
    /// The resource backing the download affordance for this result.
    pub fn resource(&self) -> &ResourceRef {
        match self {
            ProcessingResult::Artifact { resource, .. } => resource,
            ProcessingResult::Text { resource, .. } => resource,
        }
    }
}

/// Compute the suggested download name for a processed upload.
///
/// Strips the final `.<ext>` from the original name (only when a non-empty
/// extension is present) and appends the mode suffix, so `photo.png` becomes
/// `photo_scanned.jpg` in rectify mode and `note.jpg` becomes
/// `note_recognized.txt` in extract-text mode.
pub fn suggested_download_name(original: &str, mode: Mode) -> String {
    let stem = match original.rfind('.') {
        // A trailing dot is not an extension; keep the name whole.
        Some(idx) if idx + 1 < original.len() => &original[..idx],
        _ => original,
    };
    format!("{stem}{}", mode.download_suffix())
}
