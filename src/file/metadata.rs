//! File records for the file library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::display::FileKind;

/// A comment on a file. The field is carried in the document but nothing
/// creates comments yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub date: String,
}

/// One uploaded file, content included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileItem {
    /// Unique file ID.
    pub id: String,
    /// Original filename (display name).
    pub name: String,
    /// Media type reported at upload time (may be empty).
    #[serde(rename = "type")]
    pub media_type: String,
    /// File size in bytes.
    pub size: u64,
    /// Full content as a `data:` URI.
    pub data: String,
    /// Folder this file belongs to (None for root).
    pub folder_id: Option<String>,
    /// Identity of the uploader.
    pub uploaded_by: String,
    /// Upload time (ISO-8601 text, kept verbatim).
    pub uploaded_at: String,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

impl FileItem {
    /// Create an empty root-level file record with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the owning folder.
    pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Set the uploader.
    pub fn with_uploader(mut self, uploaded_by: impl Into<String>) -> Self {
        self.uploaded_by = uploaded_by.into();
        self
    }

    /// Set the size in bytes.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Set the encoded content.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the upload time.
    pub fn with_uploaded_at(mut self, uploaded_at: impl Into<String>) -> Self {
        self.uploaded_at = uploaded_at.into();
        self
    }

    /// Get the uploaded_at as DateTime<Utc>, if it parses.
    pub fn uploaded_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.uploaded_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Broad category of the file, derived from its media type.
    pub fn kind(&self) -> FileKind {
        FileKind::from_media_type(&self.media_type)
    }

    /// Subtype shown as the badge in the detail view ("pdf", "png", ...).
    pub fn subtype_label(&self) -> &str {
        self.media_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("Fichier")
    }
}
