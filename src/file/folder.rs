//! Folder records for the file library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named container of files and folders.
///
/// Missing fields deserialize to their defaults so that documents written by
/// older versions still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Folder {
    /// Unique folder ID.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Identity that created the folder.
    pub created_by: String,
    /// Creation time (ISO-8601 text, kept verbatim).
    pub created_at: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_folder_id: Option<String>,
}

impl Folder {
    /// Create a root-level folder with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_folder_id = Some(parent_id.into());
        self
    }

    /// Set the creator.
    pub fn with_creator(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Set the creation time.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Get the created_at as DateTime<Utc>, if it parses.
    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
