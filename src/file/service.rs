//! File library service for Pastis Share.
//!
//! This module pairs the in-memory catalog with its store:
//! - The catalog is loaded once when the library opens
//! - Every mutation is followed by exactly one full-document save
//! - Upload batches are committed atomically

use crate::notify::{Notifier, UPLOAD_FAILED_MESSAGE};
use crate::user::{identity_name, User};

use super::catalog::Catalog;
use super::display::QuotaUsage;
use super::folder::Folder;
use super::id::{generate_folder_id, now_timestamp};
use super::metadata::FileItem;
use super::storage::{KeyValueStore, SaveOutcome, StoreAdapter};
use super::upload::{encode_batch, BatchError, PendingUpload};
use super::DEFAULT_CAPACITY_BYTES;

/// A committed upload batch.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    /// Number of files added to the catalog.
    pub count: usize,
    /// How the save following the commit went.
    pub outcome: SaveOutcome,
}

/// A session's view of the file library.
pub struct Library<S, N> {
    catalog: Catalog,
    adapter: StoreAdapter<S, N>,
    quota_limit: u64,
}

impl<S: KeyValueStore, N: Notifier> Library<S, N> {
    /// Open the library, loading the catalog from the adapter's slot.
    pub fn open(adapter: StoreAdapter<S, N>) -> Self {
        let catalog = Catalog::from_document(adapter.load());
        tracing::info!(
            files = catalog.files().len(),
            folders = catalog.folders().len(),
            "File library loaded"
        );

        Self {
            catalog,
            adapter,
            quota_limit: DEFAULT_CAPACITY_BYTES,
        }
    }

    /// Set the budget shown by [`Library::quota`].
    pub fn with_quota_limit(mut self, limit: u64) -> Self {
        self.quota_limit = limit;
        self
    }

    /// Get the current catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the store adapter.
    pub fn adapter(&self) -> &StoreAdapter<S, N> {
        &self.adapter
    }

    /// Storage usage for the quota bar.
    pub fn quota(&self) -> QuotaUsage {
        QuotaUsage::new(self.catalog.total_bytes(), self.quota_limit)
    }

    fn persist(&mut self) -> SaveOutcome {
        self.adapter.save(self.catalog.document())
    }

    /// Add a file, then save.
    pub fn add_file(&mut self, file: FileItem) -> SaveOutcome {
        tracing::debug!(file_id = %file.id, "Adding file");
        self.catalog.add_file(file);
        self.persist()
    }

    /// Add a folder, then save.
    pub fn add_folder(&mut self, folder: Folder) -> SaveOutcome {
        tracing::debug!(folder_id = %folder.id, "Adding folder");
        self.catalog.add_folder(folder);
        self.persist()
    }

    /// Delete a file, then save. Deleting an unknown ID changes nothing but
    /// still rewrites the document.
    pub fn delete_file(&mut self, id: &str) -> SaveOutcome {
        match self.catalog.delete_file(id) {
            Some(file) => tracing::info!(file_id = %file.id, name = %file.name, "File deleted"),
            None => tracing::debug!(file_id = %id, "Delete of unknown file ignored"),
        }
        self.persist()
    }

    /// Add every file of an encoded batch, then save once.
    ///
    /// Files are prepended one after another, so the last file of the batch
    /// ends up first.
    pub fn commit_batch(&mut self, files: Vec<FileItem>) -> SaveOutcome {
        for file in files {
            self.catalog.add_file(file);
        }
        self.persist()
    }

    /// Create a folder named `name` under `parent`.
    ///
    /// The name is trimmed; a blank name creates nothing and returns `None`.
    pub fn create_folder(
        &mut self,
        name: &str,
        parent: Option<&str>,
        user: Option<User>,
    ) -> Option<(Folder, SaveOutcome)> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut folder = Folder::new(generate_folder_id(), name)
            .with_creator(identity_name(user))
            .with_created_at(now_timestamp());
        folder.parent_folder_id = parent.map(str::to_string);

        tracing::info!(folder_id = %folder.id, name = %folder.name, "Folder created");
        let outcome = self.add_folder(folder.clone());
        Some((folder, outcome))
    }

    /// Encode and add a batch of files.
    ///
    /// Either every file is added (one save) or none is: on failure the user
    /// is notified once and the catalog is left untouched. An empty selection
    /// does nothing at all.
    pub async fn upload(
        &mut self,
        pending: Vec<PendingUpload>,
        folder_id: Option<&str>,
        user: Option<User>,
    ) -> Result<UploadSummary, BatchError> {
        if pending.is_empty() {
            return Err(BatchError::Empty);
        }

        let uploaded_by = identity_name(user);
        match encode_batch(pending, folder_id.map(str::to_string), uploaded_by).await {
            Ok(files) => {
                let count = files.len();
                tracing::info!(count, uploaded_by, "Upload batch committed");
                let outcome = self.commit_batch(files);
                Ok(UploadSummary { count, outcome })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Upload batch discarded");
                self.adapter.notifier().alert(UPLOAD_FAILED_MESSAGE);
                Err(e)
            }
        }
    }
}
