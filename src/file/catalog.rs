//! In-memory catalog of files and folders.
//!
//! The catalog holds exactly what the persisted document holds. Mutations
//! here never touch storage; [`super::Library`] pairs each one with a save.

use std::collections::HashSet;

use super::folder::Folder;
use super::metadata::FileItem;
use super::storage::CatalogDocument;
use super::ROOT_TITLE;

/// Which files of a folder the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewTab {
    /// Every file.
    #[default]
    All,
    /// Only the current user's uploads.
    Mine,
}

/// Direct children of one folder (or of the root).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing<'a> {
    pub folders: Vec<&'a Folder>,
    pub files: Vec<&'a FileItem>,
}

impl Listing<'_> {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Treat an empty reference like the root, as a falsy id would be.
fn normalize(folder_id: Option<&str>) -> Option<&str> {
    folder_id.filter(|id| !id.is_empty())
}

/// The in-memory (files, folders) collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    document: CatalogDocument,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding a loaded document.
    pub fn from_document(document: CatalogDocument) -> Self {
        Self { document }
    }

    /// The document mirrored to storage.
    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    pub fn into_document(self) -> CatalogDocument {
        self.document
    }

    /// All files, newest upload first.
    pub fn files(&self) -> &[FileItem] {
        &self.document.files
    }

    /// All folders, in creation order.
    pub fn folders(&self) -> &[Folder] {
        &self.document.folders
    }

    /// Prepend a file. Duplicate IDs and unknown folders are not checked.
    pub fn add_file(&mut self, file: FileItem) {
        self.document.files.insert(0, file);
    }

    /// Append a folder. Parent existence, cycles and duplicate names are not
    /// checked.
    pub fn add_folder(&mut self, folder: Folder) {
        self.document.folders.push(folder);
    }

    /// Remove the first file with the given ID. Returns the removed file, or
    /// `None` if there was none.
    pub fn delete_file(&mut self, id: &str) -> Option<FileItem> {
        let index = self.document.files.iter().position(|f| f.id == id)?;
        Some(self.document.files.remove(index))
    }

    /// Look up a folder by ID.
    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.document.folders.iter().find(|f| f.id == id)
    }

    /// Look up a file by ID.
    pub fn file(&self, id: &str) -> Option<&FileItem> {
        self.document.files.iter().find(|f| f.id == id)
    }

    /// Folders and files whose parent reference equals `folder_id`.
    pub fn children_of(&self, folder_id: Option<&str>) -> Listing<'_> {
        let folder_id = normalize(folder_id);
        Listing {
            folders: self
                .document
                .folders
                .iter()
                .filter(|f| normalize(f.parent_folder_id.as_deref()) == folder_id)
                .collect(),
            files: self
                .document
                .files
                .iter()
                .filter(|f| normalize(f.folder_id.as_deref()) == folder_id)
                .collect(),
        }
    }

    /// Folders directly under the root.
    pub fn root_folders(&self) -> Vec<&Folder> {
        self.children_of(None).folders
    }

    /// Path from the root down to `folder_id`, inclusive.
    ///
    /// The walk stops at a root-level folder, at a dangling parent reference,
    /// or at the first folder seen twice. A parent cycle therefore yields a
    /// truncated path instead of looping.
    pub fn breadcrumb_path(&self, folder_id: Option<&str>) -> Vec<&Folder> {
        let mut crumbs = Vec::new();
        let mut visited = HashSet::new();
        let mut current = normalize(folder_id);

        while let Some(id) = current {
            let Some(folder) = self.folder(id) else {
                break;
            };
            if !visited.insert(folder.id.as_str()) {
                tracing::warn!(folder_id = %folder.id, "Folder parent cycle detected");
                break;
            }
            crumbs.push(folder);
            current = normalize(folder.parent_folder_id.as_deref());
        }

        crumbs.reverse();
        crumbs
    }

    /// Title of a view: the folder name, or the root title when the folder
    /// is the root or does not resolve.
    pub fn folder_title(&self, folder_id: Option<&str>) -> &str {
        normalize(folder_id)
            .and_then(|id| self.folder(id))
            .map(|f| f.name.as_str())
            .unwrap_or(ROOT_TITLE)
    }

    /// Dashboard listing for a folder, optionally restricted to `user`'s
    /// uploads.
    pub fn view(&self, folder_id: Option<&str>, tab: ViewTab, user: &str) -> Listing<'_> {
        let mut listing = self.children_of(folder_id);
        if tab == ViewTab::Mine {
            listing.files = filter_by_uploader(listing.files, user);
        }
        listing
    }

    /// Sum of all file sizes.
    pub fn total_bytes(&self) -> u64 {
        total_bytes(&self.document.files)
    }
}

/// Files uploaded by `user`, in their original order.
pub fn filter_by_uploader<'a, I>(files: I, user: &str) -> Vec<&'a FileItem>
where
    I: IntoIterator<Item = &'a FileItem>,
{
    files
        .into_iter()
        .filter(|f| f.uploaded_by == user)
        .collect()
}

/// Sum of `size` across the files, saturating at `u64::MAX`.
pub fn total_bytes<'a, I>(files: I) -> u64
where
    I: IntoIterator<Item = &'a FileItem>,
{
    files
        .into_iter()
        .fold(0u64, |acc, f| acc.saturating_add(f.size))
}
