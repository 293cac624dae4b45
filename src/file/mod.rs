//! File sharing module for Pastis Share.
//!
//! This module provides the client-side file library:
//! - Folder and file records with inline (data URI) content
//! - The in-memory catalog and its derived views
//! - A store adapter mirroring the catalog into one key-value slot
//! - All-or-nothing batch uploads

mod catalog;
mod display;
mod folder;
mod id;
mod metadata;
mod service;
mod storage;
mod upload;

pub use catalog::{filter_by_uploader, total_bytes, Catalog, Listing, ViewTab};
pub use display::{format_size, FileKind, QuotaUsage};
pub use folder::Folder;
pub use id::{generate_file_id, generate_folder_id, now_timestamp};
pub use metadata::{Comment, FileItem};
pub use service::{Library, UploadSummary};
pub use storage::{
    CatalogDocument, DirStore, KeyValueStore, MemoryStore, SaveOutcome, StoreAdapter, StoreError,
};
pub use upload::{
    decode_data_uri, encode_batch, encode_data_uri, BatchError, DataUri, DataUriError,
    PendingUpload,
};

/// Key of the storage slot holding the catalog document.
pub const STORAGE_KEY: &str = "pastis_12_12_storage";

/// Default storage capacity (5MB), the budget shown in the quota bar.
pub const DEFAULT_CAPACITY_BYTES: u64 = 5 * 1024 * 1024;

/// Title of the root view.
pub const ROOT_TITLE: &str = "Archives Globales";
