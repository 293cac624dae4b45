//! Pastis Share - file sharing for the Pastis 12/12 distillery.
//!
//! A small folder/file library whose whole state is one JSON document in a
//! key-value slot, plus a static host for the browser application.

pub mod cli;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod notify;
pub mod user;
pub mod web;

pub use config::Config;
pub use error::{Result, ShareError};
pub use file::{
    Catalog, CatalogDocument, DirStore, FileItem, Folder, KeyValueStore, Library, MemoryStore,
    SaveOutcome, StoreAdapter,
};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notifier};
pub use user::User;
pub use web::WebServer;
