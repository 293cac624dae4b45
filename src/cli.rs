//! Command-line front end.
//!
//! Each invocation is one session: it opens the library from the configured
//! storage directory, applies at most one mutation, and exits.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::file::{
    decode_data_uri, format_size, DirStore, FileItem, KeyValueStore, Library, PendingUpload,
    QuotaUsage, SaveOutcome, StoreAdapter, ViewTab,
};
use crate::notify::{ConsoleNotifier, Notifier};
use crate::user::{identity_name, User};
use crate::web::WebServer;
use crate::{Result, ShareError};

/// Pastis 12/12 file sharing.
#[derive(Parser, Debug)]
#[command(name = "pastis", version)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the web application and the health check.
    Serve,

    /// List the identities a session can use.
    Users,

    /// List a folder (the root by default).
    Ls {
        /// Folder to list.
        #[arg(short, long)]
        folder: Option<String>,
        /// Only show files uploaded by the session user.
        #[arg(short, long)]
        mine: bool,
        /// Session identity.
        #[arg(short, long)]
        user: Option<User>,
    },

    /// Create a folder.
    Mkdir {
        name: String,
        /// Parent folder (root by default).
        #[arg(short, long)]
        parent: Option<String>,
        #[arg(short, long)]
        user: Option<User>,
    },

    /// Upload files as one all-or-nothing batch.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Destination folder (root by default).
        #[arg(short, long)]
        folder: Option<String>,
        #[arg(short, long)]
        user: Option<User>,
    },

    /// Delete a file. Unknown IDs are ignored.
    Rm { id: String },

    /// Show a file's details and comments.
    Info { id: String },

    /// Write a file's content to disk.
    Get {
        id: String,
        /// Output path (the file's name by default).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Execute one command.
pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Serve => WebServer::new(&config.server, &config.web)?.run().await,
        Command::Users => {
            for user in User::ALL {
                println!("{}  {user}", user.initial());
            }
            Ok(())
        }
        command => {
            let mut library = open_library(config)?;
            let output = execute(&mut library, command).await?;
            print!("{output}");
            Ok(())
        }
    }
}

fn open_library(config: &Config) -> Result<Library<DirStore, ConsoleNotifier>> {
    let store = DirStore::new(&config.storage.path, config.storage.capacity_bytes)?;
    Ok(Library::open(StoreAdapter::new(store, ConsoleNotifier))
        .with_quota_limit(config.storage.capacity_bytes))
}

fn require_folder<S: KeyValueStore, N: Notifier>(
    library: &Library<S, N>,
    folder: Option<&str>,
) -> Result<()> {
    match folder {
        Some(id) if library.catalog().folder(id).is_none() => {
            Err(ShareError::NotFound(format!("folder {id}")))
        }
        _ => Ok(()),
    }
}

fn ensure_saved(outcome: SaveOutcome) -> Result<()> {
    if outcome.is_saved() {
        Ok(())
    } else {
        Err(ShareError::NotSaved(outcome))
    }
}

/// Where `get` writes when no output path is given: the bare file name,
/// never a path outside the working directory.
fn default_output(name: &str) -> Result<PathBuf> {
    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| ShareError::Validation(format!("unusable file name: {name:?}")))
}

/// Apply a library command and return what to print.
pub async fn execute<S: KeyValueStore, N: Notifier>(
    library: &mut Library<S, N>,
    command: Command,
) -> Result<String> {
    match command {
        Command::Ls { folder, mine, user } => {
            let tab = if mine { ViewTab::Mine } else { ViewTab::All };
            Ok(render_listing(library, folder.as_deref(), tab, user))
        }
        Command::Mkdir { name, parent, user } => {
            require_folder(library, parent.as_deref())?;
            let (folder, outcome) = library
                .create_folder(&name, parent.as_deref(), user)
                .ok_or_else(|| ShareError::Validation("folder name is empty".to_string()))?;
            ensure_saved(outcome)?;
            Ok(format!("{}\n", folder.id))
        }
        Command::Upload {
            files,
            folder,
            user,
        } => {
            require_folder(library, folder.as_deref())?;
            let pending = files.into_iter().map(PendingUpload::from_path).collect();
            let summary = library.upload(pending, folder.as_deref(), user).await?;
            ensure_saved(summary.outcome)?;
            Ok(format!("{} file(s) uploaded\n", summary.count))
        }
        Command::Rm { id } => {
            let existed = library.catalog().file(&id).is_some();
            ensure_saved(library.delete_file(&id))?;
            if existed {
                Ok(format!("{id} deleted\n"))
            } else {
                Ok(String::new())
            }
        }
        Command::Get { id, output } => {
            let file = library
                .catalog()
                .file(&id)
                .ok_or_else(|| ShareError::NotFound(format!("file {id}")))?;
            let content = decode_data_uri(&file.data)?;
            let path = match output {
                Some(path) => path,
                None => default_output(&file.name)?,
            };
            tokio::fs::write(&path, &content.bytes).await?;
            Ok(format!("{}\n", path.display()))
        }
        Command::Info { id } => {
            let file = library
                .catalog()
                .file(&id)
                .ok_or_else(|| ShareError::NotFound(format!("file {id}")))?;
            Ok(render_details(file))
        }
        Command::Serve | Command::Users => Err(ShareError::Validation(
            "command does not use the file library".to_string(),
        )),
    }
}

/// Render a folder view: breadcrumbs, title, folders, files, then the sidebar.
pub fn render_listing<S: KeyValueStore, N: Notifier>(
    library: &Library<S, N>,
    folder: Option<&str>,
    tab: ViewTab,
    user: Option<User>,
) -> String {
    let catalog = library.catalog();
    let mut out = String::new();

    let mut crumbs = vec!["Distillerie".to_string()];
    crumbs.extend(
        catalog
            .breadcrumb_path(folder)
            .iter()
            .map(|f| f.name.clone()),
    );
    let _ = writeln!(out, "{}", crumbs.join(" / "));
    let _ = writeln!(out, "== {} ==", catalog.folder_title(folder));

    let listing = catalog.view(folder, tab, identity_name(user));
    for f in &listing.folders {
        match f.created_at_datetime() {
            Some(created) => {
                let _ = writeln!(
                    out,
                    "📁 {}  {}  Par {} • {}",
                    f.id,
                    f.name,
                    f.created_by,
                    created.format("%Y-%m-%d")
                );
            }
            None => {
                let _ = writeln!(out, "📁 {}  {}", f.id, f.name);
            }
        }
    }
    for f in &listing.files {
        let date = upload_date(f);
        let _ = writeln!(
            out,
            "{} {}  {}  {}  Par {} • {}  💬 {}",
            f.kind().icon(),
            f.id,
            f.name,
            format_size(f.size),
            f.uploaded_by,
            date,
            f.comments.len()
        );
    }
    if listing.is_empty() {
        let _ = writeln!(out, "Aucun fichier dans ce dossier");
    }

    render_sidebar(library, &mut out);
    out
}

fn upload_date(file: &FileItem) -> String {
    file.uploaded_at_datetime()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| file.uploaded_at.clone())
}

/// Text rendition of a quota bar, `width` cells wide.
fn quota_bar(usage: &QuotaUsage, width: usize) -> String {
    let filled = ((usage.percent() / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        usage.percent()
    )
}

/// Root folders and catalog statistics, shown under every listing.
fn render_sidebar<S: KeyValueStore, N: Notifier>(
    library: &Library<S, N>,
    out: &mut String,
) {
    let catalog = library.catalog();

    let _ = writeln!(out, "\n-- Dossiers --");
    let _ = writeln!(out, "📂 Tous les fichiers");
    let roots = catalog.root_folders();
    for f in &roots {
        let _ = writeln!(out, "📁 {}  {}", f.id, f.name);
    }
    if roots.is_empty() {
        let _ = writeln!(out, "Aucun dossier créé");
    }

    let quota = library.quota();
    let _ = writeln!(out, "\n-- Statistiques --");
    let _ = writeln!(out, "Total Fichiers: {}", catalog.files().len());
    let _ = writeln!(out, "Dossiers: {}", catalog.folders().len());
    let _ = writeln!(out, "Espace utilisé: {quota} {}", quota_bar(&quota, 20));
}

/// Detail view of one file.
pub fn render_details(file: &FileItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", file.kind().icon(), file.name);
    let _ = writeln!(out, "Type: {}", file.subtype_label());
    let _ = writeln!(out, "Taille: {}", format_size(file.size));
    let _ = writeln!(out, "Auteur: {}", file.uploaded_by);
    let _ = writeln!(out, "Chargé le: {}", upload_date(file));
    let _ = writeln!(out, "Commentaires ({})", file.comments.len());
    for c in &file.comments {
        let _ = writeln!(out, "  {} ({}): {}", c.user, c.date, c.text);
    }
    if file.comments.is_empty() {
        let _ = writeln!(out, "  Aucun commentaire sur ce document.");
    }
    out
}
