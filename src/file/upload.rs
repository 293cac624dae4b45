//! Upload batches and inline (data URI) content.
//!
//! A batch is the set of files picked in one upload action. Every file is
//! read and encoded on its own task; the batch only succeeds when all of
//! them do, so callers never see a partially encoded batch.

use std::io;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use super::id::{generate_file_id, now_timestamp};
use super::metadata::FileItem;

/// Media type used in a data URI when the file's type is unknown.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Errors that fail a whole upload batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Nothing was selected.
    #[error("no files selected")]
    Empty,

    /// One file could not be read.
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    /// An encoding task did not complete.
    #[error("encoding task failed: {0}")]
    Task(String),
}

/// Errors decoding a data URI.
#[derive(Error, Debug)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,

    #[error("data URI has no payload separator")]
    MissingPayload,

    #[error("only base64 data URIs are supported")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decoded content of a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Encode bytes as `data:<media type>;base64,<payload>`.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    let media_type = if media_type.is_empty() {
        FALLBACK_MEDIA_TYPE
    } else {
        media_type
    };
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<DataUri, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;

    Ok(DataUri {
        media_type: media_type.to_string(),
        bytes: STANDARD.decode(payload)?,
    })
}

/// A file selected for upload, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// Where to read the bytes from.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    /// Media type; empty when unknown.
    pub media_type: String,
}

impl PendingUpload {
    /// Describe a local file, guessing its media type from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = mime_guess::from_path(&path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default();

        Self {
            path,
            name,
            media_type,
        }
    }
}

/// One successfully read file.
struct Encoded {
    upload: PendingUpload,
    size: u64,
    data: String,
}

async fn encode_one(upload: PendingUpload) -> Result<Encoded, BatchError> {
    let bytes = tokio::fs::read(&upload.path)
        .await
        .map_err(|source| BatchError::Read {
            name: upload.name.clone(),
            source,
        })?;

    let data = encode_data_uri(&upload.media_type, &bytes);
    Ok(Encoded {
        size: bytes.len() as u64,
        data,
        upload,
    })
}

/// Read and encode every pending file concurrently.
///
/// Returns the new file records in selection order, or the first failure.
/// On failure no record is produced at all.
pub async fn encode_batch(
    pending: Vec<PendingUpload>,
    folder_id: Option<String>,
    uploaded_by: &str,
) -> Result<Vec<FileItem>, BatchError> {
    if pending.is_empty() {
        return Err(BatchError::Empty);
    }

    let tasks = pending.into_iter().map(|upload| async move {
        match tokio::spawn(encode_one(upload)).await {
            Ok(result) => result,
            Err(e) => Err(BatchError::Task(e.to_string())),
        }
    });
    let encoded = futures::future::try_join_all(tasks).await?;

    tracing::debug!(count = encoded.len(), "Upload batch encoded");

    Ok(encoded
        .into_iter()
        .map(|e| FileItem {
            id: generate_file_id(),
            name: e.upload.name,
            media_type: e.upload.media_type,
            size: e.size,
            data: e.data,
            folder_id: folder_id.clone(),
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: now_timestamp(),
            comments: Vec::new(),
        })
        .collect())
}
