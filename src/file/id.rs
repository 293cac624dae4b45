//! Identifier and timestamp generation.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix appended to every identifier.
const SUFFIX_LENGTH: usize = 4;

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..BASE36_CHARS.len());
            BASE36_CHARS[idx] as char
        })
        .collect()
}

fn generate_id(prefix: &str) -> String {
    format!(
        "{prefix}_{}{}",
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}

/// New file identifier: `file_<epoch millis><4 base36 chars>`.
pub fn generate_file_id() -> String {
    generate_id("file")
}

/// New folder identifier: `folder_<epoch millis><4 base36 chars>`.
pub fn generate_folder_id() -> String {
    generate_id("folder")
}

/// Current time as RFC 3339 UTC with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
