//! Display helpers: human-readable sizes, file categories and the quota bar.

use std::fmt;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

const MIB: f64 = 1024.0 * 1024.0;

/// Trim trailing zeros (and a dangling point) from a fixed-point number.
fn trim_decimal(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Format a byte count, e.g. `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.4 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimal(format!("{value:.2}")), SIZE_UNITS[unit])
}

/// Broad category of a file, used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Spreadsheet,
    Document,
    Image,
    Other,
}

impl FileKind {
    /// Classify a media type string. Unknown or empty types are `Other`.
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();
        if media_type.contains("pdf") {
            FileKind::Pdf
        } else if ["spreadsheet", "excel", "csv"]
            .iter()
            .any(|k| media_type.contains(k))
        {
            FileKind::Spreadsheet
        } else if media_type.contains("word") {
            FileKind::Document
        } else if media_type.contains("image") {
            FileKind::Image
        } else {
            FileKind::Other
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FileKind::Pdf => "📄",
            FileKind::Spreadsheet => "📊",
            FileKind::Document => "📝",
            FileKind::Image => "🖼️",
            FileKind::Other => "📎",
        }
    }
}

/// Storage usage against the display-only budget.
///
/// Nothing is enforced here; the storage backend has its own capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaUsage {
    /// Sum of file sizes in bytes.
    pub used: u64,
    /// Budget in bytes.
    pub limit: u64,
}

impl QuotaUsage {
    pub fn new(used: u64, limit: u64) -> Self {
        Self { used, limit }
    }

    /// Fill ratio in percent, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.limit == 0 {
            return 100.0;
        }
        (self.used as f64 / self.limit as f64 * 100.0).min(100.0)
    }
}

impl fmt::Display for QuotaUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} MB / {} MB",
            self.used as f64 / MIB,
            trim_decimal(format!("{:.1}", self.limit as f64 / MIB))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(100), "100 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(870_400), "850 KB");
        assert_eq!(format_size(2_516_582), "2.4 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_media_type("application/pdf"), FileKind::Pdf);
        assert_eq!(
            FileKind::from_media_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            FileKind::Spreadsheet
        );
        assert_eq!(FileKind::from_media_type("text/csv"), FileKind::Spreadsheet);
        assert_eq!(
            FileKind::from_media_type("application/msword"),
            FileKind::Document
        );
        assert_eq!(FileKind::from_media_type("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_media_type(""), FileKind::Other);
        assert_eq!(FileKind::from_media_type("application/zip"), FileKind::Other);
    }

    #[test]
    fn test_quota_display() {
        let usage = QuotaUsage::new(1_258_291, 5 * 1024 * 1024);
        assert_eq!(usage.to_string(), "1.2 MB / 5 MB");
        assert!((usage.percent() - 24.0).abs() < 0.1);
    }

    #[test]
    fn test_quota_percent_capped() {
        assert_eq!(QuotaUsage::new(10, 5).percent(), 100.0);
        assert_eq!(QuotaUsage::new(0, 0).percent(), 100.0);
    }
}
