//! The extracted file and its metadata.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::warn;

/// Data about the PDF file itself.
///
/// The crop margins record the fixed page crop that was active during
/// extraction (see [`crate::config::ExtractionParams::page_crop_margins`]).
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// File name including extension
    pub name: String,
    /// Path the file was read from
    pub path: String,
    /// Number of pages in the document
    pub page_count: usize,
    /// Crop distance from the top of each page
    pub crop_top: f64,
    /// Crop distance from the bottom of each page
    pub crop_bottom: f64,
    /// Crop distance from the left of each page
    pub crop_left: f64,
    /// Crop distance from the right of each page
    pub crop_right: f64,
    /// Document information metadata
    pub file_meta: FileMeta,
}

/// Metadata from the document information dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMeta {
    /// Author field
    pub author: Option<String>,
    /// Title field
    pub title: Option<String>,
    /// Subject field
    pub subject: Option<String>,
    /// Creator field (the producing application)
    pub creator: Option<String>,
    /// Producer field (the PDF library)
    pub producer: Option<String>,
    /// Keywords field
    pub keywords: Option<String>,
    /// Creation date
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Last modification date
    pub modified_date: Option<DateTime<FixedOffset>>,
    /// Printing trap flag
    pub trapped: Option<bool>,
}

impl File {
    /// Identifier addressing the file: `file.<identifier>`.
    ///
    /// The identifier is derived from the file name by replacing every
    /// character outside `[_a-zA-Z0-9]` with an underscore; a leading digit
    /// gets an underscore prepended. It can later be used to link between
    /// documents.
    pub fn id(&self) -> String {
        format!("file.{}", string_to_identifier(&self.name))
    }
}

/// Turn arbitrary text into an identifier matching `[_a-zA-Z][_a-zA-Z0-9]*`.
pub(crate) fn string_to_identifier(text: &str) -> String {
    let mut out: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Parse a PDF date string like `D:20110120163651-05'00'`.
///
/// The `D:` prefix and the apostrophes are optional, a trailing `Z` means
/// UTC. Dates without a timezone are interpreted as UTC. Returns `None` (with
/// a warning) for strings that do not parse.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let cleaned = raw.replace("D:", "").replace('\'', "").replace('Z', "+");
    let has_offset = cleaned.contains('+') || cleaned.contains('-');
    let parsed = if has_offset {
        let normalized = if cleaned.ends_with('+') {
            // bare "Z" suffix became a trailing '+'
            format!("{}0000", cleaned)
        } else {
            cleaned.clone()
        };
        DateTime::parse_from_str(&normalized, "%Y%m%d%H%M%S%z").ok()
    } else {
        NaiveDateTime::parse_from_str(&cleaned, "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    };
    if parsed.is_none() {
        warn!("could not parse PDF date string {:?}", raw);
    }
    parsed
}
