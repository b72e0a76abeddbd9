//! Multi-format text extraction.
//!
//! Normalizes PDF, DOCX, and plain-text uploads into a single
//! [`ParsedDocument`]: extracted text plus best-effort structural metadata.
//! Structure is advisory only; downstream consumers rely solely on `text`.
//!
//! Every failure surfaces as a tagged [`ParseError`], never a panic or a
//! propagated I/O error, so the orchestration layer can report a clean
//! per-document message. Partial success is disallowed: a parse yields the
//! full result or nothing.

pub mod docx;
pub mod pdf;
pub mod txt;

use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::errors::{ParseError, ValidationError};

/// Supported upload formats. Dispatch is by file extension only; upload
/// policy (size, virus scanning) is enforced upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            "txt" => Some(FileType::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Txt => "txt",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-page structural record for layout-aware PDF extraction.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub page_number: usize,
    pub text_length: usize,
    pub lines: Vec<String>,
}

/// Per-paragraph structural record for DOCX extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphRecord {
    pub text: String,
    pub style: String,
    pub alignment: Option<String>,
}

/// Format-specific best-effort structure. Never required for correctness
/// downstream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StructureInfo {
    Pdf {
        /// Pages that yielded text. Empty for the raw extraction tier,
        /// which has no structural introspection.
        pages: Vec<PageRecord>,
    },
    Docx {
        paragraphs: Vec<ParagraphRecord>,
        styles: BTreeSet<String>,
    },
    Txt {
        lines: Vec<String>,
    },
}

/// Document-level metadata: the format, counts, and recovery annotations
/// (which extraction tier ran, which encoding was used).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub file_type: FileType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_paragraphs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<&'static str>,
}

impl DocumentMetadata {
    fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            total_pages: None,
            total_paragraphs: None,
            total_lines: None,
            extractor: None,
            encoding: None,
        }
    }
}

/// Outcome of a successful parse. An empty `text` is a valid,
/// low-confidence result.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub text: String,
    pub structure: StructureInfo,
    pub metadata: DocumentMetadata,
}

/// Parses a document, dispatching on its file extension (case-insensitive).
/// Extensions outside the supported set fail immediately without touching
/// the file.
pub fn parse_document(path: &Path) -> Result<ParsedDocument, ParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match FileType::from_extension(&ext) {
        Some(FileType::Pdf) => pdf::parse(path),
        Some(FileType::Docx) => docx::parse(path),
        Some(FileType::Txt) => txt::parse(path),
        None => Err(ParseError::UnsupportedFormat(ext)),
    }
}

/// Pre-flight check: the path exists, is a regular file with a supported
/// extension, and its first byte is readable. Passing validation does not
/// guarantee the parse will succeed (a readable but corrupt PDF still
/// validates).
pub fn validate_file(path: &Path) -> Result<(), ValidationError> {
    let meta = std::fs::metadata(path).map_err(|_| ValidationError::Missing)?;
    if !meta.is_file() {
        return Err(ValidationError::NotAFile);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if FileType::from_extension(ext).is_none() {
        return Err(ValidationError::UnsupportedExtension);
    }

    let mut file =
        std::fs::File::open(path).map_err(|e| ValidationError::Unreadable(e.to_string()))?;
    let mut first = [0u8; 1];
    file.read(&mut first)
        .map_err(|e| ValidationError::Unreadable(e.to_string()))?;

    Ok(())
}
