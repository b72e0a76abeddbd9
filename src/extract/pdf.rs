//! Two-tier PDF text extraction.
//!
//! Tiers are an ordered strategy list with first-success semantics, not
//! nested error handling, so each tier is testable in isolation:
//!
//! 1. `layout`: layout-aware per-page extraction via `pdf-extract`. More
//!    accurate, collects per-page structure, but brittle against malformed
//!    files.
//! 2. `raw`: page-by-page extraction via `lopdf`. Robust but structurally
//!    blind; contributes only a page count.
//!
//! If both tiers fail the parse fails with the primary tier's error.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::ParseError;
use crate::extract::{DocumentMetadata, FileType, PageRecord, ParsedDocument, StructureInfo};

struct PdfExtraction {
    text: String,
    pages: Vec<PageRecord>,
    total_pages: usize,
}

type PdfStrategy = fn(&[u8]) -> Result<PdfExtraction, String>;

const STRATEGIES: [(&str, PdfStrategy); 2] =
    [("layout", extract_with_layout), ("raw", extract_raw)];

pub fn parse(path: &Path) -> Result<ParsedDocument, ParseError> {
    let bytes =
        std::fs::read(path).map_err(|e| ParseError::PdfExtractionFailed(e.to_string()))?;

    let mut primary_error: Option<String> = None;
    for (name, strategy) in STRATEGIES {
        match strategy(&bytes) {
            Ok(extraction) => {
                if primary_error.is_some() {
                    info!(extractor = name, "PDF fallback extraction succeeded");
                }
                let mut metadata = DocumentMetadata::new(FileType::Pdf);
                metadata.total_pages = Some(extraction.total_pages);
                metadata.extractor = Some(name);
                return Ok(ParsedDocument {
                    text: extraction.text,
                    structure: StructureInfo::Pdf {
                        pages: extraction.pages,
                    },
                    metadata,
                });
            }
            Err(e) => {
                warn!(extractor = name, error = %e, "PDF extraction tier failed");
                primary_error.get_or_insert(e);
            }
        }
    }

    Err(ParseError::PdfExtractionFailed(
        primary_error.unwrap_or_else(|| "no extraction strategy available".to_string()),
    ))
}

/// Layout-aware tier. Pages yielding no text are skipped from the structure
/// but do not abort the extraction; page texts are joined with a blank line.
fn extract_with_layout(bytes: &[u8]) -> Result<PdfExtraction, String> {
    let page_texts =
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())?;

    let mut pages = Vec::new();
    let mut kept: Vec<&str> = Vec::new();
    for (index, page_text) in page_texts.iter().enumerate() {
        if page_text.trim().is_empty() {
            continue;
        }
        pages.push(PageRecord {
            page_number: index + 1,
            text_length: page_text.len(),
            lines: page_text.lines().map(str::to_string).collect(),
        });
        kept.push(page_text);
    }

    let total_pages = pages.len();
    Ok(PdfExtraction {
        text: kept.join("\n\n"),
        pages,
        total_pages,
    })
}

/// Raw tier. No structural introspection beyond the page count.
fn extract_raw(bytes: &[u8]) -> Result<PdfExtraction, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().cloned().collect();
    page_numbers.sort_unstable();

    let mut texts = Vec::with_capacity(page_numbers.len());
    for page_number in &page_numbers {
        texts.push(
            doc.extract_text(&[*page_number])
                .map_err(|e| e.to_string())?,
        );
    }

    Ok(PdfExtraction {
        text: texts.join("\n\n"),
        pages: Vec::new(),
        total_pages: page_numbers.len(),
    })
}
