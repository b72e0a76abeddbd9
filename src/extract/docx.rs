//! Dual-pass DOCX extraction.
//!
//! One parse of the file feeds two independent walks:
//!
//! - the paragraph pass keeps each paragraph's text, named style, and
//!   alignment, and collects the distinct style set;
//! - the flat pass walks every document child (paragraphs, tables,
//!   hyperlinks) and better preserves content the paragraph iteration
//!   misses, such as table cells.
//!
//! The flat text is authoritative when non-empty, otherwise the joined
//! paragraphs are used. Structure keeps the paragraph records and style set
//! regardless of which text wins. Any failure in either phase fails the
//! whole parse; there is no further fallback.

use std::collections::BTreeSet;
use std::path::Path;

use docx_rs::{DocumentChild, Docx, ParagraphChild, RunChild, TableChild, TableRowChild};
use tracing::debug;

use crate::errors::ParseError;
use crate::extract::{
    DocumentMetadata, FileType, ParagraphRecord, ParsedDocument, StructureInfo,
};

pub fn parse(path: &Path) -> Result<ParsedDocument, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::DocxExtractionFailed(e.to_string()))?;
    let docx =
        docx_rs::read_docx(&bytes).map_err(|e| ParseError::DocxExtractionFailed(e.to_string()))?;

    let (paragraphs, records, styles) = paragraph_pass(&docx);
    let flat = flat_text(&docx);

    let text = if flat.trim().is_empty() {
        debug!("flat DOCX extraction empty, using paragraph join");
        paragraphs.join("\n")
    } else {
        flat
    };

    let mut metadata = DocumentMetadata::new(FileType::Docx);
    metadata.total_paragraphs = Some(paragraphs.len());

    Ok(ParsedDocument {
        text,
        structure: StructureInfo::Docx {
            paragraphs: records,
            styles,
        },
        metadata,
    })
}

/// Walks top-level paragraphs, keeping text, style name, and alignment for
/// each non-empty one.
fn paragraph_pass(docx: &Docx) -> (Vec<String>, Vec<ParagraphRecord>, BTreeSet<String>) {
    let mut paragraphs = Vec::new();
    let mut records = Vec::new();
    let mut styles = BTreeSet::new();

    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            let text = paragraph_text(p);
            if text.trim().is_empty() {
                continue;
            }

            let style = p
                .property
                .style
                .as_ref()
                .map(|s| s.val.clone())
                .unwrap_or_else(|| "Normal".to_string());
            let alignment = p.property.alignment.as_ref().map(|j| j.val.clone());

            styles.insert(style.clone());
            records.push(ParagraphRecord {
                text: text.clone(),
                style,
                alignment,
            });
            paragraphs.push(text);
        }
    }

    (paragraphs, records, styles)
}

/// Flat extraction over every document child, including table cells.
fn flat_text(docx: &Docx) -> String {
    let mut parts: Vec<String> = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                let text = paragraph_text(p);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            DocumentChild::Table(t) => {
                for row in &t.rows {
                    let TableChild::TableRow(r) = row;
                    for cell in &r.cells {
                        let TableRowChild::TableCell(c) = cell;
                        for content in &c.children {
                            if let docx_rs::TableCellContent::Paragraph(p) = content {
                                let text = paragraph_text(p);
                                if !text.trim().is_empty() {
                                    parts.push(text);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    parts.join("\n")
}

fn paragraph_text(p: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(h) => {
                for inner in &h.children {
                    if let ParagraphChild::Run(r) = inner {
                        for run_child in &r.children {
                            if let RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Paragraph, Run, Table, TableCell, TableRow};

    fn build_docx(mut docx: Docx) -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    fn write_docx(docx: Docx) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.docx");
        std::fs::write(&path, build_docx(docx)).unwrap();
        (dir, path)
    }

    fn simple_docx() -> Docx {
        Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .style("Heading1")
                    .add_run(Run::new().add_text("Experience")),
            )
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("Python developer, 3 years")),
            )
    }

    #[test]
    fn test_parse_valid_docx_succeeds() {
        let (_dir, path) = write_docx(simple_docx());
        let doc = parse(&path).unwrap();

        assert_eq!(doc.metadata.file_type, FileType::Docx);
        assert!(doc.text.contains("Python developer"));
        assert!(doc.text.contains("Experience"));
        assert_eq!(doc.metadata.total_paragraphs, Some(2));
    }

    #[test]
    fn test_parse_keeps_styles_and_paragraph_records() {
        let (_dir, path) = write_docx(simple_docx());
        let doc = parse(&path).unwrap();

        match doc.structure {
            StructureInfo::Docx { paragraphs, styles } => {
                assert_eq!(paragraphs.len(), 2);
                assert!(styles.contains("Heading1"));
                assert_eq!(paragraphs[0].style, "Heading1");
            }
            other => panic!("expected docx structure, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_pass_includes_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("SQL")),
        )])]);
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Skills")))
            .add_table(table);
        let bytes = build_docx(docx);

        let parsed = docx_rs::read_docx(&bytes).unwrap();
        let flat = flat_text(&parsed);
        let (paragraphs, _, _) = paragraph_pass(&parsed);

        assert!(flat.contains("SQL"), "flat text: {flat:?}");
        // The paragraph-only pass is blind to table content
        assert!(!paragraphs.join("\n").contains("SQL"));
    }

    #[test]
    fn test_empty_paragraphs_are_skipped() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new())
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("content")));
        let bytes = build_docx(docx);

        let parsed = docx_rs::read_docx(&bytes).unwrap();
        let (paragraphs, records, _) = paragraph_pass(&parsed);
        assert_eq!(paragraphs, vec!["content".to_string()]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let result = parse(&path);
        assert!(matches!(result, Err(ParseError::DocxExtractionFailed(_))));
    }

    #[test]
    fn test_parse_missing_file_fails() {
        let result = parse(Path::new("/nonexistent/file.docx"));
        assert!(matches!(result, Err(ParseError::DocxExtractionFailed(_))));
    }
}
