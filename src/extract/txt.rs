//! Plain-text extraction with encoding recovery.
//!
//! Reads UTF-8 first and falls back to Latin-1 on invalid byte sequences.
//! Latin-1 maps every byte directly to a code point, so the fallback cannot
//! itself fail; only a genuine I/O error fails the parse.

use std::path::Path;

use tracing::debug;

use crate::errors::ParseError;
use crate::extract::{DocumentMetadata, FileType, ParsedDocument, StructureInfo};

pub fn parse(path: &Path) -> Result<ParsedDocument, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::TxtReadFailed(e.to_string()))?;

    let (content, encoding) = match String::from_utf8(bytes) {
        Ok(content) => (content, None),
        Err(e) => {
            debug!(path = %path.display(), "invalid UTF-8, recovering as Latin-1");
            (latin1_to_string(e.as_bytes()), Some("latin-1"))
        }
    };

    let lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    let total_lines = lines.len();

    let mut metadata = DocumentMetadata::new(FileType::Txt);
    metadata.total_lines = Some(total_lines);
    metadata.encoding = encoding;

    Ok(ParsedDocument {
        text: content,
        structure: StructureInfo::Txt { lines },
        metadata,
    })
}

/// Latin-1 decodes 1:1 into the first 256 Unicode code points.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
