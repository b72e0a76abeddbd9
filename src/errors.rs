//! Error taxonomy for the extraction and analysis pipeline.
//!
//! Every public operation returns a tagged result; nothing here is expected
//! to propagate as a panic past a module boundary. The surrounding service
//! decides which failures are fatal to a session and which are retryable.

use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::LlmError;

/// Extraction failure for a single document. Not retried automatically;
/// surfaced to the caller as a per-document error message.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Extension outside {pdf, docx, txt}. The user must resubmit a
    /// supported format.
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// Both PDF extraction tiers failed. Carries the primary (layout-aware)
    /// tier's error, matching what the caller would want to report.
    #[error("failed to parse PDF: {0}")]
    PdfExtractionFailed(String),

    #[error("failed to parse DOCX: {0}")]
    DocxExtractionFailed(String),

    /// Non-decoding I/O error on a plain-text file. Decoding problems never
    /// reach this variant; Latin-1 recovery absorbs them.
    #[error("failed to read TXT file: {0}")]
    TxtReadFailed(String),
}

/// Pre-flight file check failure, before any parse attempt is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file does not exist")]
    Missing,

    #[error("path is not a file")]
    NotAFile,

    #[error("unsupported file type (allowed: pdf, docx, txt)")]
    UnsupportedExtension,

    #[error("cannot read file: {0}")]
    Unreadable(String),
}

/// Analysis orchestrator failure. The two variants call for different
/// recovery strategies: invocation errors are worth retrying or replacing
/// with deterministic fallback content, parse failures are not.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport, auth, or rate-limit error from the model service.
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    /// The model returned text that no decoding tier could parse.
    #[error("failed to parse analysis response")]
    ParseFailed,
}

/// Session store boundary failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),

    #[error("session storage error: {0}")]
    Storage(String),
}

/// Top-level failure of a pipeline operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no job description provided")]
    MissingJobDescription,

    #[error("invalid {label}: {source}")]
    Validation {
        label: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("error parsing {label}: {source}")]
    Document {
        label: &'static str,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
