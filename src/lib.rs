//! jobfit — document-to-structured-analysis pipeline for job applications.
//!
//! Ingests a job description plus a candidate's resume and cover letter,
//! extracts normalized text from PDF / DOCX / plain-text uploads, asks an
//! LLM for structured keyword and requirement analysis, and tracks a
//! per-submission workflow with versioned edits and scoring feedback.
//!
//! The crate owns no web or CLI surface; routing, upload policy, and real
//! persistence belong to the surrounding service. See `pipeline` for the
//! orchestration entry points and `session::store` for the storage boundary.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extract;
pub mod llm_client;
pub mod pipeline;
pub mod session;

pub use analysis::types::{JobAnalysis, OptimizationInsights};
pub use errors::{AnalysisError, ParseError, PipelineError, SessionError, ValidationError};
pub use extract::{parse_document, validate_file, FileType, ParsedDocument};
pub use llm_client::{ChatMessage, InvocationParams, LlmError, ModelInvoker, OpenAiClient};
pub use session::{DocumentKind, ProcessingSession, Scores, SessionStatus};
