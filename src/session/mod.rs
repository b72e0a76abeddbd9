//! Per-submission workflow state.
//!
//! A [`ProcessingSession`] tracks one upload through the
//! `uploaded -> processing -> {completed|failed}` lifecycle, holding the
//! extracted texts, serialized analysis payloads, scores, and versioned
//! document edits. The core never persists sessions itself; it returns
//! values for the caller to store through the `store` boundary.

pub mod store;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Uploaded,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Uploaded => "uploaded",
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

/// The two candidate-owned document kinds in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => f.write_str("resume"),
            DocumentKind::CoverLetter => f.write_str("cover_letter"),
        }
    }
}

/// The four submission scores on a 0..=10 scale.
///
/// These are acknowledged placeholders, not a scoring model: initial values
/// are fixed constants and edits apply fixed adjustments. `overall` is the
/// arithmetic mean of the three sub-scores. A real re-scoring model would
/// replace [`Scores::apply_edit`] wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub keyword_match: f64,
    pub ats_compatibility: f64,
    pub content_relevance: f64,
    pub overall: f64,
}

impl Scores {
    /// Preliminary scores assigned when analysis completes.
    pub fn initial() -> Self {
        Self {
            keyword_match: 7.5,
            ats_compatibility: 8.0,
            content_relevance: 7.8,
            overall: 7.7,
        }
    }

    /// Fixed adjustment applied when a document is edited: resume edits
    /// nudge keyword match, cover letter edits nudge content relevance,
    /// both capped at 10.
    pub fn apply_edit(&mut self, kind: DocumentKind) {
        match kind {
            DocumentKind::Resume => {
                self.keyword_match = (self.keyword_match + 0.2).min(10.0);
            }
            DocumentKind::CoverLetter => {
                self.content_relevance = (self.content_relevance + 0.1).min(10.0);
            }
        }
        self.overall =
            (self.keyword_match + self.ats_compatibility + self.content_relevance) / 3.0;
    }
}

/// One saved revision of an edited document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub session_id: Uuid,
    pub kind: DocumentKind,
    pub version_number: u32,
    pub content: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: SessionStatus,

    pub job_description_text: String,
    pub original_resume_text: String,
    pub original_cover_letter_text: String,

    pub optimized_resume_text: Option<String>,
    pub optimized_cover_letter_text: Option<String>,

    /// Serialized JSON payloads from the analysis orchestrator.
    pub extracted_keywords: Option<String>,
    pub job_requirements: Option<String>,
    pub optimization_insights: Option<String>,

    pub scores: Option<Scores>,
    pub detailed_feedback: Option<String>,

    pub document_versions: Vec<DocumentVersion>,
}

impl ProcessingSession {
    pub fn new(
        job_description_text: String,
        original_resume_text: String,
        original_cover_letter_text: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            status: SessionStatus::Uploaded,
            job_description_text,
            original_resume_text,
            original_cover_letter_text,
            optimized_resume_text: None,
            optimized_cover_letter_text: None,
            extracted_keywords: None,
            job_requirements: None,
            optimization_insights: None,
            scores: None,
            detailed_feedback: None,
            document_versions: Vec::new(),
        }
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn optimized_text(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Resume => self.optimized_resume_text.as_deref(),
            DocumentKind::CoverLetter => self.optimized_cover_letter_text.as_deref(),
        }
    }

    /// Records an edit to one document: appends a new version, marks prior
    /// versions of that kind non-current, replaces the optimized text, and
    /// applies the placeholder score adjustment. Returns the new version
    /// number.
    pub fn record_edit(&mut self, kind: DocumentKind, content: String) -> u32 {
        let version_number = self
            .document_versions
            .iter()
            .filter(|v| v.kind == kind)
            .count() as u32
            + 1;

        for version in self
            .document_versions
            .iter_mut()
            .filter(|v| v.kind == kind && v.is_current)
        {
            version.is_current = false;
        }

        self.document_versions.push(DocumentVersion {
            session_id: self.id,
            kind,
            version_number,
            content: content.clone(),
            is_current: true,
            created_at: Utc::now(),
        });

        match kind {
            DocumentKind::Resume => self.optimized_resume_text = Some(content),
            DocumentKind::CoverLetter => self.optimized_cover_letter_text = Some(content),
        }

        if let Some(scores) = self.scores.as_mut() {
            scores.apply_edit(kind);
        }
        self.touch();

        version_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ProcessingSession {
        ProcessingSession::new(
            "job text".to_string(),
            "resume text".to_string(),
            "cover text".to_string(),
        )
    }

    #[test]
    fn test_new_session_starts_uploaded() {
        let s = session();
        assert_eq!(s.status, SessionStatus::Uploaded);
        assert!(s.scores.is_none());
        assert!(s.document_versions.is_empty());
    }

    #[test]
    fn test_record_edit_numbers_versions_per_kind() {
        let mut s = session();
        assert_eq!(s.record_edit(DocumentKind::Resume, "v1".to_string()), 1);
        assert_eq!(s.record_edit(DocumentKind::Resume, "v2".to_string()), 2);
        assert_eq!(s.record_edit(DocumentKind::CoverLetter, "c1".to_string()), 1);
        assert_eq!(s.optimized_resume_text.as_deref(), Some("v2"));
    }

    #[test]
    fn test_record_edit_flips_current_flag() {
        let mut s = session();
        s.record_edit(DocumentKind::Resume, "v1".to_string());
        s.record_edit(DocumentKind::Resume, "v2".to_string());

        let current: Vec<_> = s
            .document_versions
            .iter()
            .filter(|v| v.kind == DocumentKind::Resume && v.is_current)
            .collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].version_number, 2);
    }

    #[test]
    fn test_resume_edit_adjusts_keyword_match() {
        let mut s = session();
        s.scores = Some(Scores::initial());
        s.record_edit(DocumentKind::Resume, "better resume".to_string());

        let scores = s.scores.unwrap();
        assert!((scores.keyword_match - 7.7).abs() < 1e-9);
        let mean = (scores.keyword_match + scores.ats_compatibility + scores.content_relevance) / 3.0;
        assert!((scores.overall - mean).abs() < 1e-9);
    }

    #[test]
    fn test_cover_letter_edit_adjusts_content_relevance() {
        let mut s = session();
        s.scores = Some(Scores::initial());
        s.record_edit(DocumentKind::CoverLetter, "better cover".to_string());
        assert!((s.scores.unwrap().content_relevance - 7.9).abs() < 1e-9);
    }

    #[test]
    fn test_scores_cap_at_ten() {
        let mut scores = Scores {
            keyword_match: 9.9,
            ats_compatibility: 10.0,
            content_relevance: 10.0,
            overall: 9.97,
        };
        scores.apply_edit(DocumentKind::Resume);
        assert_eq!(scores.keyword_match, 10.0);
        scores.apply_edit(DocumentKind::Resume);
        assert_eq!(scores.keyword_match, 10.0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(SessionStatus::Failed.as_str(), "failed");
    }
}
