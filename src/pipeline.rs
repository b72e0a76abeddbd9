//! Orchestration entry points.
//!
//! Four operations cover the submission workflow: `ingest_documents` turns
//! uploads into a stored session, `run_analysis` drives the model-backed
//! analysis and scoring, `update_document` records versioned edits, and
//! `generate_feedback` produces the summary payload. Model invocation
//! failures degrade to deterministic fallback content so a submission still
//! completes; undecodable model output fails the session instead, since
//! retrying with the same prompt is unlikely to help and silently
//! substituting content would mask a contract break.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::types::{
    ExperienceMatching, JobAnalysis, KeywordTiers, OptimizationInsights, Requirements,
};
use crate::analysis::{analyze_job_description, extract_optimization_insights};
use crate::errors::{AnalysisError, PipelineError, SessionError};
use crate::extract::{parse_document, validate_file};
use crate::llm_client::ModelInvoker;
use crate::session::store::SessionStore;
use crate::session::{DocumentKind, ProcessingSession, Scores, SessionStatus};

/// Where the job description comes from: pasted text or an uploaded file.
#[derive(Debug, Clone, Copy)]
pub enum JobSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

/// Result of a completed analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub session_id: Uuid,
    pub analysis: JobAnalysis,
    pub insights: OptimizationInsights,
    pub scores: Scores,
}

/// Result of recording one document edit.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentUpdate {
    pub version_number: u32,
    pub scores: Option<Scores>,
}

/// Placeholder feedback summary for a completed session.
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub overall: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_analysis: String,
}

/// Validates and extracts the three documents, creates a session, and
/// persists it. Returns the new session id.
pub async fn ingest_documents(
    job: JobSource<'_>,
    resume_path: &Path,
    cover_letter_path: &Path,
    store: &dyn SessionStore,
) -> Result<Uuid, PipelineError> {
    let job_text = match job {
        JobSource::Text(text) => {
            if text.trim().is_empty() {
                return Err(PipelineError::MissingJobDescription);
            }
            text.to_string()
        }
        JobSource::File(path) => read_document(path, "job description")?,
    };

    let resume_text = read_document(resume_path, "resume")?;
    let cover_letter_text = read_document(cover_letter_path, "cover letter")?;

    let session = ProcessingSession::new(job_text, resume_text, cover_letter_text);
    let id = session.id;
    store.save(&session).await?;

    info!(session_id = %id, "session created");
    Ok(id)
}

fn read_document(path: &Path, label: &'static str) -> Result<String, PipelineError> {
    validate_file(path).map_err(|source| PipelineError::Validation { label, source })?;
    let parsed =
        parse_document(path).map_err(|source| PipelineError::Document { label, source })?;
    Ok(parsed.text)
}

/// Runs job analysis and insight extraction for a stored session, assigns
/// preliminary scores, and moves the session to `completed`.
///
/// Model invocation errors fall back to canned analysis or insight content;
/// undecodable model output marks the session `failed` and returns the
/// error.
pub async fn run_analysis(
    session_id: Uuid,
    store: &dyn SessionStore,
    model: &dyn ModelInvoker,
) -> Result<AnalysisReport, PipelineError> {
    let mut session = load_session(session_id, store).await?;
    session.set_status(SessionStatus::Processing);
    store.save(&session).await?;

    let analysis = match analyze_job_description(&session.job_description_text, model).await {
        Ok(analysis) => analysis,
        Err(AnalysisError::ModelInvocation(e)) => {
            warn!(session_id = %session_id, error = %e, "job analysis unavailable, using fallback");
            fallback_job_analysis(&session.job_description_text)
        }
        Err(e @ AnalysisError::ParseFailed) => {
            return fail_session(session, store, e).await;
        }
    };

    session.extracted_keywords = Some(to_json(&analysis.keywords)?);
    session.job_requirements = Some(to_json(&analysis.requirements)?);

    let insights = match extract_optimization_insights(
        &session.job_description_text,
        &session.original_resume_text,
        &session.original_cover_letter_text,
        model,
    )
    .await
    {
        Ok(insights) => insights,
        Err(AnalysisError::ModelInvocation(e)) => {
            warn!(session_id = %session_id, error = %e, "insight extraction unavailable, using fallback");
            fallback_insights()
        }
        Err(e @ AnalysisError::ParseFailed) => {
            return fail_session(session, store, e).await;
        }
    };
    session.optimization_insights = Some(to_json(&insights)?);

    // Optimization is not implemented yet; the optimized texts start as
    // copies of the originals and change only through edits.
    session.optimized_resume_text = Some(session.original_resume_text.clone());
    session.optimized_cover_letter_text = Some(session.original_cover_letter_text.clone());

    let scores = Scores::initial();
    session.scores = Some(scores);
    session.set_status(SessionStatus::Completed);
    store.save(&session).await?;

    info!(session_id = %session_id, keywords = analysis.all_keywords.len(), "analysis completed");
    Ok(AnalysisReport {
        session_id,
        analysis,
        insights,
        scores,
    })
}

/// Replaces one document's optimized text, recording a new version and
/// applying the score adjustment for that document kind.
pub async fn update_document(
    session_id: Uuid,
    kind: DocumentKind,
    content: String,
    store: &dyn SessionStore,
) -> Result<DocumentUpdate, PipelineError> {
    let mut session = load_session(session_id, store).await?;
    let version_number = session.record_edit(kind, content);
    store.save(&session).await?;

    info!(session_id = %session_id, kind = %kind, version = version_number, "document updated");
    Ok(DocumentUpdate {
        version_number,
        scores: session.scores,
    })
}

/// Produces the feedback summary for a session and stores it on the
/// session record. The strengths and improvements are placeholder content
/// until a real feedback generator exists.
pub async fn generate_feedback(
    session_id: Uuid,
    store: &dyn SessionStore,
) -> Result<Feedback, PipelineError> {
    let mut session = load_session(session_id, store).await?;
    let overall = session.scores.map(|s| s.overall).unwrap_or(0.0);

    let feedback = Feedback {
        overall: format!("Overall Score: {overall:.1}/10"),
        strengths: svec(&[
            "Strong keyword optimization",
            "Good ATS compatibility",
            "Relevant experience highlighted",
        ]),
        improvements: svec(&[
            "Add more quantifiable achievements",
            "Include additional industry keywords",
            "Strengthen the opening statement",
        ]),
        detailed_analysis: "Your optimized documents show significant improvement...".to_string(),
    };

    session.detailed_feedback = Some(to_json(&feedback)?);
    store.save(&session).await?;
    Ok(feedback)
}

async fn load_session(
    session_id: Uuid,
    store: &dyn SessionStore,
) -> Result<ProcessingSession, PipelineError> {
    store
        .load(session_id)
        .await?
        .ok_or_else(|| SessionError::NotFound(session_id).into())
}

async fn fail_session(
    mut session: ProcessingSession,
    store: &dyn SessionStore,
    error: AnalysisError,
) -> Result<AnalysisReport, PipelineError> {
    warn!(session_id = %session.id, error = %error, "analysis failed");
    session.set_status(SessionStatus::Failed);
    store.save(&session).await?;
    Err(error.into())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, PipelineError> {
    serde_json::to_string(value).map_err(|e| SessionError::Storage(e.to_string()).into())
}

fn svec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Canned analysis used when the model service is unavailable. Derived
/// fields are still computed against the actual job text.
fn fallback_job_analysis(job_text: &str) -> JobAnalysis {
    JobAnalysis {
        keywords: KeywordTiers {
            high_priority: svec(&["python", "sql", "api", "rest"]),
            medium_priority: svec(&["git", "docker", "linux"]),
            low_priority: svec(&["agile", "scrum"]),
        },
        requirements: Requirements {
            technical_skills: svec(&["Python", "SQL", "REST APIs"]),
            soft_skills: svec(&["Communication", "Problem solving"]),
            education: svec(&["Bachelor's degree"]),
            experience: svec(&["2+ years experience"]),
            certifications: Vec::new(),
        },
        experience_level: "mid".to_string(),
        industry: "technology".to_string(),
        company_culture: svec(&["collaborative", "innovative"]),
        job_type: "full-time".to_string(),
        ..Default::default()
    }
    .finalize(job_text)
}

/// Canned insights used when the model service is unavailable.
fn fallback_insights() -> OptimizationInsights {
    OptimizationInsights {
        resume_gaps: svec(&[
            "Add more technical keywords",
            "Include quantifiable achievements",
        ]),
        cover_letter_gaps: svec(&["Mention company culture fit", "Add specific examples"]),
        keyword_opportunities: svec(&["API development", "Database management"]),
        experience_matching: ExperienceMatching {
            strong_matches: svec(&["Programming experience", "Problem solving"]),
            weak_matches: svec(&["Leadership experience"]),
            missing_experiences: svec(&["Cloud platforms"]),
        },
        ats_recommendations: svec(&["Use standard section headers", "Include more keywords"]),
        priority_actions: svec(&["Add technical skills section", "Quantify achievements"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ChatMessage, InvocationParams, LlmError};
    use crate::session::store::InMemorySessionStore;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    struct StubModel {
        responses: Mutex<Vec<Result<String, LlmError>>>,
    }

    impl StubModel {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }

        fn api_error() -> LlmError {
            LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }
        }
    }

    #[async_trait]
    impl ModelInvoker for StubModel {
        async fn invoke(
            &self,
            _messages: &[ChatMessage],
            _params: &InvocationParams,
        ) -> Result<String, LlmError> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    const ANALYSIS_RESPONSE: &str = r#"{
        "keywords": {
            "high_priority": ["python", "sql"],
            "medium_priority": ["git"],
            "low_priority": []
        },
        "requirements": {
            "technical_skills": ["Python", "SQL"],
            "soft_skills": [],
            "education": [],
            "experience": ["3+ years"],
            "certifications": []
        },
        "experience_level": "mid",
        "industry": "technology",
        "company_culture": [],
        "job_type": "full-time"
    }"#;

    const INSIGHTS_RESPONSE: &str = r#"{
        "resume_gaps": ["cloud experience"],
        "priority_actions": ["quantify achievements"]
    }"#;

    fn temp_txt(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    async fn ingested_session(store: &InMemorySessionStore) -> Uuid {
        let resume = temp_txt("Experienced Python developer with SQL skills.");
        let cover = temp_txt("I am excited to apply for this role.");
        ingest_documents(
            JobSource::Text("Python developer, 3+ years, SQL required"),
            resume.path(),
            cover.path(),
            store,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_job_text() {
        let store = InMemorySessionStore::new();
        let resume = temp_txt("resume");
        let cover = temp_txt("cover");
        let err = ingest_documents(JobSource::Text("   "), resume.path(), cover.path(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingJobDescription));
    }

    #[tokio::test]
    async fn test_ingest_rejects_missing_resume_file() {
        let store = InMemorySessionStore::new();
        let cover = temp_txt("cover");
        let err = ingest_documents(
            JobSource::Text("some job"),
            Path::new("/nonexistent/resume.txt"),
            cover.path(),
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                label: "resume",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_ingest_stores_extracted_texts() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;

        let session = store.load(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Uploaded);
        assert!(session.original_resume_text.contains("Python developer"));
        assert!(session.original_cover_letter_text.contains("excited"));
    }

    #[tokio::test]
    async fn test_run_analysis_end_to_end() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;
        let model = StubModel::new(vec![
            Ok(ANALYSIS_RESPONSE.to_string()),
            Ok(INSIGHTS_RESPONSE.to_string()),
        ]);

        let report = run_analysis(id, &store, &model).await.unwrap();
        assert!(report.analysis.all_keywords.contains("python"));
        assert!(report.analysis.all_keywords.contains("sql"));
        assert!(report.analysis.keyword_density["python"] > 0.0);
        assert_eq!(report.insights.resume_gaps, vec!["cloud experience".to_string()]);
        assert_eq!(report.scores.overall, 7.7);

        let session = store.load(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.extracted_keywords.is_some());
        assert!(session.job_requirements.is_some());
        assert_eq!(
            session.optimized_resume_text,
            Some(session.original_resume_text.clone())
        );
    }

    #[tokio::test]
    async fn test_run_analysis_falls_back_when_model_unavailable() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;
        let model = StubModel::new(vec![
            Err(StubModel::api_error()),
            Err(StubModel::api_error()),
        ]);

        let report = run_analysis(id, &store, &model).await.unwrap();
        assert!(report.analysis.all_keywords.contains("python"));
        assert_eq!(report.analysis.industry, "technology");
        assert!(!report.insights.priority_actions.is_empty());

        let session = store.load(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_run_analysis_fails_session_on_undecodable_response() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;
        let model = StubModel::new(vec![Ok("I cannot help with that.".to_string())]);

        let err = run_analysis(id, &store, &model).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Analysis(AnalysisError::ParseFailed)
        ));
        let session = store.load(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_analysis_unknown_session() {
        let store = InMemorySessionStore::new();
        let model = StubModel::new(vec![]);
        let err = run_analysis(Uuid::new_v4(), &store, &model).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Session(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_document_records_version_and_adjusts_scores() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;
        let model = StubModel::new(vec![
            Ok(ANALYSIS_RESPONSE.to_string()),
            Ok(INSIGHTS_RESPONSE.to_string()),
        ]);
        run_analysis(id, &store, &model).await.unwrap();

        let update = update_document(id, DocumentKind::Resume, "Edited resume".to_string(), &store)
            .await
            .unwrap();
        assert_eq!(update.version_number, 1);
        let scores = update.scores.unwrap();
        assert!((scores.keyword_match - 7.7).abs() < 1e-9);

        let session = store.load(id).await.unwrap().unwrap();
        assert_eq!(session.optimized_resume_text.as_deref(), Some("Edited resume"));
        assert_eq!(session.document_versions.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_feedback_formats_overall_score() {
        let store = InMemorySessionStore::new();
        let id = ingested_session(&store).await;
        let model = StubModel::new(vec![
            Ok(ANALYSIS_RESPONSE.to_string()),
            Ok(INSIGHTS_RESPONSE.to_string()),
        ]);
        run_analysis(id, &store, &model).await.unwrap();

        let feedback = generate_feedback(id, &store).await.unwrap();
        assert_eq!(feedback.overall, "Overall Score: 7.7/10");
        assert_eq!(feedback.strengths.len(), 3);

        let session = store.load(id).await.unwrap().unwrap();
        let stored = session.detailed_feedback.unwrap();
        assert!(stored.contains("Overall Score: 7.7/10"));
    }
}
