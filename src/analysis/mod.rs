//! Analysis orchestrator.
//!
//! Two independent operations share the model invocation adapter and the
//! response decoder: job description analysis and optimization insight
//! extraction. Both are total over their declared output shapes; adapter
//! failures and undecodable responses surface as distinct
//! [`AnalysisError`] kinds so callers can pick different recovery
//! strategies (retry versus deterministic fallback content).

pub mod decode;
pub mod prompts;
pub mod types;

use tracing::{debug, warn};

use crate::errors::AnalysisError;
use crate::llm_client::{ChatMessage, InvocationParams, ModelInvoker, DEFAULT_MODEL};

use decode::decode_json_response;
use prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, INSIGHTS_PROMPT_TEMPLATE, INSIGHTS_SYSTEM,
};
use types::{JobAnalysis, OptimizationInsights};

const ANALYSIS_MAX_TOKENS: u32 = 2000;
const INSIGHTS_MAX_TOKENS: u32 = 1500;
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Analyzes a job description into structured keywords, requirements, and
/// role signals, then derives `all_keywords` and `keyword_density` from the
/// decoded payload and the source text.
pub async fn analyze_job_description(
    job_text: &str,
    model: &dyn ModelInvoker,
) -> Result<JobAnalysis, AnalysisError> {
    let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{job_description}", job_text);
    let messages = [ChatMessage::system(ANALYSIS_SYSTEM), ChatMessage::user(prompt)];
    let params = InvocationParams {
        model: DEFAULT_MODEL.to_string(),
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: ANALYSIS_MAX_TOKENS,
    };

    let raw = model.invoke(&messages, &params).await?;
    debug!(chars = raw.len(), "received job analysis response");

    let value = decode_json_response(&raw).ok_or(AnalysisError::ParseFailed)?;
    let analysis: JobAnalysis = serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "analysis payload did not match expected shape");
        AnalysisError::ParseFailed
    })?;

    Ok(analysis.finalize(job_text))
}

/// Extracts optimization recommendations for a resume and cover letter
/// against a job description.
pub async fn extract_optimization_insights(
    job_text: &str,
    resume_text: &str,
    cover_letter_text: &str,
    model: &dyn ModelInvoker,
) -> Result<OptimizationInsights, AnalysisError> {
    let prompt = INSIGHTS_PROMPT_TEMPLATE
        .replace("{job_description}", job_text)
        .replace("{resume_text}", resume_text)
        .replace("{cover_letter_text}", cover_letter_text);
    let messages = [ChatMessage::system(INSIGHTS_SYSTEM), ChatMessage::user(prompt)];
    let params = InvocationParams {
        model: DEFAULT_MODEL.to_string(),
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: INSIGHTS_MAX_TOKENS,
    };

    let raw = model.invoke(&messages, &params).await?;
    debug!(chars = raw.len(), "received optimization insights response");

    let value = decode_json_response(&raw).ok_or(AnalysisError::ParseFailed)?;
    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "insights payload did not match expected shape");
        AnalysisError::ParseFailed
    })
}

/// Supplemental keywords per industry. Unknown industries yield an empty
/// slice.
pub fn industry_specific_keywords(industry: &str) -> &'static [&'static str] {
    match industry.to_lowercase().as_str() {
        "technology" => &[
            "agile",
            "scrum",
            "devops",
            "ci/cd",
            "microservices",
            "api",
            "cloud",
            "aws",
            "azure",
        ],
        "finance" => &[
            "compliance",
            "risk management",
            "sox",
            "financial modeling",
            "bloomberg",
            "excel",
        ],
        "healthcare" => &[
            "hipaa",
            "clinical",
            "patient care",
            "ehr",
            "medical records",
            "compliance",
        ],
        "marketing" => &[
            "seo",
            "sem",
            "google analytics",
            "social media",
            "content marketing",
            "brand",
        ],
        "sales" => &[
            "crm",
            "salesforce",
            "lead generation",
            "quota",
            "pipeline",
            "b2b",
            "b2c",
        ],
        _ => &[],
    }
}
