//! Structured outputs of the analysis orchestrator.
//!
//! Every model-facing struct is total over its declared shape: each field
//! carries `#[serde(default)]`, so a key absent from the model's response
//! maps to an empty value rather than a deserialization fault. String-valued
//! enumish fields (`experience_level`, `job_type`) are passed through as-is;
//! the contract does not reject unknown values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Keywords grouped by priority tier, as returned by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordTiers {
    #[serde(default)]
    pub high_priority: Vec<String>,
    #[serde(default)]
    pub medium_priority: Vec<String>,
    #[serde(default)]
    pub low_priority: Vec<String>,
}

impl KeywordTiers {
    /// Deduplicated union of the three tiers. Order is not significant.
    pub fn flatten(&self) -> BTreeSet<String> {
        self.high_priority
            .iter()
            .chain(&self.medium_priority)
            .chain(&self.low_priority)
            .cloned()
            .collect()
    }
}

/// Categorized requirements extracted from the job description. Any
/// category may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Full structured analysis of a job description.
///
/// `all_keywords` and `keyword_density` are derived deterministically from
/// the model payload and the source text via [`JobAnalysis::finalize`];
/// the model is never asked for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub keywords: KeywordTiers,
    #[serde(default)]
    pub requirements: Requirements,
    /// One of entry/mid/senior/executive by convention; unrecognized values
    /// pass through unchanged.
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_culture: Vec<String>,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub salary_indicators: Vec<String>,
    #[serde(default)]
    pub location_requirements: Vec<String>,
    #[serde(default)]
    pub all_keywords: BTreeSet<String>,
    #[serde(default)]
    pub keyword_density: BTreeMap<String, f64>,
}

impl JobAnalysis {
    /// Derives `all_keywords` and `keyword_density` from the keyword tiers
    /// and the original job text.
    pub fn finalize(mut self, job_text: &str) -> Self {
        self.all_keywords = self.keywords.flatten();
        self.keyword_density = keyword_density(job_text, &self.all_keywords);
        self
    }
}

/// Occurrence ratio per keyword over the text's whitespace-delimited word
/// count, as a percentage. Matching is lowercased and substring-based, not
/// token-boundary-based, so keywords that are substrings of other words are
/// over-counted.
pub fn keyword_density(text: &str, keywords: &BTreeSet<String>) -> BTreeMap<String, f64> {
    let text_lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();

    keywords
        .iter()
        .map(|keyword| {
            let density = if word_count == 0 {
                0.0
            } else {
                let occurrences = text_lower.matches(&keyword.to_lowercase()).count();
                occurrences as f64 / word_count as f64 * 100.0
            };
            (keyword.clone(), density)
        })
        .collect()
}

/// How the candidate's existing experience lines up against the role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceMatching {
    #[serde(default)]
    pub strong_matches: Vec<String>,
    #[serde(default)]
    pub weak_matches: Vec<String>,
    #[serde(default)]
    pub missing_experiences: Vec<String>,
}

/// Advisory optimization guidance for a resume and cover letter pair.
/// Purely textual; no numeric invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationInsights {
    #[serde(default)]
    pub resume_gaps: Vec<String>,
    #[serde(default)]
    pub cover_letter_gaps: Vec<String>,
    #[serde(default)]
    pub keyword_opportunities: Vec<String>,
    #[serde(default)]
    pub experience_matching: ExperienceMatching,
    #[serde(default)]
    pub ats_recommendations: Vec<String>,
    #[serde(default)]
    pub priority_actions: Vec<String>,
}
