//! Prompt constants for the analysis orchestrator.
//!
//! Templates carry `{placeholder}` markers replaced before sending. The
//! requested JSON schemas here must stay in sync with the structs in
//! `analysis::types`.

/// System role for job description analysis.
pub const ANALYSIS_SYSTEM: &str = "You are an expert HR analyst specializing in job \
    description analysis. Provide accurate, detailed analysis in valid JSON format.";

/// Job analysis prompt template. Replace `{job_description}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract detailed information in JSON format:

Job Description:
{job_description}

Please provide a comprehensive analysis in the following JSON structure:
{
    "keywords": {
        "high_priority": ["keyword1", "keyword2"],
        "medium_priority": ["keyword3", "keyword4"],
        "low_priority": ["keyword5", "keyword6"]
    },
    "requirements": {
        "technical_skills": ["skill1", "skill2"],
        "soft_skills": ["skill1", "skill2"],
        "education": ["requirement1", "requirement2"],
        "experience": ["requirement1", "requirement2"],
        "certifications": ["cert1", "cert2"]
    },
    "experience_level": "entry/mid/senior/executive",
    "industry": "detected_industry",
    "company_culture": ["culture_keyword1", "culture_keyword2"],
    "job_type": "full-time/part-time/contract/remote/hybrid",
    "salary_indicators": ["any salary or compensation mentions"],
    "location_requirements": ["location requirements if any"]
}

Focus on:
1. Technical keywords that should appear in resume/cover letter
2. Action verbs and industry-specific terminology
3. Required vs preferred qualifications
4. Company values and culture indicators"#;

/// System role for optimization insight extraction.
pub const INSIGHTS_SYSTEM: &str =
    "You are an expert resume optimizer. Provide specific, actionable recommendations.";

/// Optimization insights prompt template. Replace `{job_description}`,
/// `{resume_text}`, and `{cover_letter_text}` before sending.
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Analyze the job description against the current resume and cover letter to provide specific optimization recommendations:

JOB DESCRIPTION:
{job_description}

CURRENT RESUME:
{resume_text}

CURRENT COVER LETTER:
{cover_letter_text}

Provide optimization insights in JSON format:
{
    "resume_gaps": ["missing keyword/skill 1", "missing keyword/skill 2"],
    "cover_letter_gaps": ["missing element 1", "missing element 2"],
    "keyword_opportunities": ["keyword to add 1", "keyword to add 2"],
    "experience_matching": {
        "strong_matches": ["experience 1", "experience 2"],
        "weak_matches": ["experience 1", "experience 2"],
        "missing_experiences": ["missing 1", "missing 2"]
    },
    "ats_recommendations": ["recommendation 1", "recommendation 2"],
    "priority_actions": ["action 1", "action 2"]
}"#;
