//! Weighted multi-factor matching between a résumé profile and stored jobs.
//!
//! Four components sum to a 0–100 score: skills (50), title (20), keywords
//! (20), preference (10). Each component feeds a ≤1.0 overlap ratio into its
//! weight, so the total is bounded by construction.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::matching::text_utils::{
    extract_keywords, find_difference, find_intersection, overlap_coefficient, tokenize_title,
};
use crate::resume::skills::{extract_all_skills, normalize_skill};

const WEIGHT_SKILLS: f64 = 50.0;
const WEIGHT_TITLE: f64 = 20.0;
const WEIGHT_KEYWORDS: f64 = 20.0;

/// Per-factor score breakdown for one job. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchBreakdown {
    pub skills_score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume_skills: Vec<String>,
    pub title_score: u32,
    pub title_tokens_matched: Vec<String>,
    pub job_title_tokens: Vec<String>,
    pub keyword_score: u32,
    pub matched_keywords: Vec<String>,
    pub preference_score: u32,
    pub location_match: bool,
    pub remote_match: bool,
    pub total_score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    pub job_id: Uuid,
    pub score: u32,
    pub breakdown: MatchBreakdown,
}

/// The slice of a job the scorer needs.
#[derive(Debug, Clone)]
pub struct JobForMatching {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub snippet: Option<String>,
    pub remote: bool,
}

/// The slice of a profile the scorer needs.
#[derive(Debug, Clone, Default)]
pub struct ProfileForMatching {
    pub skills: Vec<String>,
    pub keywords: Vec<String>,
    pub job_titles: Vec<String>,
    pub open_to_remote: bool,
}

pub fn calculate_match_score(profile: &ProfileForMatching, job: &JobForMatching) -> MatchBreakdown {
    let mut reasons = Vec::new();

    // Skills (weight 50): job skills extracted the same way as résumé skills.
    let resume_skills: Vec<String> = profile.skills.iter().map(|s| normalize_skill(s)).collect();

    let job_text = format!(
        "{} {} {}",
        job.title,
        job.description.as_deref().unwrap_or(""),
        job.snippet.as_deref().unwrap_or("")
    );
    let job_skills: Vec<String> = extract_all_skills(&job_text)
        .iter()
        .map(|s| normalize_skill(s))
        .collect();
    let job_skills_set: HashSet<String> = job_skills.iter().cloned().collect();

    let matched_skills = find_intersection(&resume_skills, &job_skills);
    let mut missing_skills = find_difference(&job_skills, &resume_skills);
    missing_skills.truncate(10);

    let skills_overlap = if job_skills_set.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / job_skills_set.len() as f64
    };
    let skills_score = (skills_overlap * WEIGHT_SKILLS).round() as u32;

    if !matched_skills.is_empty() {
        reasons.push(format!(
            "Matched {} of {} required skills",
            matched_skills.len(),
            job_skills_set.len()
        ));
    }

    // Title (weight 20): overlap coefficient on seniority-stripped tokens.
    let job_title_tokens = tokenize_title(&job.title);
    let job_title_set: HashSet<String> = job_title_tokens.iter().cloned().collect();
    let resume_title_tokens: Vec<String> = profile
        .job_titles
        .iter()
        .flat_map(|t| tokenize_title(t))
        .collect();
    let resume_title_set: HashSet<String> = resume_title_tokens.iter().cloned().collect();

    let title_tokens_matched = find_intersection(&job_title_tokens, &resume_title_tokens);
    let title_overlap = if job_title_set.is_empty() {
        0.0
    } else {
        overlap_coefficient(&resume_title_set, &job_title_set)
    };
    let title_score = (title_overlap * WEIGHT_TITLE).round() as u32;

    if !title_tokens_matched.is_empty() {
        reasons.push(format!("Title match: {}", title_tokens_matched.join(", ")));
    }

    // Keywords (weight 20): profile keywords vs the job's top-30 tokens.
    let resume_keywords: Vec<String> = profile.keywords.iter().map(|k| k.to_lowercase()).collect();
    let resume_keyword_set: HashSet<String> = resume_keywords.iter().cloned().collect();
    let job_keywords = extract_keywords(&job_text);
    let job_keyword_set: HashSet<String> = job_keywords.iter().cloned().collect();

    let mut matched_keywords = find_intersection(&resume_keywords, &job_keywords);
    matched_keywords.truncate(10);
    let keyword_overlap = if job_keyword_set.is_empty() {
        0.0
    } else {
        overlap_coefficient(&resume_keyword_set, &job_keyword_set)
    };
    let keyword_score = (keyword_overlap * WEIGHT_KEYWORDS).round() as u32;

    // Preference (weight 10). When neither remote condition applies the
    // component still scores a flat 5, so this factor never contributes 0.
    let mut preference_score = 0u32;
    let location_match = false;
    let mut remote_match = false;

    if profile.open_to_remote && job.remote {
        preference_score += 5;
        remote_match = true;
        reasons.push("Remote work available".to_string());
    } else if job.remote {
        preference_score += 3;
        remote_match = true;
    }
    if preference_score == 0 {
        preference_score = 5;
    }

    let total_score = skills_score + title_score + keyword_score + preference_score;

    MatchBreakdown {
        skills_score,
        matched_skills,
        missing_skills,
        resume_skills,
        title_score,
        title_tokens_matched,
        job_title_tokens,
        keyword_score,
        matched_keywords,
        preference_score,
        location_match,
        remote_match,
        total_score,
        reasons,
    }
}

/// Scores every job and sorts descending by total score. Equal scores are
/// ordered by job id so ranking is deterministic.
pub fn score_jobs(profile: &ProfileForMatching, jobs: &[JobForMatching]) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = jobs
        .iter()
        .map(|job| {
            let breakdown = calculate_match_score(profile, job);
            ScoredJob {
                job_id: job.id,
                score: breakdown.total_score,
                breakdown,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.job_id.cmp(&b.job_id)));
    scored
}

/// First `limit` entries of the ranked list.
pub fn get_top_recommendations(
    profile: &ProfileForMatching,
    jobs: &[JobForMatching],
    limit: usize,
) -> Vec<ScoredJob> {
    let mut scored = score_jobs(profile, jobs);
    scored.truncate(limit);
    scored
}
