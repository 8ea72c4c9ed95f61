use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::queries::get_jobs_for_matching;
use crate::matching::scorer::{
    get_top_recommendations, JobForMatching, MatchBreakdown, ProfileForMatching,
};
use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;
use crate::resume::types::ResumeProfile;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub resume_id: Uuid,
    pub search_id: Option<Uuid>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct Recommendation {
    pub job: JobRow,
    pub score: u32,
    pub breakdown: MatchBreakdown,
}

#[derive(Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub total: usize,
    pub total_jobs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/v1/recommendations?resume_id=&search_id=&limit=
///
/// Scores the stored profile against jobs from the 7-day window and returns
/// the ranked list with per-factor breakdowns.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(params.resume_id)
        .fetch_optional(&state.db)
        .await?;
    let resume = resume
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", params.resume_id)))?;

    let profile: ResumeProfile = serde_json::from_value(resume.profile)
        .map_err(|_| AppError::Validation("Invalid resume profile data".to_string()))?;

    let matching_profile = ProfileForMatching {
        skills: profile.skills,
        keywords: profile.keywords,
        job_titles: profile.job_titles,
        open_to_remote: profile.open_to_remote,
    };

    let jobs = get_jobs_for_matching(&state.db, params.search_id).await?;
    if jobs.is_empty() {
        return Ok(Json(RecommendationsResponse {
            recommendations: vec![],
            total: 0,
            total_jobs: 0,
            message: Some("No jobs found in the last 7 days".to_string()),
        }));
    }
    let total_jobs = jobs.len();

    let jobs_for_matching: Vec<JobForMatching> = jobs
        .into_iter()
        .map(|j| JobForMatching {
            id: j.id,
            title: j.title,
            company: j.company,
            location: j.location,
            description: j.description,
            snippet: j.snippet,
            remote: j.remote,
        })
        .collect();

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let scored = get_top_recommendations(&matching_profile, &jobs_for_matching, limit);

    // Join full job rows back onto the ranked list.
    let job_ids: Vec<Uuid> = scored.iter().map(|s| s.job_id).collect();
    let full_jobs: Vec<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(&job_ids)
        .fetch_all(&state.db)
        .await?;
    let mut job_map: HashMap<Uuid, JobRow> =
        full_jobs.into_iter().map(|j| (j.id, j)).collect();

    let recommendations: Vec<Recommendation> = scored
        .into_iter()
        .filter_map(|s| {
            job_map.remove(&s.job_id).map(|job| Recommendation {
                job,
                score: s.score,
                breakdown: s.breakdown,
            })
        })
        .collect();

    let total = recommendations.len();
    Ok(Json(RecommendationsResponse {
        recommendations,
        total,
        total_jobs,
        message: None,
    }))
}
