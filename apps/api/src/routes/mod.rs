pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest_handlers;
use crate::jobs::handlers as job_handlers;
use crate::matching::handlers as matching_handlers;
use crate::resume::handlers as resume_handlers;
use crate::searches::handlers as search_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Providers & admin fetch trigger
        .route("/api/v1/providers", get(ingest_handlers::handle_list_providers))
        .route("/api/v1/admin/fetch", post(ingest_handlers::handle_admin_fetch))
        .route(
            "/api/v1/admin/fetch-logs",
            get(ingest_handlers::handle_list_fetch_logs),
        )
        // Searches
        .route(
            "/api/v1/searches",
            get(search_handlers::handle_list_searches).post(search_handlers::handle_create_search),
        )
        .route(
            "/api/v1/searches/:id",
            get(search_handlers::handle_get_search)
                .patch(search_handlers::handle_update_search)
                .delete(search_handlers::handle_delete_search),
        )
        // Jobs
        .route("/api/v1/jobs", get(job_handlers::handle_list_jobs))
        .route(
            "/api/v1/jobs/:id",
            get(job_handlers::handle_get_job).delete(job_handlers::handle_delete_job),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resume_handlers::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/upload",
            post(resume_handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resume_handlers::handle_get_resume).delete(resume_handlers::handle_delete_resume),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(matching_handlers::handle_recommendations),
        )
        .with_state(state)
}
