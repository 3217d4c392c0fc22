pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::profile::handlers as profile;
use crate::progress::handlers as progress;
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile", put(profile::handle_upsert_profile))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            post(recommendations::handle_generate_recommendations)
                .get(recommendations::handle_list_recommendations),
        )
        // Aptitude assessment
        .route("/api/v1/aptitude/sessions", post(assessment::start_aptitude))
        .route(
            "/api/v1/aptitude/sessions/:id/answers",
            post(assessment::answer_aptitude),
        )
        .route(
            "/api/v1/aptitude/sessions/:id/submit",
            post(assessment::submit_aptitude),
        )
        .route(
            "/api/v1/aptitude/sessions/:id/review",
            get(assessment::review_aptitude),
        )
        // IQ assessment
        .route("/api/v1/iq/sessions", post(assessment::start_iq))
        .route("/api/v1/iq/sessions/:id", get(assessment::iq_state))
        .route(
            "/api/v1/iq/sessions/:id/answers",
            post(assessment::answer_iq),
        )
        .route(
            "/api/v1/iq/sessions/:id/advance",
            post(assessment::advance_iq),
        )
        .route("/api/v1/iq/sessions/:id/back", post(assessment::back_iq))
        .route(
            "/api/v1/iq/sessions/:id/submit",
            post(assessment::submit_iq),
        )
        .route(
            "/api/v1/iq/sessions/:id/review",
            get(assessment::review_iq),
        )
        // Progress history
        .route("/api/v1/progress", get(progress::handle_get_progress))
        .with_state(state)
}
