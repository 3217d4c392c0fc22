use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::CareerRecommendationRow;
use crate::profile::get_profile;
use crate::recommendations::{list_recommendations, replace_recommendations};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRecommendationsRequest {
    pub user_id: Uuid,
}

/// A missing profile is reported the same way `GET /api/v1/profile` reports
/// it: 404, not a validation failure.
fn missing_profile_error() -> AppError {
    AppError::NotFound("Profile not found. Complete your profile first".to_string())
}

/// POST /api/v1/recommendations
///
/// Generates a fresh top-3 from the stored profile and replaces the user's
/// previous set atomically.
pub async fn handle_generate_recommendations(
    State(state): State<AppState>,
    Json(req): Json<GenerateRecommendationsRequest>,
) -> Result<Json<Vec<CareerRecommendationRow>>, AppError> {
    let profile = get_profile(&state.db, req.user_id)
        .await?
        .ok_or_else(missing_profile_error)?;

    let careers = state.generator.career_recommendations(&profile).await?;
    let rows = replace_recommendations(&state.db, req.user_id, &careers).await?;

    info!(
        "Replaced recommendations for user {}: {} careers",
        req.user_id,
        rows.len()
    );
    Ok(Json(rows))
}

/// GET /api/v1/recommendations
pub async fn handle_list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<CareerRecommendationRow>>, AppError> {
    Ok(Json(list_recommendations(&state.db, params.user_id).await?))
}
