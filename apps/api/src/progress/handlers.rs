use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::CareerRecommendationRow;
use crate::models::result::{AptitudeResultRow, IqResultRow};
use crate::progress::{aptitude_history, iq_history};
use crate::recommendations::list_recommendations;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub aptitude_results: Vec<AptitudeResultRow>,
    pub iq_results: Vec<IqResultRow>,
    pub recommendations: Vec<CareerRecommendationRow>,
}

/// GET /api/v1/progress
///
/// Test results come back newest-first; recommendations by rank.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProgressResponse>, AppError> {
    let aptitude_results = aptitude_history(&state.db, params.user_id).await?;
    let iq_results = iq_history(&state.db, params.user_id).await?;
    let recommendations = list_recommendations(&state.db, params.user_id).await?;

    Ok(Json(ProgressResponse {
        aptitude_results,
        iq_results,
        recommendations,
    }))
}
