use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted career recommendation. The full set for a user is replaced on
/// every generation; ranks run 1..=3 within one generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career_title: String,
    pub confidence_score: f64,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub ranking: i32,
    pub created_at: DateTime<Utc>,
}
