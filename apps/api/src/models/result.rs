use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted aptitude test result. Created once per submitted test, never
/// updated; history views read in reverse-chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AptitudeResultRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career_title: String,
    /// Raw correct count.
    pub total_score: i32,
    /// Total question count.
    pub max_score: i32,
    /// Section name -> rounded percentage.
    pub section_scores: sqlx::types::Json<serde_json::Value>,
    pub feedback: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// A persisted IQ test result. `max_score` is always 145: the persisted max
/// is the scale bound, not the achievable raw score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IqResultRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_score: i32,
    pub max_score: i32,
    pub feedback: Option<String>,
    pub completed_at: DateTime<Utc>,
}
