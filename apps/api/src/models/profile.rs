use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One profile per user, upserted in place. Identity itself is managed
/// outside this service; `user_id` arrives with every request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub qualification: Option<String>,
    pub education_background: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub work_style: Option<String>,
    pub updated_at: DateTime<Utc>,
}
