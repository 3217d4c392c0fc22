//! Career recommendations: generated from the user's profile, persisted as
//! an atomically replaced set of exactly three ranked rows.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::CareerRecommendationRow;

pub mod handlers;

/// A career recommendation as generated, before ranking and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Career {
    pub title: String,
    /// 0-100 match confidence.
    pub confidence_score: f64,
    pub description: String,
    pub required_skills: Vec<String>,
}

/// Assigns ranks by payload order: the generator returns careers strongest
/// match first, so rank 1 is the best fit.
fn rank_careers(careers: &[Career]) -> Vec<(i32, &Career)> {
    careers
        .iter()
        .enumerate()
        .map(|(i, career)| ((i + 1) as i32, career))
        .collect()
}

/// Replaces the user's recommendation set inside one transaction, assigning
/// ranks by payload order. The user always ends up with exactly the latest
/// set: no window where the old rows are gone and the new ones absent, and
/// no leftover ranks from a previous generation.
pub async fn replace_recommendations(
    pool: &PgPool,
    user_id: Uuid,
    careers: &[Career],
) -> Result<Vec<CareerRecommendationRow>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM career_recommendations WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let mut rows = Vec::with_capacity(careers.len());
    for (ranking, career) in rank_careers(careers) {
        let row: CareerRecommendationRow = sqlx::query_as(
            r#"
            INSERT INTO career_recommendations
                (user_id, career_title, confidence_score, description,
                 required_skills, ranking)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&career.title)
        .bind(career.confidence_score)
        .bind(&career.description)
        .bind(&career.required_skills)
        .bind(ranking)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok(rows)
}

pub async fn list_recommendations(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CareerRecommendationRow>, AppError> {
    let rows: Vec<CareerRecommendationRow> = sqlx::query_as(
        "SELECT * FROM career_recommendations WHERE user_id = $1 ORDER BY ranking ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
