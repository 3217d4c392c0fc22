//! Progress history: append-only test results read newest-first, plus the
//! current recommendation set.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::result::{AptitudeResultRow, IqResultRow};

pub mod handlers;

pub async fn aptitude_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AptitudeResultRow>, AppError> {
    let rows: Vec<AptitudeResultRow> = sqlx::query_as(
        "SELECT * FROM test_results WHERE user_id = $1 ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn iq_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<IqResultRow>, AppError> {
    let rows: Vec<IqResultRow> = sqlx::query_as(
        "SELECT * FROM iq_test_results WHERE user_id = $1 ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
