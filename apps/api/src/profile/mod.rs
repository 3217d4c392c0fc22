//! User profile storage: one row per user, upserted in place.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;

pub mod handlers;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    let profile: Option<ProfileRow> =
        sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(profile)
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    qualification: Option<String>,
    education_background: Option<String>,
    skills: Vec<String>,
    interests: Vec<String>,
    work_style: Option<String>,
) -> Result<ProfileRow, AppError> {
    let profile: ProfileRow = sqlx::query_as(
        r#"
        INSERT INTO profiles
            (user_id, full_name, age, gender, qualification,
             education_background, skills, interests, work_style, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            age = EXCLUDED.age,
            gender = EXCLUDED.gender,
            qualification = EXCLUDED.qualification,
            education_background = EXCLUDED.education_background,
            skills = EXCLUDED.skills,
            interests = EXCLUDED.interests,
            work_style = EXCLUDED.work_style,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(age)
    .bind(gender)
    .bind(qualification)
    .bind(education_background)
    .bind(skills)
    .bind(interests)
    .bind(work_style)
    .fetch_one(pool)
    .await?;
    Ok(profile)
}
