//! Axum route handlers for both assessment engines.
//!
//! Scores are computed locally and always returned; persistence of a
//! completed result is best-effort: a failed save is logged and reported in
//! the response, never blocks the score.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::assessment::aptitude::{
    AptitudeReviewEntry, AptitudeScore, AptitudeSession, OptionKey, OptionSet, Section,
};
use crate::assessment::iq::{IqQuestion, IqReviewEntry, IqScore, IqSession, IQ_MAX};
use crate::assessment::timer::{Countdown, Tick};
use crate::assessment::Phase;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Session store payloads
// ────────────────────────────────────────────────────────────────────────────

pub struct AptitudeRunner {
    pub user_id: Uuid,
    pub session: AptitudeSession,
}

pub struct IqRunner {
    pub user_id: Uuid,
    pub session: IqSession,
    /// The one live countdown for this session. Replaced slots drop it,
    /// which aborts the driving task.
    pub countdown: Option<Countdown>,
}

impl Tick for IqRunner {
    fn tick(&mut self) -> bool {
        self.session.tick()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartAptitudeRequest {
    pub user_id: Uuid,
    pub career_title: String,
}

#[derive(Debug, Deserialize)]
pub struct StartIqRequest {
    pub user_id: Uuid,
}

/// Client view of an aptitude question; the correct answer is withheld.
#[derive(Debug, Serialize)]
pub struct AptitudeQuestionView {
    pub question: String,
    pub options: OptionSet,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub section_name: String,
    pub questions: Vec<AptitudeQuestionView>,
}

#[derive(Debug, Serialize)]
pub struct StartAptitudeResponse {
    pub session_id: Uuid,
    pub career_title: String,
    pub total_questions: usize,
    pub sections: Vec<SectionView>,
}

/// Client view of an IQ question; correct answer and explanation are
/// withheld until review.
#[derive(Debug, Serialize)]
pub struct IqQuestionView {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StartIqResponse {
    pub session_id: Uuid,
    pub total_questions: usize,
    pub seconds_per_question: u32,
    pub questions: Vec<IqQuestionView>,
}

#[derive(Debug, Deserialize)]
pub struct AptitudeAnswerRequest {
    pub question_index: usize,
    pub answer: OptionKey,
}

#[derive(Debug, Deserialize)]
pub struct IqAnswerRequest {
    pub question_index: usize,
    pub answer: usize,
}

/// Progress acknowledgement after recording an answer.
#[derive(Debug, Serialize)]
pub struct AnswerAck {
    pub answered: usize,
    pub total_questions: usize,
    pub can_advance: bool,
    pub can_submit: bool,
}

#[derive(Debug, Serialize)]
pub struct AptitudeSubmitResponse {
    pub career_title: String,
    pub overall_percent: u8,
    pub section_scores: BTreeMap<String, u8>,
    pub feedback: String,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct IqSubmitResponse {
    pub iq_score: u32,
    pub max_score: u32,
    pub feedback: String,
    pub saved: bool,
}

/// Live IQ session state, polled by the client alongside its own countdown
/// display.
#[derive(Debug, Serialize)]
pub struct IqStateView {
    pub phase: Phase,
    pub current_index: usize,
    pub time_left: u32,
    pub answered: usize,
    pub total_questions: usize,
    pub can_submit: bool,
}

fn section_views(sections: &[Section]) -> Vec<SectionView> {
    sections
        .iter()
        .map(|s| SectionView {
            section_name: s.section_name.clone(),
            questions: s
                .questions
                .iter()
                .map(|q| AptitudeQuestionView {
                    question: q.question.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        })
        .collect()
}

fn question_views(questions: &[IqQuestion]) -> Vec<IqQuestionView> {
    questions
        .iter()
        .map(|q| IqQuestionView {
            question: q.question.clone(),
            options: q.options.clone(),
        })
        .collect()
}

fn iq_state_view(session: &IqSession) -> IqStateView {
    IqStateView {
        phase: session.phase(),
        current_index: session.current_index(),
        time_left: session.time_left(),
        answered: session.answered_count(),
        total_questions: session.total_questions(),
        can_submit: session.can_submit(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aptitude handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/aptitude/sessions
///
/// Generation happens before any session state is touched: a failed or
/// malformed generation leaves the prior session (if any) intact.
pub async fn start_aptitude(
    State(state): State<AppState>,
    Json(req): Json<StartAptitudeRequest>,
) -> Result<Json<StartAptitudeResponse>, AppError> {
    let sections = state.generator.aptitude_test(&req.career_title).await?;
    let views = section_views(&sections);

    let session = AptitudeSession::new(req.career_title.clone(), sections);
    let total_questions = session.total_questions();
    let runner = AptitudeRunner {
        user_id: req.user_id,
        session,
    };
    let (session_id, _) = state.aptitude_sessions.start(req.user_id, runner).await;

    info!(
        "Started aptitude session {session_id} for user {} ({})",
        req.user_id, req.career_title
    );

    Ok(Json(StartAptitudeResponse {
        session_id,
        career_title: req.career_title,
        total_questions,
        sections: views,
    }))
}

/// POST /api/v1/aptitude/sessions/:id/answers
pub async fn answer_aptitude(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AptitudeAnswerRequest>,
) -> Result<Json<AnswerAck>, AppError> {
    let slot = aptitude_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;
    runner.session.record_answer(req.question_index, req.answer)?;
    Ok(Json(AnswerAck {
        answered: runner.session.answered_count(),
        total_questions: runner.session.total_questions(),
        can_advance: runner.session.can_advance(req.question_index),
        can_submit: runner.session.can_submit(),
    }))
}

/// POST /api/v1/aptitude/sessions/:id/submit
pub async fn submit_aptitude(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AptitudeSubmitResponse>, AppError> {
    let slot = aptitude_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;

    let already_submitted = runner.session.score().is_some();
    let score = runner.session.submit()?;

    // Result rows are append-only: persist only on the first submit.
    let saved = if already_submitted {
        true
    } else {
        save_aptitude_result(
            &state.db,
            runner.user_id,
            runner.session.career_title(),
            &score,
        )
        .await
    };

    Ok(Json(AptitudeSubmitResponse {
        career_title: runner.session.career_title().to_string(),
        overall_percent: score.overall_percent,
        section_scores: score.section_percent_map(),
        feedback: score.tier.feedback().to_string(),
        saved,
    }))
}

/// GET /api/v1/aptitude/sessions/:id/review
pub async fn review_aptitude(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<AptitudeReviewEntry>>, AppError> {
    let slot = aptitude_slot(&state, session_id).await?;
    let runner = slot.lock().await;
    Ok(Json(runner.session.review()?))
}

// ────────────────────────────────────────────────────────────────────────────
// IQ handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/iq/sessions
pub async fn start_iq(
    State(state): State<AppState>,
    Json(req): Json<StartIqRequest>,
) -> Result<Json<StartIqResponse>, AppError> {
    let questions = state.generator.iq_test().await?;
    let views = question_views(&questions);

    let session = IqSession::new(questions);
    let total_questions = session.total_questions();
    let runner = IqRunner {
        user_id: req.user_id,
        session,
        countdown: None,
    };
    let (session_id, slot) = state.iq_sessions.start(req.user_id, runner).await;

    // Start the countdown only once the session is registered. Replacing a
    // user's previous session dropped its countdown with it.
    slot.lock().await.countdown = Some(Countdown::spawn(Arc::downgrade(&slot)));

    info!("Started IQ session {session_id} for user {}", req.user_id);

    Ok(Json(StartIqResponse {
        session_id,
        total_questions,
        seconds_per_question: crate::assessment::iq::QUESTION_SECONDS,
        questions: views,
    }))
}

/// GET /api/v1/iq/sessions/:id
pub async fn iq_state(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<IqStateView>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let runner = slot.lock().await;
    Ok(Json(iq_state_view(&runner.session)))
}

/// POST /api/v1/iq/sessions/:id/answers
pub async fn answer_iq(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<IqAnswerRequest>,
) -> Result<Json<AnswerAck>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;
    runner.session.record_answer(req.question_index, req.answer)?;
    Ok(Json(AnswerAck {
        answered: runner.session.answered_count(),
        total_questions: runner.session.total_questions(),
        can_advance: runner.session.can_advance(req.question_index),
        can_submit: runner.session.can_submit(),
    }))
}

/// POST /api/v1/iq/sessions/:id/advance
pub async fn advance_iq(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<IqStateView>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;
    runner.session.advance()?;
    Ok(Json(iq_state_view(&runner.session)))
}

/// POST /api/v1/iq/sessions/:id/back
pub async fn back_iq(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<IqStateView>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;
    runner.session.back()?;
    Ok(Json(iq_state_view(&runner.session)))
}

/// POST /api/v1/iq/sessions/:id/submit
pub async fn submit_iq(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<IqSubmitResponse>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let mut runner = slot.lock().await;

    let already_submitted = runner.session.score().is_some();
    let score = runner.session.submit()?;
    // The countdown task would stop on its next tick anyway; drop it now.
    runner.countdown.take();

    let saved = if already_submitted {
        true
    } else {
        save_iq_result(&state.db, runner.user_id, &score).await
    };

    Ok(Json(IqSubmitResponse {
        iq_score: score.iq,
        max_score: IQ_MAX,
        feedback: score.tier.feedback().to_string(),
        saved,
    }))
}

/// GET /api/v1/iq/sessions/:id/review
pub async fn review_iq(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<IqReviewEntry>>, AppError> {
    let slot = iq_slot(&state, session_id).await?;
    let runner = slot.lock().await;
    Ok(Json(runner.session.review()?))
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence (best-effort)
// ────────────────────────────────────────────────────────────────────────────

async fn save_aptitude_result(
    db: &PgPool,
    user_id: Uuid,
    career_title: &str,
    score: &AptitudeScore,
) -> bool {
    let section_scores = serde_json::to_value(score.section_percent_map()).unwrap_or_default();
    let result = sqlx::query(
        r#"
        INSERT INTO test_results
            (user_id, career_title, total_score, max_score, section_scores, feedback)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(career_title)
    .bind(score.total_correct as i32)
    .bind(score.total_questions as i32)
    .bind(sqlx::types::Json(section_scores))
    .bind(score.tier.feedback())
    .execute(db)
    .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            error!("Failed to save aptitude result for user {user_id}: {e}");
            false
        }
    }
}

async fn save_iq_result(db: &PgPool, user_id: Uuid, score: &IqScore) -> bool {
    // max_score is the scale bound, not the raw question count.
    let result = sqlx::query(
        r#"
        INSERT INTO iq_test_results (user_id, total_score, max_score, feedback)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(score.iq as i32)
    .bind(IQ_MAX as i32)
    .bind(score.tier.feedback())
    .execute(db)
    .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            error!("Failed to save IQ result for user {user_id}: {e}");
            false
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lookup helpers
// ────────────────────────────────────────────────────────────────────────────

async fn aptitude_slot(
    state: &AppState,
    session_id: Uuid,
) -> Result<Arc<tokio::sync::Mutex<AptitudeRunner>>, AppError> {
    state
        .aptitude_sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Aptitude session {session_id} not found")))
}

async fn iq_slot(
    state: &AppState,
    session_id: Uuid,
) -> Result<Arc<tokio::sync::Mutex<IqRunner>>, AppError> {
    state
        .iq_sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("IQ session {session_id} not found")))
}
