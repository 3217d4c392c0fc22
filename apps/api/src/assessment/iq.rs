//! IQ assessment engine: per-question countdown with auto-advance, and a
//! ratio-correct score mapped onto the fixed [85, 145] IQ range.

use serde::{Deserialize, Serialize};

use crate::assessment::answers::AnswerSheet;
use crate::assessment::Phase;
use crate::errors::AppError;

/// Countdown seed for every question, in seconds.
pub const QUESTION_SECONDS: u32 = 30;
/// Lower and upper bounds of the IQ scale.
pub const IQ_MIN: u32 = 85;
pub const IQ_MAX: u32 = 145;

/// An IQ question as generated. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IqQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
}

/// Qualitative feedback tier derived from the IQ score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IqTier {
    Exceptional,
    Great,
    Good,
    KeepPracticing,
}

impl IqTier {
    fn for_score(iq: u32) -> Self {
        if iq >= 130 {
            IqTier::Exceptional
        } else if iq >= 115 {
            IqTier::Great
        } else if iq >= 100 {
            IqTier::Good
        } else {
            IqTier::KeepPracticing
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            IqTier::Exceptional => {
                "Exceptional! You have outstanding critical thinking abilities."
            }
            IqTier::Great => "Great job! Your logical reasoning skills are strong.",
            IqTier::Good => "Good effort! Keep practicing to improve your critical thinking.",
            IqTier::KeepPracticing => {
                "Keep learning! Practice more to enhance your reasoning abilities."
            }
        }
    }
}

/// Computed result of a submitted IQ session.
#[derive(Debug, Clone, Serialize)]
pub struct IqScore {
    pub correct_count: usize,
    pub total_questions: usize,
    /// Always within [85, 145].
    pub iq: u32,
    pub tier: IqTier,
}

/// Review entry; the explanation is surfaced regardless of correctness.
#[derive(Debug, Clone, Serialize)]
pub struct IqReviewEntry {
    pub question_index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub recorded_answer: Option<usize>,
    pub is_correct: bool,
    pub explanation: String,
}

/// In-memory state of one IQ test session.
///
/// The countdown is driven externally (one `tick()` per second while
/// in-progress); all timing semantics live here so they stay testable
/// without a runtime.
#[derive(Debug, Clone)]
pub struct IqSession {
    questions: Vec<IqQuestion>,
    answers: AnswerSheet<usize>,
    current_index: usize,
    time_left: u32,
    phase: Phase,
    score: Option<IqScore>,
}

impl IqSession {
    pub fn new(questions: Vec<IqQuestion>) -> Self {
        let total = questions.len();
        Self {
            questions,
            answers: AnswerSheet::new(total),
            current_index: 0,
            time_left: QUESTION_SECONDS,
            phase: Phase::InProgress,
            score: None,
        }
    }

    pub fn questions(&self) -> &[IqQuestion] {
        &self.questions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn total_questions(&self) -> usize {
        self.answers.total_questions()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    /// Records an answer, overwriting any previous one at that index.
    /// The option index must be valid for that question.
    pub fn record_answer(&mut self, question_index: usize, option_index: usize) -> Result<(), AppError> {
        if self.phase != Phase::InProgress {
            return Err(AppError::Validation("test already submitted".to_string()));
        }
        let question = self.questions.get(question_index).ok_or_else(|| {
            AppError::InvalidAnswer(format!(
                "question index {question_index} out of range (0..{})",
                self.questions.len()
            ))
        })?;
        if option_index >= question.options.len() {
            return Err(AppError::InvalidAnswer(format!(
                "option index {option_index} out of range for question {question_index}"
            )));
        }
        self.answers.record(question_index, option_index)
    }

    pub fn can_advance(&self, question_index: usize) -> bool {
        self.answers.is_answered(question_index)
    }

    pub fn can_submit(&self) -> bool {
        self.answers.is_complete()
    }

    /// Manual "Next": requires an answer at the current question. Resets the
    /// countdown on index change.
    pub fn advance(&mut self) -> Result<(), AppError> {
        if self.phase != Phase::InProgress {
            return Err(AppError::Validation("test already submitted".to_string()));
        }
        if !self.can_advance(self.current_index) {
            return Err(AppError::Validation(
                "current question must be answered before advancing".to_string(),
            ));
        }
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.time_left = QUESTION_SECONDS;
        }
        Ok(())
    }

    /// Manual "Previous". Resets the countdown on index change.
    pub fn back(&mut self) -> Result<(), AppError> {
        if self.phase != Phase::InProgress {
            return Err(AppError::Validation("test already submitted".to_string()));
        }
        if self.current_index > 0 {
            self.current_index -= 1;
            self.time_left = QUESTION_SECONDS;
        }
        Ok(())
    }

    /// One countdown tick. On reaching zero mid-test the engine advances
    /// past the current question without requiring an answer and reseeds the
    /// countdown; on the last question it holds at zero and never
    /// auto-submits. Returns false once ticking is pointless (submitted).
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        if self.time_left > 0 {
            self.time_left -= 1;
        }
        if self.time_left == 0 && self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.time_left = QUESTION_SECONDS;
        }
        true
    }

    /// `iq = round(85 + ratio * 60)` with the ratio clamped into [0, 1].
    /// Idempotent after the first call.
    pub fn submit(&mut self) -> Result<IqScore, AppError> {
        if let Some(score) = &self.score {
            return Ok(score.clone());
        }
        if !self.can_submit() {
            return Err(AppError::Validation(format!(
                "all questions must be answered before submitting ({}/{} answered)",
                self.answers.answered_count(),
                self.total_questions()
            )));
        }

        let correct_count = self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(*i) == Some(&q.correct_answer))
            .count();

        let ratio = if self.questions.is_empty() {
            0.0
        } else {
            (correct_count as f64 / self.questions.len() as f64).clamp(0.0, 1.0)
        };
        let iq = (IQ_MIN as f64 + ratio * (IQ_MAX - IQ_MIN) as f64).round() as u32;
        let iq = iq.clamp(IQ_MIN, IQ_MAX);

        let score = IqScore {
            correct_count,
            total_questions: self.questions.len(),
            iq,
            tier: IqTier::for_score(iq),
        };

        self.phase = Phase::Submitted;
        self.score = Some(score.clone());
        Ok(score)
    }

    pub fn score(&self) -> Option<&IqScore> {
        self.score.as_ref()
    }

    /// Pure read: repeated calls without mutation return identical output.
    pub fn review(&self) -> Result<Vec<IqReviewEntry>, AppError> {
        if self.phase != Phase::Submitted {
            return Err(AppError::Validation(
                "review is available after submission".to_string(),
            ));
        }
        Ok(self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let recorded = self.answers.get(i).copied();
                IqReviewEntry {
                    question_index: i,
                    question: q.question.clone(),
                    options: q.options.clone(),
                    correct_answer: q.correct_answer,
                    recorded_answer: recorded,
                    is_correct: recorded == Some(q.correct_answer),
                    explanation: q.explanation.clone(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_questions() -> Vec<IqQuestion> {
        (0..10)
            .map(|i| IqQuestion {
                question: format!("Pattern {i}: what comes next?"),
                options: vec![
                    "alpha".to_string(),
                    "beta".to_string(),
                    "gamma".to_string(),
                    "delta".to_string(),
                ],
                correct_answer: i % 4,
                explanation: format!("The sequence repeats every {} steps.", i % 4 + 1),
            })
            .collect()
    }

    fn answer_n_correctly(session: &mut IqSession, n: usize) {
        for i in 0..session.total_questions() {
            let correct = session.questions()[i].correct_answer;
            let wrong = (correct + 1) % session.questions()[i].options.len();
            session
                .record_answer(i, if i < n { correct } else { wrong })
                .unwrap();
        }
    }

    #[test]
    fn test_six_of_ten_maps_to_121_great() {
        // Scenario: round(85 + 60 * 0.6) = 121 -> "great" tier.
        let mut session = IqSession::new(ten_questions());
        answer_n_correctly(&mut session, 6);
        let score = session.submit().unwrap();
        assert_eq!(score.iq, 121);
        assert_eq!(score.tier, IqTier::Great);
        assert_eq!(score.correct_count, 6);
    }

    #[test]
    fn test_iq_stays_within_scale_bounds() {
        for n in 0..=10 {
            let mut session = IqSession::new(ten_questions());
            answer_n_correctly(&mut session, n);
            let score = session.submit().unwrap();
            assert!((IQ_MIN..=IQ_MAX).contains(&score.iq), "n={n} iq={}", score.iq);
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(IqTier::for_score(145), IqTier::Exceptional);
        assert_eq!(IqTier::for_score(130), IqTier::Exceptional);
        assert_eq!(IqTier::for_score(129), IqTier::Great);
        assert_eq!(IqTier::for_score(115), IqTier::Great);
        assert_eq!(IqTier::for_score(114), IqTier::Good);
        assert_eq!(IqTier::for_score(100), IqTier::Good);
        assert_eq!(IqTier::for_score(99), IqTier::KeepPracticing);
        assert_eq!(IqTier::for_score(85), IqTier::KeepPracticing);
    }

    #[test]
    fn test_timeout_auto_advances_without_answer_and_reseeds() {
        let mut session = IqSession::new(ten_questions());
        assert_eq!(session.current_index(), 0);
        for _ in 0..QUESTION_SECONDS {
            assert!(session.tick());
        }
        // Question 0 timed out unanswered: index moved on, timer reseeded.
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_left(), QUESTION_SECONDS);
        assert!(!session.can_advance(0));
    }

    #[test]
    fn test_timeout_on_last_question_holds_and_never_auto_submits() {
        let mut session = IqSession::new(ten_questions());
        // Walk to the last question via timeouts.
        for _ in 0..(9 * QUESTION_SECONDS) {
            session.tick();
        }
        assert_eq!(session.current_index(), 9);
        // Exhaust the last countdown and keep ticking.
        for _ in 0..(2 * QUESTION_SECONDS) {
            session.tick();
        }
        assert_eq!(session.current_index(), 9);
        assert_eq!(session.time_left(), 0);
        assert_eq!(session.phase(), Phase::InProgress);
        // Submission is still gated on all answers.
        assert!(session.submit().is_err());
    }

    #[test]
    fn test_manual_advance_requires_answer_and_resets_timer() {
        let mut session = IqSession::new(ten_questions());
        assert!(session.advance().is_err());
        session.record_answer(0, 0).unwrap();
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.time_left(), QUESTION_SECONDS - 5);
        session.advance().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_left(), QUESTION_SECONDS);
    }

    #[test]
    fn test_back_resets_timer() {
        let mut session = IqSession::new(ten_questions());
        session.record_answer(0, 0).unwrap();
        session.advance().unwrap();
        for _ in 0..7 {
            session.tick();
        }
        session.back().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_left(), QUESTION_SECONDS);
        // Back at the first question is a no-op.
        session.back().unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_tick_stops_after_submission() {
        let mut session = IqSession::new(ten_questions());
        answer_n_correctly(&mut session, 10);
        session.submit().unwrap();
        assert!(!session.tick());
    }

    #[test]
    fn test_option_index_out_of_range_rejected() {
        let mut session = IqSession::new(ten_questions());
        assert!(matches!(
            session.record_answer(0, 4),
            Err(AppError::InvalidAnswer(_))
        ));
        assert!(matches!(
            session.record_answer(10, 0),
            Err(AppError::InvalidAnswer(_))
        ));
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_review_surfaces_explanations_for_all_questions() {
        let mut session = IqSession::new(ten_questions());
        answer_n_correctly(&mut session, 4);
        session.submit().unwrap();
        let entries = session.review().unwrap();
        assert_eq!(entries.len(), 10);
        assert!(entries.iter().all(|e| !e.explanation.is_empty()));
        assert_eq!(entries.iter().filter(|e| e.is_correct).count(), 4);

        let again = session.review().unwrap();
        assert_eq!(
            serde_json::to_value(&entries).unwrap(),
            serde_json::to_value(&again).unwrap()
        );
    }

    #[test]
    fn test_submit_idempotent_and_answers_frozen() {
        let mut session = IqSession::new(ten_questions());
        answer_n_correctly(&mut session, 10);
        let first = session.submit().unwrap();
        assert!(session.record_answer(0, 1).is_err());
        let second = session.submit().unwrap();
        assert_eq!(first.iq, second.iq);
    }
}
