//! Aptitude assessment engine: section-weighted scoring over a generated
//! five-section test.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::answers::AnswerSheet;
use crate::assessment::Phase;
use crate::errors::AppError;

/// One of the four fixed option labels of an aptitude question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

/// The four option texts of an aptitude question, keyed A–D.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSet {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl OptionSet {
    pub fn get(&self, key: OptionKey) -> &str {
        match key {
            OptionKey::A => &self.a,
            OptionKey::B => &self.b,
            OptionKey::C => &self.c,
            OptionKey::D => &self.d,
        }
    }
}

/// An aptitude question as generated. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeQuestion {
    pub question: String,
    pub options: OptionSet,
    pub correct_answer: OptionKey,
}

/// A named group of questions sharing a skill category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub section_name: String,
    pub questions: Vec<AptitudeQuestion>,
}

/// Qualitative feedback tier, derived from raw correct counts, never from
/// the rounded percentage, to avoid off-by-one misclassification at
/// boundary scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AptitudeTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl AptitudeTier {
    fn for_counts(correct: usize, total: usize) -> Self {
        let correct = correct as f64;
        let total = total as f64;
        if correct >= total * 0.7 {
            AptitudeTier::Excellent
        } else if correct >= total * 0.5 {
            AptitudeTier::Good
        } else {
            AptitudeTier::NeedsImprovement
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            AptitudeTier::Excellent => {
                "Excellent performance! You show strong aptitude for this career."
            }
            AptitudeTier::Good => "Good effort! Consider strengthening weak areas.",
            AptitudeTier::NeedsImprovement => {
                "Keep learning and improving. Focus on fundamentals."
            }
        }
    }
}

/// Per-section score breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct SectionScore {
    pub section_name: String,
    pub correct: usize,
    pub size: usize,
    pub percent: u8,
}

/// Computed result of a submitted aptitude session.
#[derive(Debug, Clone, Serialize)]
pub struct AptitudeScore {
    pub total_correct: usize,
    pub total_questions: usize,
    pub overall_percent: u8,
    pub sections: Vec<SectionScore>,
    pub tier: AptitudeTier,
}

impl AptitudeScore {
    /// Section name → percent map, in the shape persisted alongside results.
    pub fn section_percent_map(&self) -> BTreeMap<String, u8> {
        self.sections
            .iter()
            .map(|s| (s.section_name.clone(), s.percent))
            .collect()
    }
}

/// Review entry pairing a question's full option set with the recorded and
/// correct answers. Unanswered questions are treated as incorrect.
#[derive(Debug, Clone, Serialize)]
pub struct AptitudeReviewEntry {
    pub question_index: usize,
    pub section_name: String,
    pub question: String,
    pub options: OptionSet,
    pub correct_answer: OptionKey,
    pub recorded_answer: Option<OptionKey>,
    pub is_correct: bool,
}

/// In-memory state of one aptitude test session. Question counts are fixed
/// at construction and never change for the life of the session.
#[derive(Debug, Clone)]
pub struct AptitudeSession {
    career_title: String,
    sections: Vec<Section>,
    answers: AnswerSheet<OptionKey>,
    phase: Phase,
    score: Option<AptitudeScore>,
}

impl AptitudeSession {
    pub fn new(career_title: String, sections: Vec<Section>) -> Self {
        let total = sections.iter().map(|s| s.questions.len()).sum();
        Self {
            career_title,
            sections,
            answers: AnswerSheet::new(total),
            phase: Phase::InProgress,
            score: None,
        }
    }

    pub fn career_title(&self) -> &str {
        &self.career_title
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_questions(&self) -> usize {
        self.answers.total_questions()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    /// Records an answer at the flattened question index, overwriting any
    /// existing one.
    pub fn record_answer(&mut self, question_index: usize, answer: OptionKey) -> Result<(), AppError> {
        if self.phase != Phase::InProgress {
            return Err(AppError::Validation(
                "test already submitted".to_string(),
            ));
        }
        self.answers.record(question_index, answer)
    }

    /// True iff an answer exists at the index; gates "Next" in the client.
    pub fn can_advance(&self, question_index: usize) -> bool {
        self.answers.is_answered(question_index)
    }

    pub fn can_submit(&self) -> bool {
        self.answers.is_complete()
    }

    /// Counts correct answers per section and overall, rounding each
    /// percentage to the nearest integer. Idempotent after the first call.
    pub fn submit(&mut self) -> Result<AptitudeScore, AppError> {
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

        let mut total_correct = 0;
        let mut section_scores = Vec::with_capacity(self.sections.len());
        let mut question_index = 0;

        for section in &self.sections {
            let mut correct = 0;
            for q in &section.questions {
                if self.answers.get(question_index) == Some(&q.correct_answer) {
                    correct += 1;
                    total_correct += 1;
                }
                question_index += 1;
            }
            section_scores.push(SectionScore {
                section_name: section.section_name.clone(),
                correct,
                size: section.questions.len(),
                percent: round_percent(correct, section.questions.len()),
            });
        }

        let total = self.total_questions();
        let score = AptitudeScore {
            total_correct,
            total_questions: total,
            overall_percent: round_percent(total_correct, total),
            sections: section_scores,
            tier: AptitudeTier::for_counts(total_correct, total),
        };

        self.phase = Phase::Submitted;
        self.score = Some(score.clone());
        Ok(score)
    }

    pub fn score(&self) -> Option<&AptitudeScore> {
        self.score.as_ref()
    }

    /// Pairs every question with the recorded and correct answers.
    /// Pure read: repeated calls without mutation return identical output.
    pub fn review(&self) -> Result<Vec<AptitudeReviewEntry>, AppError> {
        if self.phase != Phase::Submitted {
            return Err(AppError::Validation(
                "review is available after submission".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(self.total_questions());
        let mut question_index = 0;
        for section in &self.sections {
            for q in &section.questions {
                let recorded = self.answers.get(question_index).copied();
                entries.push(AptitudeReviewEntry {
                    question_index,
                    section_name: section.section_name.clone(),
                    question: q.question.clone(),
                    options: q.options.clone(),
                    correct_answer: q.correct_answer,
                    recorded_answer: recorded,
                    is_correct: recorded == Some(q.correct_answer),
                });
                question_index += 1;
            }
        }
        Ok(entries)
    }
}

/// `round(100 * correct / size)`, matching half-up rounding on the ratio.
fn round_percent(correct: usize, size: usize) -> u8 {
    if size == 0 {
        return 0;
    }
    (correct as f64 / size as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: OptionKey) -> AptitudeQuestion {
        AptitudeQuestion {
            question: "Which option is right?".to_string(),
            options: OptionSet {
                a: "first".to_string(),
                b: "second".to_string(),
                c: "third".to_string(),
                d: "fourth".to_string(),
            },
            correct_answer: correct,
        }
    }

    fn five_sections() -> Vec<Section> {
        (0..5)
            .map(|i| Section {
                section_name: format!("Section {i}"),
                questions: vec![
                    question(OptionKey::A),
                    question(OptionKey::B),
                    question(OptionKey::C),
                ],
            })
            .collect()
    }

    fn answer_section_correctly(session: &mut AptitudeSession, section: usize) {
        let base = section * 3;
        session.record_answer(base, OptionKey::A).unwrap();
        session.record_answer(base + 1, OptionKey::B).unwrap();
        session.record_answer(base + 2, OptionKey::C).unwrap();
    }

    fn answer_section_wrong(session: &mut AptitudeSession, section: usize) {
        let base = section * 3;
        for i in 0..3 {
            session.record_answer(base + i, OptionKey::D).unwrap();
        }
    }

    #[test]
    fn test_four_perfect_sections_one_failed_scores_80() {
        // Scenario: 5 sections x 3 questions, all correct in 4 sections,
        // 0/3 in one -> overall round(100*12/15) = 80.
        let mut session = AptitudeSession::new("Data Analyst".to_string(), five_sections());
        for s in 0..4 {
            answer_section_correctly(&mut session, s);
        }
        answer_section_wrong(&mut session, 4);

        let score = session.submit().unwrap();
        assert_eq!(score.overall_percent, 80);
        assert_eq!(score.total_correct, 12);
        for s in &score.sections[..4] {
            assert_eq!(s.percent, 100);
        }
        assert_eq!(score.sections[4].percent, 0);
    }

    #[test]
    fn test_section_percent_rounds_to_nearest_integer() {
        // 1/3 correct in one section -> round(33.33) = 33; 2/3 -> round(66.67) = 67.
        let mut session = AptitudeSession::new("Engineer".to_string(), five_sections());
        session.record_answer(0, OptionKey::A).unwrap(); // correct
        session.record_answer(1, OptionKey::A).unwrap();
        session.record_answer(2, OptionKey::A).unwrap();
        session.record_answer(3, OptionKey::D).unwrap();
        session.record_answer(4, OptionKey::B).unwrap(); // correct
        session.record_answer(5, OptionKey::C).unwrap(); // correct
        for i in 6..15 {
            session.record_answer(i, OptionKey::D).unwrap();
        }
        let score = session.submit().unwrap();
        assert_eq!(score.sections[0].percent, 33);
        assert_eq!(score.sections[1].percent, 67);
    }

    #[test]
    fn test_tier_thresholds_use_raw_counts() {
        // 15 questions: 0.7 * 15 = 10.5, so 11 correct is Excellent and 10 is
        // not, even though round(100*10/15) = 67 and round(100*11/15) = 73.
        assert_eq!(AptitudeTier::for_counts(11, 15), AptitudeTier::Excellent);
        assert_eq!(AptitudeTier::for_counts(10, 15), AptitudeTier::Good);
        assert_eq!(AptitudeTier::for_counts(8, 15), AptitudeTier::Good);
        assert_eq!(AptitudeTier::for_counts(7, 15), AptitudeTier::NeedsImprovement);
        // Exact boundary: 0.5 * 10 = 5 correct is Good.
        assert_eq!(AptitudeTier::for_counts(5, 10), AptitudeTier::Good);
        assert_eq!(AptitudeTier::for_counts(7, 10), AptitudeTier::Excellent);
    }

    #[test]
    fn test_can_submit_iff_all_answered() {
        let mut session = AptitudeSession::new("Nurse".to_string(), five_sections());
        assert!(!session.can_submit());
        for i in 0..14 {
            session.record_answer(i, OptionKey::A).unwrap();
        }
        assert!(!session.can_submit());
        assert!(session.submit().is_err());
        session.record_answer(14, OptionKey::A).unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn test_can_advance_gates_on_existing_answer() {
        let mut session = AptitudeSession::new("Pilot".to_string(), five_sections());
        assert!(!session.can_advance(0));
        session.record_answer(0, OptionKey::B).unwrap();
        assert!(session.can_advance(0));
    }

    #[test]
    fn test_reanswer_overwrites() {
        let mut session = AptitudeSession::new("Chef".to_string(), five_sections());
        for i in 0..15 {
            session.record_answer(i, OptionKey::D).unwrap();
        }
        // Re-answer question 0 correctly; last write wins.
        session.record_answer(0, OptionKey::A).unwrap();
        let score = session.submit().unwrap();
        assert_eq!(score.total_correct, 1);
    }

    #[test]
    fn test_submit_is_idempotent() {
        let mut session = AptitudeSession::new("Chef".to_string(), five_sections());
        for s in 0..5 {
            answer_section_correctly(&mut session, s);
        }
        let first = session.submit().unwrap();
        let second = session.submit().unwrap();
        assert_eq!(first.overall_percent, second.overall_percent);
        assert_eq!(first.total_correct, second.total_correct);
    }

    #[test]
    fn test_review_is_idempotent() {
        let mut session = AptitudeSession::new("Vet".to_string(), five_sections());
        // Answer everything, submit, then inspect review twice.
        for s in 0..5 {
            answer_section_correctly(&mut session, s);
        }
        session.submit().unwrap();
        let first = session.review().unwrap();
        let second = session.review().unwrap();
        assert_eq!(first.len(), 15);
        assert_eq!(first.len(), second.len());
        assert!(first.iter().all(|e| e.is_correct));
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_review_requires_submission() {
        let session = AptitudeSession::new("Vet".to_string(), five_sections());
        assert!(session.review().is_err());
    }

    #[test]
    fn test_answers_rejected_after_submission() {
        let mut session = AptitudeSession::new("Vet".to_string(), five_sections());
        for s in 0..5 {
            answer_section_correctly(&mut session, s);
        }
        session.submit().unwrap();
        assert!(session.record_answer(0, OptionKey::D).is_err());
    }

    #[test]
    fn test_option_set_deserializes_fixed_labels() {
        let raw = r#"{"A": "one", "B": "two", "C": "three", "D": "four"}"#;
        let options: OptionSet = serde_json::from_str(raw).unwrap();
        assert_eq!(options.get(OptionKey::C), "three");
        // Missing a label is a shape error.
        let bad = r#"{"A": "one", "B": "two", "C": "three"}"#;
        assert!(serde_json::from_str::<OptionSet>(bad).is_err());
    }

    #[test]
    fn test_unknown_correct_answer_key_is_rejected_by_shape() {
        let raw = r#"{
            "question": "pick",
            "options": {"A": "1", "B": "2", "C": "3", "D": "4"},
            "correct_answer": "E"
        }"#;
        assert!(serde_json::from_str::<AptitudeQuestion>(raw).is_err());
    }
}
