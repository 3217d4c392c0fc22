//! Shared answer-state contract for both assessment engines.

use std::collections::HashMap;

use crate::errors::AppError;

/// Records the user's selections keyed by flattened question index.
/// Last write wins on re-answer; an entry's key is always a valid index.
#[derive(Debug, Clone)]
pub struct AnswerSheet<A> {
    total_questions: usize,
    answers: HashMap<usize, A>,
}

impl<A> AnswerSheet<A> {
    pub fn new(total_questions: usize) -> Self {
        Self {
            total_questions,
            answers: HashMap::new(),
        }
    }

    /// Records an answer, overwriting any previous one at that index.
    pub fn record(&mut self, question_index: usize, answer: A) -> Result<(), AppError> {
        if question_index >= self.total_questions {
            return Err(AppError::InvalidAnswer(format!(
                "question index {question_index} out of range (0..{})",
                self.total_questions
            )));
        }
        self.answers.insert(question_index, answer);
        Ok(())
    }

    pub fn get(&self, question_index: usize) -> Option<&A> {
        self.answers.get(&question_index)
    }

    pub fn is_answered(&self, question_index: usize) -> bool {
        self.answers.contains_key(&question_index)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// True iff every question index in [0, total) has an answer.
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.total_questions
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_overwrite_last_write_wins() {
        let mut sheet = AnswerSheet::new(3);
        sheet.record(1, "A").unwrap();
        sheet.record(1, "C").unwrap();
        assert_eq!(sheet.get(1), Some(&"C"));
        assert_eq!(sheet.answered_count(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected_without_state_change() {
        let mut sheet = AnswerSheet::new(3);
        assert!(matches!(
            sheet.record(3, "A"),
            Err(AppError::InvalidAnswer(_))
        ));
        assert_eq!(sheet.answered_count(), 0);
    }

    #[test]
    fn test_complete_iff_every_index_answered() {
        let mut sheet = AnswerSheet::new(2);
        assert!(!sheet.is_complete());
        sheet.record(0, 1usize).unwrap();
        assert!(!sheet.is_complete());
        sheet.record(1, 0usize).unwrap();
        assert!(sheet.is_complete());
    }
}
