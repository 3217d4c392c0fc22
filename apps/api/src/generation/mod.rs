//! The three AI generation capabilities: aptitude test, IQ test, and career
//! recommendations. All calls go through `llm_client`; no direct Gemini
//! requests elsewhere.
//!
//! Each capability is a single request/response call constrained by a
//! response schema, followed by shape validation beyond what serde enforces.
//! A payload failing validation is a `Generation` error; nothing is retried
//! automatically.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::assessment::aptitude::Section;
use crate::assessment::iq::IqQuestion;
use crate::errors::AppError;
use crate::llm_client::GeminiClient;
use crate::models::profile::ProfileRow;
use crate::recommendations::Career;

pub mod prompts;

pub const APTITUDE_SECTION_COUNT: usize = 5;
pub const QUESTIONS_PER_SECTION: usize = 3;
pub const IQ_QUESTION_COUNT: usize = 10;
pub const RECOMMENDATION_COUNT: usize = 3;

/// The generation-service seam. `AppState` holds an `Arc<dyn
/// GenerationService>` so handlers and tests can swap the Gemini backing.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn aptitude_test(&self, career_title: &str) -> Result<Vec<Section>, AppError>;
    async fn iq_test(&self) -> Result<Vec<IqQuestion>, AppError>;
    async fn career_recommendations(&self, profile: &ProfileRow) -> Result<Vec<Career>, AppError>;
}

#[derive(Debug, Deserialize)]
struct AptitudePayload {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct IqPayload {
    questions: Vec<IqQuestion>,
}

#[derive(Debug, Deserialize)]
struct CareersPayload {
    careers: Vec<Career>,
}

/// Gemini-backed implementation.
pub struct GeminiGeneration {
    client: GeminiClient,
}

impl GeminiGeneration {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationService for GeminiGeneration {
    async fn aptitude_test(&self, career_title: &str) -> Result<Vec<Section>, AppError> {
        let prompt = prompts::aptitude_prompt(career_title);
        let payload: AptitudePayload = self
            .client
            .generate_json(&prompt, prompts::aptitude_schema())
            .await?;
        validate_sections(&payload.sections)?;
        info!(
            "Generated aptitude test for '{career_title}': {} sections",
            payload.sections.len()
        );
        Ok(payload.sections)
    }

    async fn iq_test(&self) -> Result<Vec<IqQuestion>, AppError> {
        let prompt = prompts::iq_prompt(&Utc::now().to_rfc3339());
        let payload: IqPayload = self
            .client
            .generate_json(&prompt, prompts::iq_schema())
            .await?;
        validate_iq_questions(&payload.questions)?;
        info!("Generated IQ test: {} questions", payload.questions.len());
        Ok(payload.questions)
    }

    async fn career_recommendations(&self, profile: &ProfileRow) -> Result<Vec<Career>, AppError> {
        let prompt = prompts::career_prompt(profile);
        let payload: CareersPayload = self
            .client
            .generate_json(&prompt, prompts::career_schema())
            .await?;
        validate_careers(&payload.careers)?;
        info!(
            "Generated {} career recommendations for user {}",
            payload.careers.len(),
            profile.user_id
        );
        Ok(payload.careers)
    }
}

/// Aptitude payloads must carry exactly 5 sections of 3 questions each.
/// Counts are fixed at generation time and never change during a session.
fn validate_sections(sections: &[Section]) -> Result<(), AppError> {
    if sections.len() != APTITUDE_SECTION_COUNT {
        return Err(AppError::Generation(format!(
            "expected {APTITUDE_SECTION_COUNT} sections, got {}",
            sections.len()
        )));
    }
    for section in sections {
        if section.section_name.trim().is_empty() {
            return Err(AppError::Generation("section with empty name".to_string()));
        }
        if section.questions.len() != QUESTIONS_PER_SECTION {
            return Err(AppError::Generation(format!(
                "section '{}' has {} questions, expected {QUESTIONS_PER_SECTION}",
                section.section_name,
                section.questions.len()
            )));
        }
    }
    Ok(())
}

/// IQ payloads must carry exactly 10 questions with in-bounds answer indices.
fn validate_iq_questions(questions: &[IqQuestion]) -> Result<(), AppError> {
    if questions.len() != IQ_QUESTION_COUNT {
        return Err(AppError::Generation(format!(
            "expected {IQ_QUESTION_COUNT} questions, got {}",
            questions.len()
        )));
    }
    for (i, q) in questions.iter().enumerate() {
        if q.options.len() < 2 {
            return Err(AppError::Generation(format!(
                "question {i} has {} options",
                q.options.len()
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(AppError::Generation(format!(
                "question {i} has correct_answer {} out of range (0..{})",
                q.correct_answer,
                q.options.len()
            )));
        }
    }
    Ok(())
}

/// Recommendation payloads must carry exactly 3 careers with confidence
/// scores on the 0-100 scale.
fn validate_careers(careers: &[Career]) -> Result<(), AppError> {
    if careers.len() != RECOMMENDATION_COUNT {
        return Err(AppError::Generation(format!(
            "expected {RECOMMENDATION_COUNT} career recommendations, got {}",
            careers.len()
        )));
    }
    for career in careers {
        if career.title.trim().is_empty() {
            return Err(AppError::Generation("career with empty title".to_string()));
        }
        if !(0.0..=100.0).contains(&career.confidence_score) {
            return Err(AppError::Generation(format!(
                "career '{}' has confidence score {} outside 0-100",
                career.title, career.confidence_score
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::aptitude::{AptitudeQuestion, OptionKey, OptionSet};

    fn valid_sections() -> Vec<Section> {
        (0..5)
            .map(|i| Section {
                section_name: format!("Section {i}"),
                questions: (0..3)
                    .map(|_| AptitudeQuestion {
                        question: "q".to_string(),
                        options: OptionSet {
                            a: "1".to_string(),
                            b: "2".to_string(),
                            c: "3".to_string(),
                            d: "4".to_string(),
                        },
                        correct_answer: OptionKey::A,
                    })
                    .collect(),
            })
            .collect()
    }

    fn valid_iq_questions() -> Vec<IqQuestion> {
        (0..10)
            .map(|i| IqQuestion {
                question: format!("q{i}"),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 1,
                explanation: "because".to_string(),
            })
            .collect()
    }

    fn career(score: f64) -> Career {
        Career {
            title: "UX Designer".to_string(),
            confidence_score: score,
            description: "Designs interfaces.".to_string(),
            required_skills: vec!["Figma".to_string()],
        }
    }

    #[test]
    fn test_valid_payloads_pass() {
        assert!(validate_sections(&valid_sections()).is_ok());
        assert!(validate_iq_questions(&valid_iq_questions()).is_ok());
        assert!(validate_careers(&[career(90.0), career(75.0), career(60.0)]).is_ok());
    }

    #[test]
    fn test_wrong_section_count_rejected() {
        let mut sections = valid_sections();
        sections.pop();
        assert!(matches!(
            validate_sections(&sections),
            Err(AppError::Generation(_))
        ));
    }

    #[test]
    fn test_wrong_question_count_rejected() {
        let mut sections = valid_sections();
        sections[2].questions.pop();
        assert!(validate_sections(&sections).is_err());
    }

    #[test]
    fn test_iq_answer_index_out_of_range_rejected() {
        let mut questions = valid_iq_questions();
        questions[4].correct_answer = 2;
        assert!(matches!(
            validate_iq_questions(&questions),
            Err(AppError::Generation(_))
        ));
    }

    #[test]
    fn test_iq_question_count_enforced() {
        let mut questions = valid_iq_questions();
        questions.pop();
        assert!(validate_iq_questions(&questions).is_err());
    }

    #[test]
    fn test_career_count_and_confidence_enforced() {
        assert!(validate_careers(&[career(90.0), career(75.0)]).is_err());
        assert!(validate_careers(&[career(90.0), career(120.0), career(60.0)]).is_err());
    }

    #[test]
    fn test_malformed_payload_fails_deserialization() {
        // Missing correct_answer: the shape error surfaces before any
        // session state is created.
        let raw = r#"{"sections": [{"section_name": "Logic", "questions": [
            {"question": "q", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}}
        ]}]}"#;
        assert!(serde_json::from_str::<AptitudePayload>(raw).is_err());
    }
}
