//! Prompt constants, prompt builders, and response schemas for the three
//! generation capabilities. The schemas are sent as Gemini `responseSchema`
//! constraints so the model can only answer in the expected shape.

use serde_json::{json, Value};

use crate::models::profile::ProfileRow;

/// System prompt for aptitude test generation. `{career_title}` is replaced
/// before sending.
pub const APTITUDE_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor creating aptitude test questions. Generate a comprehensive aptitude test for the career: "{career_title}".

Create exactly 15 multiple-choice questions across these 5 sections (3 questions per section):
1. Logical Reasoning - Test problem-solving and analytical skills
2. Domain Knowledge - Test relevant technical/field knowledge
3. Communication Skills - Test verbal and written communication abilities
4. Creativity & Innovation - Test creative thinking and innovation
5. Practical Application - Test real-world scenario handling

Each question should have 4 options (A, B, C, D) with one correct answer.

Generate aptitude test for: {career_title}"#;

/// IQ test generation prompt. `{timestamp}` keeps every generated paper
/// unique across runs.
pub const IQ_PROMPT_TEMPLATE: &str = r#"You are an expert psychometrician creating IQ test questions that assess critical thinking, logical reasoning, pattern recognition, and problem-solving abilities.

Generate exactly 10 UNIQUE multiple-choice questions that test:
- Logical reasoning (e.g., deductive logic, if-then statements, syllogisms)
- Pattern recognition (e.g., number sequences, visual patterns, analogies)
- Spatial reasoning (e.g., mental rotation, shape manipulation)
- Mathematical logic (e.g., problem-solving, quantitative reasoning)
- Verbal reasoning (e.g., word relationships, comprehension)

IMPORTANT: Create completely NEW and ORIGINAL questions for timestamp {timestamp}. Do not repeat common or standard IQ test questions. Be creative and vary question types, difficulty, and topics.

Each question must have:
- 4 distinct options with only one correct answer
- Varying difficulty from medium to challenging
- Clear, unambiguous wording
- A logical explanation for the correct answer

Generate an IQ test with 10 critical thinking questions."#;

const CAREER_SYSTEM: &str = r#"You are a career guidance expert AI. Analyze the user's profile and recommend the top 3 most suitable career options based on their qualifications, skills, interests, and work style.

For each career, provide:
1. Career title
2. Confidence score (1-100)
3. Brief description (2-3 sentences)
4. Required skills (list of key skills needed)

Consider:
- Educational background and qualifications
- Current skill set
- Personal interests and passions
- Preferred work style
- Market demand and growth potential

Return exactly 3 career recommendations ranked by suitability."#;

pub fn aptitude_prompt(career_title: &str) -> String {
    APTITUDE_PROMPT_TEMPLATE.replace("{career_title}", career_title)
}

pub fn iq_prompt(timestamp: &str) -> String {
    IQ_PROMPT_TEMPLATE.replace("{timestamp}", timestamp)
}

pub fn career_prompt(profile: &ProfileRow) -> String {
    let list = |items: &[String]| {
        if items.is_empty() {
            "Not specified".to_string()
        } else {
            items.join(", ")
        }
    };
    let field = |value: &Option<String>| {
        value
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "Not specified".to_string())
    };

    format!(
        "{CAREER_SYSTEM}\n\nProfile:\n\
        - Qualification: {}\n\
        - Education: {}\n\
        - Skills: {}\n\
        - Interests: {}\n\
        - Work Style: {}\n\
        - Age: {}\n\n\
        Provide your top 3 career recommendations.",
        field(&profile.qualification),
        field(&profile.education_background),
        list(&profile.skills),
        list(&profile.interests),
        field(&profile.work_style),
        profile
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "Not specified".to_string()),
    )
}

pub fn aptitude_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "section_name": { "type": "string" },
                        "questions": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "question": { "type": "string" },
                                    "options": {
                                        "type": "object",
                                        "properties": {
                                            "A": { "type": "string" },
                                            "B": { "type": "string" },
                                            "C": { "type": "string" },
                                            "D": { "type": "string" }
                                        },
                                        "required": ["A", "B", "C", "D"]
                                    },
                                    "correct_answer": { "type": "string" }
                                },
                                "required": ["question", "options", "correct_answer"]
                            }
                        }
                    },
                    "required": ["section_name", "questions"]
                }
            }
        },
        "required": ["sections"]
    })
}

pub fn iq_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "options": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "correct_answer": { "type": "integer" },
                        "explanation": { "type": "string" }
                    },
                    "required": ["question", "options", "correct_answer", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}

pub fn career_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "careers": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "confidence_score": { "type": "number" },
                        "description": { "type": "string" },
                        "required_skills": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["title", "confidence_score", "description", "required_skills"]
                }
            }
        },
        "required": ["careers"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_aptitude_prompt_embeds_career_title() {
        let prompt = aptitude_prompt("Marine Biologist");
        assert!(prompt.contains("\"Marine Biologist\""));
        assert!(prompt.contains("5 sections"));
    }

    #[test]
    fn test_career_prompt_handles_sparse_profile() {
        let profile = ProfileRow {
            user_id: Uuid::new_v4(),
            full_name: None,
            age: None,
            gender: None,
            qualification: Some("Bachelor's Degree".to_string()),
            education_background: None,
            skills: vec![],
            interests: vec!["Robotics".to_string()],
            work_style: None,
            updated_at: chrono::Utc::now(),
        };
        let prompt = career_prompt(&profile);
        assert!(prompt.contains("Qualification: Bachelor's Degree"));
        assert!(prompt.contains("Skills: Not specified"));
        assert!(prompt.contains("Interests: Robotics"));
        assert!(prompt.contains("Age: Not specified"));
    }

    #[test]
    fn test_schemas_declare_required_fields() {
        let schema = aptitude_schema();
        assert_eq!(schema["required"][0], "sections");
        let schema = iq_schema();
        let required = &schema["properties"]["questions"]["items"]["required"];
        assert!(required.as_array().unwrap().iter().any(|v| v == "explanation"));
        let schema = career_schema();
        assert_eq!(schema["required"][0], "careers");
    }
}
