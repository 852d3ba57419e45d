//! Quiz questions and answer checking
//!
//! The `answer` field of `quizzes.json` is a number for multiple-choice
//! questions and a boolean for true/false questions. It is decoded once, at
//! load time, into [`QuizAnswer`]; a quiz whose answer does not fit its
//! `type` makes the whole file malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::QuizType;
use super::ids_match;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text_zh: String,
    pub text_en: String,
}

/// The correct answer of a quiz, tagged by question type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QuizAnswer {
    /// Zero-based index into `options`
    MultipleChoice(usize),
    TrueFalse(bool),
}

impl QuizAnswer {
    /// Decode the stored answer for a question of the given type
    pub fn decode(quiz_type: QuizType, raw: &Value) -> Result<Self, String> {
        match quiz_type {
            QuizType::MultipleChoice => as_integer(raw)
                .and_then(|i| usize::try_from(i).ok())
                .map(QuizAnswer::MultipleChoice)
                .ok_or_else(|| format!("multiple-choice answer must be an option index, got {raw}")),
            QuizType::TrueFalse => raw
                .as_bool()
                .or_else(|| raw.as_str().and_then(parse_bool))
                .map(QuizAnswer::TrueFalse)
                .ok_or_else(|| format!("true/false answer must be a boolean, got {raw}")),
        }
    }

    pub fn quiz_type(&self) -> QuizType {
        match self {
            QuizAnswer::MultipleChoice(_) => QuizType::MultipleChoice,
            QuizAnswer::TrueFalse(_) => QuizType::TrueFalse,
        }
    }

    /// Check a visitor's answer, coercing numeric strings and booleans the
    /// way the quiz widget may send them
    pub fn accepts(&self, given: &Value) -> bool {
        match self {
            QuizAnswer::MultipleChoice(index) => {
                as_integer(given).is_some_and(|g| usize::try_from(g).is_ok_and(|g| g == *index))
            }
            QuizAnswer::TrueFalse(expected) => {
                let given = match given {
                    Value::Bool(b) => Some(*b),
                    Value::String(s) => parse_bool(s),
                    Value::Number(n) => n.as_i64().map(|i| i != 0),
                    _ => None,
                };
                given == Some(*expected)
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// One quiz question, as stored in `quizzes.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawQuiz")]
pub struct Quiz {
    pub id: String,
    pub animal_id: String,
    pub question_zh: String,
    pub question_en: String,
    pub options: Option<Vec<QuizOption>>,
    pub answer: QuizAnswer,
    pub correct_feedback_zh: String,
    pub correct_feedback_en: String,
}

impl Quiz {
    pub fn quiz_type(&self) -> QuizType {
        self.answer.quiz_type()
    }

    pub fn has_id(&self, id: &str) -> bool {
        ids_match(&self.id, id.trim())
    }

    pub fn is_about(&self, animal_id: &str) -> bool {
        ids_match(&self.animal_id, animal_id.trim())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuiz {
    id: String,
    animal_id: String,
    #[serde(rename = "type")]
    quiz_type: QuizType,
    question_zh: String,
    question_en: String,
    #[serde(default)]
    options: Option<Vec<QuizOption>>,
    answer: Value,
    correct_feedback_zh: String,
    correct_feedback_en: String,
}

impl TryFrom<RawQuiz> for Quiz {
    type Error = String;

    fn try_from(raw: RawQuiz) -> Result<Self, Self::Error> {
        let answer = QuizAnswer::decode(raw.quiz_type, &raw.answer)
            .map_err(|e| format!("quiz {}: {}", raw.id, e))?;

        Ok(Quiz {
            id: raw.id,
            animal_id: raw.animal_id,
            question_zh: raw.question_zh,
            question_en: raw.question_en,
            options: raw.options,
            answer,
            correct_feedback_zh: raw.correct_feedback_zh,
            correct_feedback_en: raw.correct_feedback_en,
        })
    }
}

/// Outcome of checking a visitor's answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerResult {
    pub is_correct: bool,
    pub correct_answer: QuizAnswer,
    pub feedback_zh: String,
    pub feedback_en: String,
}
