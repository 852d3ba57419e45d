use std::sync::Arc;

use rand::seq::SliceRandom;
use serde_json::Value;

use crate::data::{DataError, JsonDataStore, QUIZZES_FILE};
use crate::models::{Quiz, QuizAnswerResult};

#[derive(Clone)]
pub struct QuizService {
    store: Arc<JsonDataStore>,
}

impl QuizService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Arc<Vec<Quiz>>, DataError> {
        tracing::debug!("Loading all quizzes");
        self.store.load::<Quiz>(QUIZZES_FILE, "quizzes").await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Quiz>, DataError> {
        if id.trim().is_empty() {
            tracing::warn!("Quiz id must not be blank");
            return Ok(None);
        }

        let quizzes = self.get_all().await?;
        Ok(quizzes.iter().find(|q| q.has_id(id)).cloned())
    }

    pub async fn get_by_animal_id(&self, animal_id: &str) -> Result<Vec<Quiz>, DataError> {
        if animal_id.trim().is_empty() {
            tracing::warn!("Animal id must not be blank");
            return Ok(Vec::new());
        }

        let quizzes = self.get_all().await?;
        let matching: Vec<Quiz> = quizzes
            .iter()
            .filter(|q| q.is_about(animal_id))
            .cloned()
            .collect();

        tracing::debug!("Animal {} has {} quizzes", animal_id, matching.len());
        Ok(matching)
    }

    /// Check a visitor's answer; `None` when the quiz does not exist
    pub async fn validate_answer(
        &self,
        quiz_id: &str,
        answer: &Value,
    ) -> Result<Option<QuizAnswerResult>, DataError> {
        let Some(quiz) = self.get_by_id(quiz_id).await? else {
            tracing::warn!("Cannot validate answer: quiz {} not found", quiz_id);
            return Ok(None);
        };

        let is_correct = quiz.answer.accepts(answer);
        tracing::info!("Quiz {} answered {}", quiz.id, if is_correct { "correctly" } else { "incorrectly" });

        Ok(Some(QuizAnswerResult {
            is_correct,
            correct_answer: quiz.answer,
            feedback_zh: quiz.correct_feedback_zh,
            feedback_en: quiz.correct_feedback_en,
        }))
    }

    /// Up to `count` distinct quizzes in random order
    pub async fn get_random(&self, count: usize) -> Result<Vec<Quiz>, DataError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let quizzes = self.get_all().await?;
        let mut rng = rand::thread_rng();
        Ok(quizzes
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CacheSettings;
    use crate::models::{QuizAnswer, QuizType};
    use serde_json::json;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn fixture_quizzes() -> (Arc<JsonDataStore>, QuizService) {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let store = Arc::new(JsonDataStore::new(dir, CacheSettings::default()));
        (store.clone(), QuizService::new(store))
    }

    #[tokio::test]
    async fn test_quizzes_decode_typed_answers() {
        let (_, quizzes) = fixture_quizzes();
        let all = quizzes.get_all().await.unwrap();

        assert_eq!(all.len(), 3);
        let lion = quizzes.get_by_id("QUIZ-LION-001").await.unwrap().unwrap();
        assert_eq!(lion.quiz_type(), QuizType::MultipleChoice);
        assert_eq!(lion.answer, QuizAnswer::MultipleChoice(2));
    }

    #[tokio::test]
    async fn test_get_by_animal_id_ignores_case() {
        let (_, quizzes) = fixture_quizzes();

        assert_eq!(quizzes.get_by_animal_id("lion-001").await.unwrap().len(), 2);
        // stored as "Elephant-001"
        assert_eq!(quizzes.get_by_animal_id("elephant-001").await.unwrap().len(), 1);
        assert!(quizzes.get_by_animal_id("penguin-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_ids_skip_the_loader() {
        let (store, quizzes) = fixture_quizzes();
        assert!(quizzes.get_by_id("").await.unwrap().is_none());
        assert!(quizzes.get_by_animal_id(" ").await.unwrap().is_empty());
        assert!(quizzes.validate_answer("", &json!(1)).await.unwrap().is_none());
        assert_eq!(store.stats().requests, 0);
    }

    #[tokio::test]
    async fn test_validate_multiple_choice_answer() {
        let (_, quizzes) = fixture_quizzes();

        let right = quizzes.validate_answer("quiz-lion-001", &json!(2)).await.unwrap().unwrap();
        assert!(right.is_correct);
        assert_eq!(right.correct_answer, QuizAnswer::MultipleChoice(2));
        assert!(right.feedback_en.contains("20 hours"));

        let wrong = quizzes.validate_answer("quiz-lion-001", &json!(0)).await.unwrap().unwrap();
        assert!(!wrong.is_correct);
    }

    #[tokio::test]
    async fn test_validate_true_false_answer() {
        let (_, quizzes) = fixture_quizzes();

        let result = quizzes
            .validate_answer("quiz-elephant-001", &json!("FALSE"))
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.correct_answer, QuizAnswer::TrueFalse(false));
    }

    #[tokio::test]
    async fn test_validate_unknown_quiz_is_none() {
        let (_, quizzes) = fixture_quizzes();
        assert!(quizzes.validate_answer("quiz-none", &json!(true)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_random_samples_without_replacement() {
        let (_, quizzes) = fixture_quizzes();

        assert!(quizzes.get_random(0).await.unwrap().is_empty());
        assert_eq!(quizzes.get_random(2).await.unwrap().len(), 2);

        let all = quizzes.get_random(10).await.unwrap();
        assert_eq!(all.len(), 3);
        let distinct: HashSet<&str> = all.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(distinct.len(), 3);
    }
}
