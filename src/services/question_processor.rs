use std::path::Path;

use chrono::Utc;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{question::question_type_summary, ProcessedQuestions, TestInfo},
    services::{
        completion_client::CompletionClient,
        generation_goals::{QuestionGoal, TitleGoal},
        retry_controller::{GoalOutcome, RetryController, RetryPolicy},
        text_extractor::{extract_text, InputKind},
    },
};

fn question_line(item: &Value) -> Option<String> {
    let line = match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("question")
            .or_else(|| map.get("text"))
            .and_then(Value::as_str),
        _ => None,
    };
    line.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Flattens `[...]` or `{"questions": [...]}` of strings or `{question|text}` objects into numbered lines.
pub fn flatten_json_questions(value: &Value) -> AppResult<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("questions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AppError::ValidationError(
                    "JSON input must be an array or an object with a \"questions\" array".to_string(),
                )
            })?,
        _ => {
            return Err(AppError::ValidationError(
                "JSON input must be an array or an object with a \"questions\" array".to_string(),
            ))
        }
    };

    let lines: Vec<String> = items
        .iter()
        .filter_map(question_line)
        .enumerate()
        .map(|(idx, line)| format!("{}. {}", idx + 1, line))
        .collect();
    if lines.is_empty() {
        return Err(AppError::ValidationError(
            "JSON input contains no questions".to_string(),
        ));
    }
    Ok(lines.join("\n"))
}

pub async fn questions_text_from_file(path: &Path) -> AppResult<String> {
    let text = extract_text(path).await?;
    if InputKind::from_path(path) == Some(InputKind::Json) {
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| AppError::ValidationError(format!("Invalid JSON input: {}", e)))?;
        return flatten_json_questions(&value);
    }
    Ok(text)
}

/// Restructures free-form questions into the question schema under the generic rules.
pub struct QuestionProcessor<'a> {
    client: &'a dyn CompletionClient,
    policy: RetryPolicy,
}

impl<'a> QuestionProcessor<'a> {
    pub fn new(client: &'a dyn CompletionClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn process(&self, questions_text: &str) -> AppResult<ProcessedQuestions> {
        if questions_text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "No questions provided".to_string(),
            ));
        }

        let controller = RetryController::new(self.client, self.policy.clone());

        let questions = match controller.run(&QuestionGoal::for_processing(questions_text)).await {
            GoalOutcome::Success { value, .. } => value,
            GoalOutcome::Exhausted { attempt } => {
                return Err(AppError::ValidationError(format!(
                    "No valid questions could be produced after {} attempts: {}",
                    attempt.attempt_number,
                    attempt
                        .last_error
                        .map(|e| e.to_string())
                        .unwrap_or_default()
                )))
            }
        };

        let title_goal = TitleGoal::for_questions(&questions);
        let title = controller
            .run(&title_goal)
            .await
            .value()
            .unwrap_or_else(|| title_goal.fallback().clone());

        log::info!("Processed {} questions: \"{}\"", questions.len(), title.title);

        let test_info = TestInfo {
            title: title.title,
            description: title.description,
            total_questions: questions.len(),
            topics: Vec::new(),
            exam_type: "General".to_string(),
            difficulty: "Mixed".to_string(),
            created_at: Utc::now(),
            question_types: question_type_summary(&questions),
        };

        Ok(ProcessedQuestions {
            questions,
            test_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::completion_client::MockCompletionClient, test_utils::fixtures::fenced,
    };
    use serde_json::json;
    use std::time::Duration;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(1)
            .with_base_delay(Duration::ZERO)
    }

    #[test]
    fn flattens_mixed_json_inputs() {
        let value = json!({
            "questions": ["What is pH?", {"question": "Define molarity."}, {"text": " "}, 7]
        });

        assert_eq!(
            flatten_json_questions(&value).unwrap(),
            "1. What is pH?\n2. Define molarity."
        );
    }

    #[test]
    fn rejects_json_without_questions() {
        assert!(flatten_json_questions(&json!({"items": []})).is_err());
        assert!(flatten_json_questions(&json!([1, 2])).is_err());
        assert!(flatten_json_questions(&json!("text")).is_err());
    }

    #[tokio::test]
    async fn processes_mixed_question_types() {
        let mut client = MockCompletionClient::new();
        client.expect_generate().returning(|prompt: &str| {
            if prompt.contains("catchy title") {
                Ok(fenced(&json!({"title": "Chemistry Basics", "description": "Two questions"})))
            } else {
                Ok(fenced(&json!([
                    {
                        "text": "Pure water has a pH of 7 at 25 C.",
                        "type": "true_false",
                        "options": [{"text": "True", "isCorrect": true}, {"text": "False", "isCorrect": false}],
                        "points": 1,
                        "explanation": "Neutral water at 25 C has pH 7."
                    },
                    {
                        "text": "Explain Le Chatelier's principle.",
                        "type": "essay",
                        "options": [],
                        "points": 5,
                        "explanation": "A system at equilibrium counteracts imposed changes."
                    }
                ])))
            }
        });

        let processed = QuestionProcessor::new(&client, policy())
            .process("1. Is pure water neutral?\n2. Explain Le Chatelier.")
            .await
            .unwrap();

        assert_eq!(processed.questions.len(), 2);
        assert_eq!(processed.test_info.title, "Chemistry Basics");
        assert_eq!(processed.test_info.question_types.get("essay"), Some(&1));
    }

    #[tokio::test]
    async fn exhausted_processing_is_validation_error() {
        let mut client = MockCompletionClient::new();
        client
            .expect_generate()
            .times(2)
            .returning(|_| Ok("no json here".to_string()));

        let err = QuestionProcessor::new(&client, policy())
            .process("1. What is pH?")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(err.to_string().contains("after 2 attempts"));
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_calls() {
        let client = MockCompletionClient::new();

        let err = QuestionProcessor::new(&client, policy())
            .process("   ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
