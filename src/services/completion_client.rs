use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(String),

    #[error("completion response contained no text")]
    EmptyResponse,
}

/// Sends one prompt to the generative-language API and returns the raw reply text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Gemini through its OpenAI-compatible chat completions endpoint.
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.gemini_api_base.clone())
            .with_api_key(config.gemini_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.gemini_model.clone(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }
}

fn first_choice_text(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        log::debug!(
            "Sending {} char prompt to model {}",
            prompt.len(),
            self.model
        );

        let response: Value = self
            .client
            .chat()
            .create_byot(self.request_body(prompt))
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        first_choice_text(&response)
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_sends_single_user_message() {
        let client = OpenAiCompletionClient::new(&Config::test_config());

        let body = client.request_body("Generate 2 MCQs");

        assert_eq!(body["model"], "gemini-test");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Generate 2 MCQs");
    }

    #[test]
    fn first_choice_text_extracts_content() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "```json\n[]\n```" } }]
        });

        assert_eq!(first_choice_text(&response), Some("```json\n[]\n```"));
    }

    #[test]
    fn first_choice_text_rejects_empty_or_missing_content() {
        let empty = json!({ "choices": [{ "message": { "content": "  " } }] });
        let missing = json!({ "choices": [] });

        assert_eq!(first_choice_text(&empty), None);
        assert_eq!(first_choice_text(&missing), None);
    }

    #[tokio::test]
    async fn mock_client_returns_scripted_reply() {
        let mut mock = MockCompletionClient::new();
        mock.expect_generate()
            .withf(|prompt: &str| prompt.contains("Photosynthesis"))
            .times(1)
            .returning(|_| Ok("[]".to_string()));

        let reply = mock.generate("Topic: Photosynthesis").await;

        assert_eq!(reply, Ok("[]".to_string()));
    }
}
