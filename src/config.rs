use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";
const MAX_ALLOWED_RETRIES: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub output_dir: String,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub topic_delay_ms: u64,
    pub file_delay_ms: u64,
    pub questions_per_topic: u32,
    pub raw_response_limit: usize,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            gemini_api_key: SecretString::from(env::var("GEMINI_API_KEY").unwrap_or_default()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            gemini_api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
            }),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 3000),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
            max_retries: parsed_or("MAX_RETRIES", 2),
            retry_base_delay_ms: parsed_or("RETRY_BASE_DELAY_MS", 500),
            topic_delay_ms: parsed_or("TOPIC_DELAY_MS", 1000),
            file_delay_ms: parsed_or("FILE_DELAY_MS", 2000),
            questions_per_topic: parsed_or("QUESTIONS_PER_TOPIC", 5),
            raw_response_limit: parsed_or("RAW_RESPONSE_LIMIT", 2000),
        }
    }

    /// Checks the settings a run cannot start without.
    pub fn validate(&self) -> AppResult<()> {
        let key = self.gemini_api_key.expose_secret().trim();

        if key.is_empty() {
            return Err(AppError::ConfigError(
                "GEMINI_API_KEY is required. Set it in the environment or in a .env file."
                    .to_string(),
            ));
        }

        if key == API_KEY_PLACEHOLDER {
            return Err(AppError::ConfigError(
                "GEMINI_API_KEY still holds the placeholder value from .env".to_string(),
            ));
        }

        if self.max_retries > MAX_ALLOWED_RETRIES {
            return Err(AppError::ConfigError(format!(
                "MAX_RETRIES must be at most {} (got {})",
                MAX_ALLOWED_RETRIES, self.max_retries
            )));
        }

        Ok(())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn topic_delay(&self) -> Duration {
        Duration::from_millis(self.topic_delay_ms)
    }

    pub fn file_delay(&self) -> Duration {
        Duration::from_millis(self.file_delay_ms)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gemini_api_key: SecretString::from("test-api-key".to_string()),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: "http://127.0.0.1:9/v1".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 3000,
            output_dir: "output".to_string(),
            max_retries: 2,
            retry_base_delay_ms: 0,
            topic_delay_ms: 0,
            file_delay_ms: 0,
            questions_per_topic: 5,
            raw_response_limit: 2000,
        }
    }
}
