//! Bounded retry loop that turns unreliable model replies into validated output.
//!
//! One [`GenerationAttempt`] is driven through
//! `InitialAttempt -> {ParseFailed | ValidateEmpty | ApiError} -> Retrying -> ... -> (Success | Exhausted)`.
//! Parse and validation failures are answered with a correction prompt that
//! quotes the previous reply and the exact error, getting stricter on each
//! retry. API failures resend the pending prompt, re-escalated if it was a
//! correction. Every
//! retry waits `retry * base_delay` first.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::{
    config::Config,
    constants::prompts::FENCED_ONLY_RULE,
    services::{
        completion_client::{CompletionClient, CompletionError},
        response_parser::{parse_json_response, ParseError},
    },
};

/// Something the controller can ask the model for and check the reply against.
pub trait GenerationGoal: Send + Sync {
    type Output;

    /// Short label for logs and correction prompts, e.g. `topic "Kinetics"`.
    fn label(&self) -> String;

    fn requested_count(&self) -> Option<u32> {
        None
    }

    fn initial_prompt(&self) -> String;

    /// One-paragraph restatement of the task for correction prompts.
    fn task_summary(&self) -> String;

    /// Shape-specific checklist lines for correction prompts.
    fn format_checklist(&self) -> Vec<String>;

    /// Pretty JSON Schema of the expected payload, added once retries escalate.
    fn json_schema(&self) -> Option<String> {
        None
    }

    /// Turns a parsed value into output; `Err` carries why nothing usable was found.
    fn accept(&self, parsed: Value) -> Result<Self::Output, String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("API error: {0}")]
    Api(CompletionError),

    #[error("{0}")]
    Parse(ParseError),

    #[error("{0}")]
    ValidationEmpty(String),
}

impl AttemptFailure {
    fn state(&self) -> AttemptState {
        match self {
            AttemptFailure::Api(_) => AttemptState::ApiError,
            AttemptFailure::Parse(_) => AttemptState::ParseFailed,
            AttemptFailure::ValidationEmpty(_) => AttemptState::ValidateEmpty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    InitialAttempt,
    ParseFailed,
    ValidateEmpty,
    ApiError,
    Retrying,
    Success,
    Exhausted,
}

/// Working record for one unit of work, discarded once it settles.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub label: String,
    pub requested_count: Option<u32>,
    /// Completion calls made so far.
    pub attempt_number: u32,
    pub last_raw_response: Option<String>,
    pub last_error: Option<AttemptFailure>,
    pub transitions: Vec<AttemptState>,
}

impl GenerationAttempt {
    fn new(label: String, requested_count: Option<u32>) -> Self {
        Self {
            label,
            requested_count,
            attempt_number: 0,
            last_raw_response: None,
            last_error: None,
            transitions: vec![AttemptState::InitialAttempt],
        }
    }

    fn enter(&mut self, state: AttemptState) {
        self.transitions.push(state);
    }

    pub fn retries_used(&self) -> u32 {
        self.attempt_number.saturating_sub(1)
    }
}

#[derive(Debug)]
pub enum GoalOutcome<T> {
    Success { value: T, attempt: GenerationAttempt },
    Exhausted { attempt: GenerationAttempt },
}

impl<T> GoalOutcome<T> {
    pub fn attempt(&self) -> &GenerationAttempt {
        match self {
            GoalOutcome::Success { attempt, .. } | GoalOutcome::Exhausted { attempt } => attempt,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            GoalOutcome::Success { value, .. } => Some(value),
            GoalOutcome::Exhausted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial call.
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Max chars of the previous reply quoted in a correction prompt.
    pub raw_response_limit: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            raw_response_limit: 2000,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
            raw_response_limit: config.raw_response_limit,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Linear backoff before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }
}

pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}\n... [truncated]", &text[..cut]),
        None => text.to_string(),
    }
}

/// Correction prompt for retry number `retry` of `max_retries`.
pub fn build_correction_prompt<G: GenerationGoal + ?Sized>(
    goal: &G,
    failure: &AttemptFailure,
    previous_response: &str,
    retry: u32,
    policy: &RetryPolicy,
) -> String {
    let label = goal.label();
    let headline = match failure {
        AttemptFailure::ValidationEmpty(_) => format!(
            "Your previous response for {} was syntactically valid JSON, but it contained nothing that satisfies the required structure.",
            label
        ),
        _ => format!(
            "Your previous response for {} could not be parsed as the required JSON.",
            label
        ),
    };

    let mut checklist = goal.format_checklist();
    checklist.push("Use double quotes for all keys and strings. No trailing commas, no comments.".to_string());
    checklist.push(FENCED_ONLY_RULE.to_string());

    let mut sections = vec![
        headline,
        format!("Error: {}", failure),
        format!(
            "Previous response:\n```\n{}\n```",
            truncate_chars(previous_response, policy.raw_response_limit)
        ),
        format!("Task: {}", goal.task_summary()),
        format!(
            "Formatting checklist:\n{}",
            checklist
                .iter()
                .enumerate()
                .map(|(i, line)| format!("{}. {}", i + 1, line))
                .collect::<Vec<_>>()
                .join("\n")
        ),
    ];

    if retry >= 2 {
        if let Some(schema) = goal.json_schema() {
            sections.push(format!(
                "The JSON inside the fence must validate against this JSON Schema:\n{}",
                schema
            ));
        }
    }

    if retry >= policy.max_retries {
        sections.push(format!(
            "This is the FINAL attempt ({} of {}). Any text outside the ```json fence, or any deviation from the checklist, will cause the response to be discarded.",
            retry, policy.max_retries
        ));
    } else if retry >= 2 {
        sections.push(format!(
            "STRICT MODE (retry {} of {}): the previous corrections were not followed. Follow every checklist item exactly.",
            retry, policy.max_retries
        ));
    }

    sections.join("\n\n")
}

/// Drives one goal to success or exhaustion against a completion client.
pub struct RetryController<'a> {
    client: &'a dyn CompletionClient,
    policy: RetryPolicy,
}

impl<'a> RetryController<'a> {
    pub fn new(client: &'a dyn CompletionClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run<G: GenerationGoal>(&self, goal: &G) -> GoalOutcome<G::Output> {
        let mut attempt = GenerationAttempt::new(goal.label(), goal.requested_count());
        let mut prompt = goal.initial_prompt();
        let mut correction_cause: Option<AttemptFailure> = None;

        loop {
            attempt.attempt_number += 1;

            let failure = match self.client.generate(&prompt).await {
                Err(e) => AttemptFailure::Api(e),
                Ok(raw) => {
                    log::debug!(
                        "Raw response for {} (attempt {}): {}",
                        attempt.label,
                        attempt.attempt_number,
                        truncate_chars(&raw, 500)
                    );
                    let accepted = parse_json_response(&raw)
                        .map_err(AttemptFailure::Parse)
                        .and_then(|parsed| {
                            goal.accept(parsed).map_err(AttemptFailure::ValidationEmpty)
                        });
                    attempt.last_raw_response = Some(raw);

                    match accepted {
                        Ok(value) => {
                            attempt.enter(AttemptState::Success);
                            log::info!(
                                "Generated {} after {} attempt(s)",
                                attempt.label,
                                attempt.attempt_number
                            );
                            return GoalOutcome::Success { value, attempt };
                        }
                        Err(failure) => failure,
                    }
                }
            };

            attempt.enter(failure.state());
            log::warn!(
                "Attempt {} for {} failed: {}",
                attempt.attempt_number,
                attempt.label,
                failure
            );

            if attempt.retries_used() >= self.policy.max_retries {
                attempt.last_error = Some(failure);
                attempt.enter(AttemptState::Exhausted);
                log::error!(
                    "Max retries ({}) exceeded for {}. Giving up.",
                    self.policy.max_retries,
                    attempt.label
                );
                return GoalOutcome::Exhausted { attempt };
            }

            let retry = attempt.retries_used() + 1;
            if !matches!(failure, AttemptFailure::Api(_)) {
                correction_cause = Some(failure.clone());
            }
            // Until a reply has been rejected the initial prompt is resent as-is;
            // afterwards the correction is rebuilt at the current escalation level.
            if let (Some(cause), Some(previous)) =
                (correction_cause.as_ref(), attempt.last_raw_response.as_deref())
            {
                prompt = build_correction_prompt(goal, cause, previous, retry, &self.policy);
            }
            attempt.last_error = Some(failure);
            attempt.enter(AttemptState::Retrying);

            let delay = self.policy.backoff(retry);
            log::info!(
                "Retrying {} (retry {}/{}) in {:?}",
                attempt.label,
                retry,
                self.policy.max_retries,
                delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion_client::MockCompletionClient;
    use mockall::Sequence;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    struct EchoGoal;

    impl GenerationGoal for EchoGoal {
        type Output = Value;

        fn label(&self) -> String {
            "echo".to_string()
        }

        fn initial_prompt(&self) -> String {
            "initial".to_string()
        }

        fn task_summary(&self) -> String {
            "Return an object with key ok.".to_string()
        }

        fn format_checklist(&self) -> Vec<String> {
            vec!["The block contains one JSON object with key \"ok\".".to_string()]
        }

        fn json_schema(&self) -> Option<String> {
            Some("{\"type\":\"object\"}".to_string())
        }

        fn accept(&self, parsed: Value) -> Result<Value, String> {
            if parsed.get("ok").is_some() {
                Ok(parsed)
            } else {
                Err("missing key ok".to_string())
            }
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn success_on_first_call_needs_no_retry() {
        let mut client = MockCompletionClient::new();
        client
            .expect_generate()
            .withf(|p: &str| p == "initial")
            .times(1)
            .returning(|_| Ok("```json\n{\"ok\": 1}\n```".to_string()));

        let outcome = RetryController::new(&client, policy(2)).run(&EchoGoal).await;

        assert_eq!(outcome.attempt().attempt_number, 1);
        assert_eq!(
            outcome.attempt().transitions,
            vec![AttemptState::InitialAttempt, AttemptState::Success]
        );
        assert_eq!(outcome.value(), Some(json!({"ok": 1})));
    }

    #[tokio::test]
    async fn parse_failure_then_success_walks_the_states() {
        let mut client = MockCompletionClient::new();
        let mut seq = Sequence::new();
        client
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Sure! Here you go.".to_string()));
        client
            .expect_generate()
            .withf(|p: &str| {
                p.contains("Sure! Here you go.")
                    && p.contains("No JSON code block or valid JSON structure found in response")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("{\"ok\": true}".to_string()));

        let outcome = RetryController::new(&client, policy(2)).run(&EchoGoal).await;

        assert_eq!(
            outcome.attempt().transitions,
            vec![
                AttemptState::InitialAttempt,
                AttemptState::ParseFailed,
                AttemptState::Retrying,
                AttemptState::Success
            ]
        );
        assert!(outcome.value().is_some());
    }

    #[tokio::test]
    async fn api_error_resends_the_unanswered_prompt() {
        let mut client = MockCompletionClient::new();
        let mut seq = Sequence::new();
        client
            .expect_generate()
            .withf(|p: &str| p == "initial")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CompletionError::Request("quota exceeded".to_string())));
        client
            .expect_generate()
            .withf(|p: &str| p == "initial")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("{\"ok\": 2}".to_string()));

        let outcome = RetryController::new(&client, policy(1)).run(&EchoGoal).await;

        assert_eq!(outcome.attempt().transitions[1], AttemptState::ApiError);
        assert_eq!(outcome.value(), Some(json!({"ok": 2})));
    }

    #[tokio::test]
    async fn api_error_after_correction_rebuilds_it_at_final_level() {
        let mut client = MockCompletionClient::new();
        let mut seq = Sequence::new();
        client
            .expect_generate()
            .withf(|p: &str| p == "initial")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("not json".to_string()));
        client
            .expect_generate()
            .withf(|p: &str| p.contains("not json") && !p.contains("FINAL attempt"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CompletionError::Request("502 Bad Gateway".to_string())));
        client
            .expect_generate()
            .withf(|p: &str| {
                p.contains("not json")
                    && p.contains("FINAL attempt (2 of 2)")
                    && p.contains("Error: No JSON code block")
                    && p.contains("JSON Schema")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("{\"ok\": 3}".to_string()));

        let outcome = RetryController::new(&client, policy(2)).run(&EchoGoal).await;

        assert_eq!(
            outcome.attempt().transitions,
            vec![
                AttemptState::InitialAttempt,
                AttemptState::ParseFailed,
                AttemptState::Retrying,
                AttemptState::ApiError,
                AttemptState::Retrying,
                AttemptState::Success
            ]
        );
        assert_eq!(outcome.value(), Some(json!({"ok": 3})));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_wait_linearly_growing_delays() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let mut client = MockCompletionClient::new();
        client.expect_generate().times(3).returning(move |_| {
            recorded.lock().unwrap().push(Instant::now());
            Ok("still no json".to_string())
        });
        let policy = RetryPolicy::default()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(500));

        let outcome = RetryController::new(&client, policy).run(&EchoGoal).await;

        assert!(outcome.value().is_none());
        let calls = calls.lock().unwrap();
        assert_eq!(calls[1] - calls[0], Duration::from_millis(500));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_does_not_wait_after_the_last_call() {
        let mut client = MockCompletionClient::new();
        client
            .expect_generate()
            .times(2)
            .returning(|_| Ok("still no json".to_string()));
        let policy = RetryPolicy::default()
            .with_max_retries(1)
            .with_base_delay(Duration::from_secs(2));
        let started = Instant::now();

        RetryController::new(&client, policy).run(&EchoGoal).await;

        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn exhaustion_keeps_last_error_and_raw_response() {
        let mut client = MockCompletionClient::new();
        client
            .expect_generate()
            .times(3)
            .returning(|_| Ok("{\"nope\": 1}".to_string()));

        let outcome = RetryController::new(&client, policy(2)).run(&EchoGoal).await;

        let attempt = outcome.attempt();
        assert_eq!(attempt.attempt_number, 3);
        assert_eq!(
            attempt.last_error,
            Some(AttemptFailure::ValidationEmpty("missing key ok".to_string()))
        );
        assert_eq!(attempt.last_raw_response.as_deref(), Some("{\"nope\": 1}"));
        assert_eq!(attempt.transitions.last(), Some(&AttemptState::Exhausted));
        assert!(matches!(outcome, GoalOutcome::Exhausted { .. }));
    }

    #[tokio::test]
    async fn zero_retries_means_single_call() {
        let mut client = MockCompletionClient::new();
        client
            .expect_generate()
            .times(1)
            .returning(|_| Err(CompletionError::EmptyResponse));

        let outcome = RetryController::new(&client, policy(0)).run(&EchoGoal).await;

        assert!(outcome.value().is_none());
    }

    #[test]
    fn correction_prompt_escalates_with_retry_number() {
        let policy = policy(3);
        let failure = AttemptFailure::Parse(ParseError::NoStructure);

        let first = build_correction_prompt(&EchoGoal, &failure, "raw text", 1, &policy);
        let second = build_correction_prompt(&EchoGoal, &failure, "raw text", 2, &policy);
        let last = build_correction_prompt(&EchoGoal, &failure, "raw text", 3, &policy);

        assert!(first.contains("```\nraw text\n```"));
        assert!(first.contains("Error: No JSON code block"));
        assert!(first.contains(FENCED_ONLY_RULE));
        assert!(!first.contains("STRICT MODE"));
        assert!(!first.contains("JSON Schema"));
        assert!(second.contains("STRICT MODE (retry 2 of 3)"));
        assert!(second.contains("JSON Schema"));
        assert!(last.contains("FINAL attempt (3 of 3)"));
    }

    #[test]
    fn correction_prompt_names_validation_failures() {
        let failure = AttemptFailure::ValidationEmpty("item 1: bad points".to_string());

        let prompt = build_correction_prompt(&EchoGoal, &failure, "{}", 1, &policy(2));

        assert!(prompt.contains("syntactically valid JSON"));
        assert!(prompt.contains("Error: item 1: bad points"));
    }

    #[test]
    fn correction_prompt_truncates_long_responses() {
        let policy = RetryPolicy {
            raw_response_limit: 10,
            ..policy(2)
        };
        let raw = "x".repeat(50);
        let failure = AttemptFailure::Parse(ParseError::NoStructure);

        let prompt = build_correction_prompt(&EchoGoal, &failure, &raw, 1, &policy);

        assert!(prompt.contains(&format!("{}\n... [truncated]", "x".repeat(10))));
        assert!(!prompt.contains(&"x".repeat(11)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ऊर्जा", 2), "ऊर\n... [truncated]");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1500));
    }
}
