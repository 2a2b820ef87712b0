use std::time::Duration;

use chrono::Utc;
use futures::channel::mpsc::UnboundedSender;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::Config,
    models::domain::{
        exam_profile::ExamProfile,
        generation::{FailedTopic, QuestionsMetadata, TopicStatus},
        question::question_type_summary,
        GenerationOutput, TestInfo, TitleDescription, TopicList, TopicResult,
    },
    services::{
        completion_client::CompletionClient,
        generation_goals::{QuestionGoal, TitleGoal},
        retry_controller::{GoalOutcome, RetryController, RetryPolicy},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    TopicStarted,
    TopicCompleted,
    TopicExhausted,
    TitleStarted,
    TitleCompleted,
    Finished,
}

/// Structured progress signal emitted while a run is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// 1-based; equals `total_topics` for the title and finish phases.
    pub topic_index: usize,
    pub total_topics: usize,
    pub phase: ProgressPhase,
    pub detail: String,
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Writes progress to the log; used by the CLI.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, event: ProgressEvent) {
        match event.phase {
            ProgressPhase::TopicExhausted => log::warn!(
                "[{}/{}] {}",
                event.topic_index,
                event.total_topics,
                event.detail
            ),
            _ => log::info!(
                "[{}/{}] {}",
                event.topic_index,
                event.total_topics,
                event.detail
            ),
        }
    }
}

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events into an unbounded channel, e.g. an HTTP response stream.
pub struct ChannelReporter {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelReporter {
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        if self.sender.unbounded_send(event).is_err() {
            log::debug!("Progress receiver dropped; event discarded");
        }
    }
}

/// Runs topics one at a time through the retry controller, then the title goal.
pub struct TopicOrchestrator<'a> {
    client: &'a dyn CompletionClient,
    policy: RetryPolicy,
    topic_delay: Duration,
}

impl<'a> TopicOrchestrator<'a> {
    pub fn new(client: &'a dyn CompletionClient, policy: RetryPolicy, topic_delay: Duration) -> Self {
        Self {
            client,
            policy,
            topic_delay,
        }
    }

    pub fn from_config(client: &'a dyn CompletionClient, config: &Config) -> Self {
        Self::new(client, RetryPolicy::from_config(config), config.topic_delay())
    }

    fn controller(&self) -> RetryController<'_> {
        RetryController::new(self.client, self.policy.clone())
    }

    pub async fn generate_topic(&self, profile: &ExamProfile, topic: &str, count: u32) -> TopicResult {
        let goal = QuestionGoal::for_topic(profile, topic, count);
        match self.controller().run(&goal).await {
            GoalOutcome::Success { value, attempt } => TopicResult {
                topic: topic.to_string(),
                status: TopicStatus::Succeeded,
                questions: value,
                attempts: attempt.attempt_number,
                last_error: None,
            },
            GoalOutcome::Exhausted { attempt } => TopicResult {
                topic: topic.to_string(),
                status: TopicStatus::Exhausted,
                questions: Vec::new(),
                attempts: attempt.attempt_number,
                last_error: attempt.last_error.map(|e| e.to_string()),
            },
        }
    }

    /// Always yields a populated pair; the goal's fallback covers exhaustion.
    pub async fn generate_title(&self, goal: &TitleGoal) -> (TitleDescription, bool) {
        match self.controller().run(goal).await {
            GoalOutcome::Success { value, .. } => (value, false),
            GoalOutcome::Exhausted { .. } => {
                log::warn!("Using fallback title: {}", goal.fallback().title);
                (goal.fallback().clone(), true)
            }
        }
    }

    pub async fn run(
        &self,
        profile: &ExamProfile,
        topics: &TopicList,
        count: u32,
        reporter: &dyn ProgressReporter,
    ) -> GenerationOutput {
        let total = topics.len();
        let mut topic_results = Vec::with_capacity(total);

        log::info!(
            "Generating {} questions per topic for {} topics ({})",
            count,
            total,
            profile.name
        );

        for (idx, topic) in topics.iter().enumerate() {
            if idx > 0 && !self.topic_delay.is_zero() {
                tokio::time::sleep(self.topic_delay).await;
            }

            reporter.report(ProgressEvent {
                topic_index: idx + 1,
                total_topics: total,
                phase: ProgressPhase::TopicStarted,
                detail: format!("Generating {} questions for \"{}\"", count, topic),
            });

            let result = self.generate_topic(profile, topic, count).await;

            let (phase, detail) = if result.is_exhausted() {
                (
                    ProgressPhase::TopicExhausted,
                    format!(
                        "No questions for \"{}\" after {} attempts: {}",
                        topic,
                        result.attempts,
                        result.last_error.as_deref().unwrap_or("unknown error")
                    ),
                )
            } else {
                (
                    ProgressPhase::TopicCompleted,
                    format!(
                        "Generated {} questions for \"{}\"",
                        result.questions.len(),
                        topic
                    ),
                )
            };
            reporter.report(ProgressEvent {
                topic_index: idx + 1,
                total_topics: total,
                phase,
                detail,
            });

            topic_results.push(result);
        }

        reporter.report(ProgressEvent {
            topic_index: total,
            total_topics: total,
            phase: ProgressPhase::TitleStarted,
            detail: "Generating test title and description".to_string(),
        });
        let (title, used_fallback) = self
            .generate_title(&TitleGoal::for_exam(profile, topics))
            .await;
        reporter.report(ProgressEvent {
            topic_index: total,
            total_topics: total,
            phase: ProgressPhase::TitleCompleted,
            detail: if used_fallback {
                format!("Using default title \"{}\"", title.title)
            } else {
                format!("Title: \"{}\"", title.title)
            },
        });

        let output = assemble_output(profile, topics, count, title, topic_results);

        reporter.report(ProgressEvent {
            topic_index: total,
            total_topics: total,
            phase: ProgressPhase::Finished,
            detail: format!(
                "Generated {} questions; {} of {} topics failed",
                output.total_questions(),
                output.failed_topics().len(),
                total
            ),
        });
        output
    }
}

fn assemble_output(
    profile: &ExamProfile,
    topics: &TopicList,
    count: u32,
    title: TitleDescription,
    topic_results: Vec<TopicResult>,
) -> GenerationOutput {
    let now = Utc::now();
    let questions: Vec<_> = topic_results
        .iter()
        .flat_map(|r| r.questions.iter().cloned())
        .collect();
    let failed_topics: Vec<_> = topic_results
        .iter()
        .filter(|r| r.is_exhausted())
        .map(|r| FailedTopic {
            topic: r.topic.clone(),
            last_error: r.last_error.clone().unwrap_or_default(),
        })
        .collect();

    let metadata = QuestionsMetadata {
        run_id: Uuid::new_v4().to_string(),
        total_questions: questions.len(),
        topics: topics.as_slice().to_vec(),
        questions_per_topic: count,
        exam_type: profile.name.to_string(),
        difficulty: profile.difficulty.to_string(),
        processed_at: now,
        failed_topics,
    };
    let test_info = TestInfo {
        title: title.title,
        description: title.description,
        total_questions: questions.len(),
        topics: topics.as_slice().to_vec(),
        exam_type: profile.name.to_string(),
        difficulty: profile.difficulty.to_string(),
        created_at: now,
        question_types: question_type_summary(&questions),
    };

    GenerationOutput {
        questions,
        metadata,
        test_info,
        topic_results,
    }
}
