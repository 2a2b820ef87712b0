use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct TitleDescription {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Succeeded,
    Exhausted,
}

/// Outcome of one topic: its validated questions, possibly empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResult {
    pub topic: String,
    pub status: TopicStatus,
    pub questions: Vec<Question>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl TopicResult {
    pub fn is_exhausted(&self) -> bool {
        self.status == TopicStatus::Exhausted
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTopic {
    pub topic: String,
    pub last_error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsMetadata {
    pub run_id: String,
    pub total_questions: usize,
    pub topics: Vec<String>,
    pub questions_per_topic: u32,
    pub exam_type: String,
    pub difficulty: String,
    pub processed_at: DateTime<Utc>,
    pub failed_topics: Vec<FailedTopic>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestInfo {
    pub title: String,
    pub description: String,
    pub total_questions: usize,
    pub topics: Vec<String>,
    pub exam_type: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
    pub question_types: BTreeMap<String, usize>,
}

/// Aggregate produced by one orchestrated run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub questions: Vec<Question>,
    pub metadata: QuestionsMetadata,
    pub test_info: TestInfo,
    #[serde(skip)]
    pub topic_results: Vec<TopicResult>,
}

impl GenerationOutput {
    pub fn failed_topics(&self) -> &[FailedTopic] {
        &self.metadata.failed_topics
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

/// On-disk layout of the questions file.
#[derive(Debug, Serialize)]
pub struct QuestionsFile<'a> {
    pub questions: &'a [Question],
    pub metadata: &'a QuestionsMetadata,
}

/// Free-form questions restructured into the question schema.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedQuestions {
    pub questions: Vec<Question>,
    pub test_info: TestInfo,
}
