use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{
        generation::{FailedTopic, QuestionsMetadata},
        ExamProfile, GenerationOutput, Question, TestInfo,
    },
    services::{output_writer::OutputFiles, topic_orchestrator::ProgressEvent},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamTypeDto {
    pub key: String,
    pub name: String,
    pub difficulty: String,
    pub description: String,
    pub points_range: String,
}

impl From<&ExamProfile> for ExamTypeDto {
    fn from(profile: &ExamProfile) -> Self {
        Self {
            key: profile.key.to_string(),
            name: profile.name.to_string(),
            difficulty: profile.difficulty.to_string(),
            description: profile.description.to_string(),
            points_range: profile.points_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResultDto {
    pub questions: Vec<Question>,
    pub metadata: QuestionsMetadata,
    pub test_info: TestInfo,
    pub failed_topics: Vec<FailedTopic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<OutputFiles>,
}

impl GenerationResultDto {
    pub fn new(output: GenerationOutput, files: Option<OutputFiles>) -> Self {
        Self {
            failed_topics: output.metadata.failed_topics.clone(),
            questions: output.questions,
            metadata: output.metadata,
            test_info: output.test_info,
            files,
        }
    }
}

/// One NDJSON line of the generation stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Progress(ProgressEvent),
    Complete { result: Box<GenerationResultDto> },
    Error { message: String },
}

impl StreamMessage {
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("{}\n", json),
            Err(e) => format!(
                "{{\"type\":\"error\",\"message\":\"serialization failed: {}\"}}\n",
                e.to_string().replace('"', "'")
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}
