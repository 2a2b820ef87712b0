use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::generation::FailedTopic;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFileResult {
    pub input_file: String,
    pub questions_file: String,
    pub test_info_file: String,
    pub total_topics: usize,
    pub total_questions: usize,
    pub failed_topics: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFileError {
    pub file: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailedTopic {
    pub file: String,
    pub topic: String,
    pub last_error: String,
}

/// Bookkeeping record for a folder run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRun {
    pub processed_at: DateTime<Utc>,
    pub exam_type: String,
    pub total_files: usize,
    pub processed_files: usize,
    pub total_topics: usize,
    pub total_questions: usize,
    pub files: Vec<BatchFileResult>,
    pub errors: Vec<BatchFileError>,
    pub failed_topics: Vec<BatchFailedTopic>,
}

impl BatchRun {
    pub fn new(exam_type: impl Into<String>, total_files: usize) -> Self {
        Self {
            processed_at: Utc::now(),
            exam_type: exam_type.into(),
            total_files,
            processed_files: 0,
            total_topics: 0,
            total_questions: 0,
            files: Vec::new(),
            errors: Vec::new(),
            failed_topics: Vec::new(),
        }
    }

    pub fn record_file(&mut self, result: BatchFileResult, failed: &[FailedTopic]) {
        self.processed_files += 1;
        self.total_topics += result.total_topics;
        self.total_questions += result.total_questions;
        self.failed_topics
            .extend(failed.iter().map(|f| BatchFailedTopic {
                file: result.input_file.clone(),
                topic: f.topic.clone(),
                last_error: f.last_error.clone(),
            }));
        self.files.push(result);
    }

    pub fn record_error(&mut self, file: impl Into<String>, error: impl Into<String>) {
        self.errors.push(BatchFileError {
            file: file.into(),
            error: error.into(),
        });
    }

    pub fn success_rate(&self) -> String {
        if self.total_files == 0 {
            return "0.0%".to_string();
        }
        format!(
            "{:.1}%",
            self.processed_files as f64 / self.total_files as f64 * 100.0
        )
    }
}

/// Summary report written next to the batch outputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummaryReport<'a> {
    pub success_rate: String,
    #[serde(flatten)]
    pub run: &'a BatchRun,
}

impl<'a> From<&'a BatchRun> for BatchSummaryReport<'a> {
    fn from(run: &'a BatchRun) -> Self {
        Self {
            success_rate: run.success_rate(),
            run,
        }
    }
}
