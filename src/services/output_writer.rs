use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    errors::AppResult,
    models::domain::{
        batch_run::BatchSummaryReport,
        generation::QuestionsFile,
        BatchRun, GenerationOutput, ProcessedQuestions, TopicList,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFiles {
    pub questions_file: PathBuf,
    pub test_info_file: PathBuf,
}

/// RFC 3339 timestamp with `:` and `.` replaced so it is safe in file names.
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Serializes run results as pretty JSON under one output directory.
#[derive(Clone, Debug)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        let body = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, body).await?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }

    async fn write_pair(&self, questions_name: &str, info_name: &str, output: &GenerationOutput) -> AppResult<OutputFiles> {
        let questions_file = self
            .write_json(
                questions_name,
                &QuestionsFile {
                    questions: &output.questions,
                    metadata: &output.metadata,
                },
            )
            .await?;
        let test_info_file = self.write_json(info_name, &output.test_info).await?;

        Ok(OutputFiles {
            questions_file,
            test_info_file,
        })
    }

    /// `{EXAM}_{prefix}_questions_{ts}.json` and `{EXAM}_{prefix}_test-info_{ts}.json`.
    pub async fn write_run(
        &self,
        exam_key: &str,
        topics: &TopicList,
        output: &GenerationOutput,
    ) -> AppResult<OutputFiles> {
        let stem = format!("{}_{}", exam_key.to_uppercase(), topics.file_prefix());
        let ts = file_timestamp(output.metadata.processed_at);
        self.write_pair(
            &format!("{}_questions_{}.json", stem, ts),
            &format!("{}_test-info_{}.json", stem, ts),
            output,
        )
        .await
    }

    /// Batch naming: `{stem}_questions.json` and `{stem}_test-info.json`.
    pub async fn write_for_file(&self, stem: &str, output: &GenerationOutput) -> AppResult<OutputFiles> {
        self.write_pair(
            &format!("{}_questions.json", stem),
            &format!("{}_test-info.json", stem),
            output,
        )
        .await
    }

    pub async fn write_processed(&self, processed: &ProcessedQuestions) -> AppResult<OutputFiles> {
        let ts = file_timestamp(processed.test_info.created_at);
        let questions_file = self
            .write_json(
                &format!("processed_questions_{}.json", ts),
                &serde_json::json!({ "questions": processed.questions }),
            )
            .await?;
        let test_info_file = self
            .write_json(&format!("processed_test-info_{}.json", ts), &processed.test_info)
            .await?;

        Ok(OutputFiles {
            questions_file,
            test_info_file,
        })
    }

    pub async fn write_batch_summary(&self, run: &BatchRun) -> AppResult<PathBuf> {
        let name = format!("batch-summary-{}.json", file_timestamp(run.processed_at));
        self.write_json(&name, &BatchSummaryReport::from(run)).await
    }
}
