use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        batch_run::BatchFileResult, generation::FailedTopic, BatchRun, ExamProfile, TopicList,
    },
    services::{
        output_writer::OutputWriter,
        text_extractor::{extract_text, InputKind},
        topic_orchestrator::{ProgressReporter, TopicOrchestrator},
    },
};

/// `.txt`, `.md` and `.pdf` files directly inside `dir`, sorted by name.
pub async fn collect_topic_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        AppError::NotFound(format!("Input folder {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_topic_source = InputKind::from_path(&path).is_some_and(InputKind::is_topic_source);
        if is_topic_source && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs the topic pipeline once per file in a folder and records a [`BatchRun`].
pub struct BatchService<'a> {
    orchestrator: TopicOrchestrator<'a>,
    writer: OutputWriter,
    file_delay: Duration,
}

impl<'a> BatchService<'a> {
    pub fn new(orchestrator: TopicOrchestrator<'a>, writer: OutputWriter, file_delay: Duration) -> Self {
        Self {
            orchestrator,
            writer,
            file_delay,
        }
    }

    async fn process_file(
        &self,
        path: &Path,
        profile: &ExamProfile,
        count: u32,
        reporter: &dyn ProgressReporter,
    ) -> AppResult<(BatchFileResult, Vec<FailedTopic>)> {
        let topics = TopicList::parse(&extract_text(path).await?);
        if topics.is_empty() {
            return Err(AppError::ValidationError(
                "No topics found in file".to_string(),
            ));
        }
        log::info!("{}: {} topics", display_name(path), topics.len());

        let output = self.orchestrator.run(profile, &topics, count, reporter).await;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "topics".to_string());
        let files = self.writer.write_for_file(&stem, &output).await?;

        let result = BatchFileResult {
            input_file: display_name(path),
            questions_file: display_name(&files.questions_file),
            test_info_file: display_name(&files.test_info_file),
            total_topics: topics.len(),
            total_questions: output.total_questions(),
            failed_topics: output.failed_topics().len(),
        };
        Ok((result, output.metadata.failed_topics))
    }

    /// File-level failures are recorded and the batch moves on.
    pub async fn run(
        &self,
        input_dir: &Path,
        profile: &ExamProfile,
        count: u32,
        reporter: &dyn ProgressReporter,
    ) -> AppResult<(BatchRun, PathBuf)> {
        let files = collect_topic_files(input_dir).await?;
        if files.is_empty() {
            return Err(AppError::ValidationError(format!(
                "No .txt, .md or .pdf files found in {}",
                input_dir.display()
            )));
        }
        log::info!("Batch of {} files for {}", files.len(), profile.name);

        let mut run = BatchRun::new(profile.name, files.len());
        for (idx, path) in files.iter().enumerate() {
            if idx > 0 && !self.file_delay.is_zero() {
                tokio::time::sleep(self.file_delay).await;
            }
            log::info!("[file {}/{}] {}", idx + 1, files.len(), display_name(path));

            match self.process_file(path, profile, count, reporter).await {
                Ok((result, failed)) => run.record_file(result, &failed),
                Err(e) => {
                    log::error!("Skipping {}: {}", display_name(path), e);
                    run.record_error(display_name(path), e.to_string());
                }
            }
        }

        let summary = self.writer.write_batch_summary(&run).await?;
        log::info!(
            "Batch finished: {}/{} files, {} questions, success rate {}",
            run.processed_files,
            run.total_files,
            run.total_questions,
            run.success_rate()
        );
        Ok((run, summary))
    }
}
