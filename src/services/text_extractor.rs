use std::path::Path;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Markdown,
    Json,
    Pdf,
}

impl InputKind {
    /// Case-insensitive match on the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(InputKind::Text),
            "md" => Some(InputKind::Markdown),
            "json" => Some(InputKind::Json),
            "pdf" => Some(InputKind::Pdf),
            _ => None,
        }
    }

    /// Kinds accepted as topic files in batch mode.
    pub fn is_topic_source(self) -> bool {
        !matches!(self, InputKind::Json)
    }
}

/// Reads a supported input file as text; PDFs go through `pdf-extract` on the blocking pool.
pub async fn extract_text(path: &Path) -> AppResult<String> {
    let kind = InputKind::from_path(path).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Unsupported file type: {}. Supported: .txt, .md, .json, .pdf",
            path.display()
        ))
    })?;

    match kind {
        InputKind::Pdf => {
            let bytes = tokio::fs::read(path).await?;
            let name = path.display().to_string();
            let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?
                .map_err(|e| AppError::ExtractionError(format!("{}: {}", name, e)))?;
            log::debug!("Extracted {} chars from {}", text.len(), path.display());
            Ok(text)
        }
        InputKind::Text | InputKind::Markdown | InputKind::Json => {
            Ok(tokio::fs::read_to_string(path).await?)
        }
    }
}
