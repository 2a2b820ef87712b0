use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::TopicList,
};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequestDto {
    #[validate(length(min = 1, max = 64))]
    pub exam_type: String,

    #[validate(range(min = 1, max = 50))]
    pub question_count: u32,

    /// Raw topic lines; parsed with the same rules as a topic file.
    #[validate(length(min = 1, max = 200))]
    pub topics: Vec<String>,

    #[serde(default)]
    pub output_folder: Option<String>,
}

impl GenerateQuestionsRequestDto {
    pub fn topic_list(&self) -> AppResult<TopicList> {
        let topics = TopicList::from_lines(&self.topics);
        if topics.is_empty() {
            return Err(AppError::ValidationError(
                "At least one topic is required".to_string(),
            ));
        }
        Ok(topics)
    }

    /// Sub-folder of the output directory; letters, digits, `_` and `-` only.
    pub fn output_folder(&self) -> AppResult<Option<&str>> {
        match self.output_folder.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(folder)
                if folder
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
            {
                Ok(Some(folder))
            }
            Some(folder) => Err(AppError::ValidationError(format!(
                "Invalid output folder '{}': use letters, digits, '_' or '-'",
                folder
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessQuestionsRequestDto {
    #[validate(length(min = 1, max = 100000))]
    pub questions_text: String,
}
