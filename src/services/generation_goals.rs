use serde_json::Value;

use crate::{
    models::domain::{
        exam_profile::{ExamProfile, ValidationRules},
        question::{Question, QuestionType},
        TitleDescription, TopicList,
    },
    services::{
        prompt_builder::{
            build_processor_prompt, build_processor_title_prompt, build_question_prompt,
            build_title_prompt,
        },
        question_validator::{filter_valid, json_kind},
        retry_controller::GenerationGoal,
    },
};

fn schema_text<T: schemars::JsonSchema>() -> Option<String> {
    serde_json::to_string_pretty(&schemars::schema_for!(T)).ok()
}

/// Asks for an array of questions and keeps the elements that pass `rules`.
pub struct QuestionGoal {
    label: String,
    prompt: String,
    task: String,
    rules: ValidationRules,
    requested: Option<u32>,
}

impl QuestionGoal {
    pub fn for_topic(profile: &ExamProfile, topic: &str, count: u32) -> Self {
        Self {
            label: format!("topic \"{}\"", topic),
            prompt: build_question_prompt(profile, topic, count),
            task: format!(
                "Generate {} {} multiple choice questions on the topic \"{}\".",
                count, profile.name, topic
            ),
            rules: profile.validation_rules(),
            requested: Some(count),
        }
    }

    /// Restructures free-form input questions under the generic rule set.
    pub fn for_processing(questions_text: &str) -> Self {
        Self {
            label: "question set".to_string(),
            prompt: build_processor_prompt(questions_text),
            task: "Convert the input questions into the structured question format, one element per input question.".to_string(),
            rules: ValidationRules::generic(),
            requested: None,
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }
}

impl GenerationGoal for QuestionGoal {
    type Output = Vec<Question>;

    fn label(&self) -> String {
        self.label.clone()
    }

    fn requested_count(&self) -> Option<u32> {
        self.requested
    }

    fn initial_prompt(&self) -> String {
        self.prompt.clone()
    }

    fn task_summary(&self) -> String {
        self.task.clone()
    }

    fn format_checklist(&self) -> Vec<String> {
        let types = self
            .rules
            .accepted_types
            .iter()
            .map(|t| format!("\"{}\"", t.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let choices = &self.rules.multiple_choice_options;
        let choice_count = if choices.start() == choices.end() {
            format!("exactly {}", choices.start())
        } else {
            format!("{} to {}", choices.start(), choices.end())
        };

        let mut lines = vec![
            "The block contains a JSON array starting with [ even when there is only one question.".to_string(),
            "Every element is an object with exactly the keys \"text\", \"type\", \"options\", \"points\", \"explanation\".".to_string(),
            format!("\"type\" is one of: {}.", types),
            format!(
                "multiple_choice questions have {} options, each {{\"text\": string, \"isCorrect\": boolean}}.",
                choice_count
            ),
        ];
        if self.rules.accepts_type(QuestionType::TrueFalse) {
            lines.push("true_false questions have exactly 2 options; short_answer and essay have \"options\": [].".to_string());
        }
        lines.push("Exactly ONE option per question has \"isCorrect\": true.".to_string());
        lines.push(format!(
            "\"points\" is an integer from {} to {}.",
            self.rules.points.start(),
            self.rules.points.end()
        ));
        lines.push("\"text\" and \"explanation\" are non-empty strings.".to_string());
        lines
    }

    fn json_schema(&self) -> Option<String> {
        schema_text::<Vec<Question>>()
    }

    fn accept(&self, parsed: Value) -> Result<Vec<Question>, String> {
        let items = match parsed {
            Value::Array(items) => items,
            other => {
                return Err(format!(
                    "Expected a JSON array of questions but found {}",
                    json_kind(&other)
                ))
            }
        };
        if items.is_empty() {
            return Err("The JSON array contained no questions".to_string());
        }

        let report = filter_valid(&items, &self.rules);
        if report.accepted.is_empty() {
            return Err(format!(
                "None of the {} questions passed validation: {}",
                items.len(),
                report.summary()
            ));
        }
        if !report.rejected.is_empty() {
            log::warn!(
                "Dropped {} of {} questions for {}: {}",
                report.rejected.len(),
                items.len(),
                self.label,
                report.summary()
            );
        }
        Ok(report.accepted)
    }
}

/// Asks for a `{title, description}` object; callers fall back on exhaustion.
pub struct TitleGoal {
    prompt: String,
    task: String,
    fallback: TitleDescription,
}

impl TitleGoal {
    pub fn for_exam(profile: &ExamProfile, topics: &TopicList) -> Self {
        Self {
            prompt: build_title_prompt(profile, topics),
            task: format!(
                "Write a title and description for a {} practice test covering: {}.",
                profile.name,
                topics.joined(", ")
            ),
            fallback: TitleDescription {
                title: profile.fallback_title.to_string(),
                description: profile.fallback_description_for(topics.len()),
            },
        }
    }

    pub fn for_questions(questions: &[Question]) -> Self {
        let texts: Vec<String> = questions.iter().map(|q| q.text.clone()).collect();
        Self {
            prompt: build_processor_title_prompt(&texts),
            task: "Write a catchy title and a concise, informative description for the given questions.".to_string(),
            fallback: TitleDescription {
                title: crate::constants::prompts::GENERIC_FALLBACK_TITLE.to_string(),
                description: crate::constants::prompts::GENERIC_FALLBACK_DESCRIPTION.to_string(),
            },
        }
    }

    pub fn fallback(&self) -> &TitleDescription {
        &self.fallback
    }
}

impl GenerationGoal for TitleGoal {
    type Output = TitleDescription;

    fn label(&self) -> String {
        "title and description".to_string()
    }

    fn initial_prompt(&self) -> String {
        self.prompt.clone()
    }

    fn task_summary(&self) -> String {
        self.task.clone()
    }

    fn format_checklist(&self) -> Vec<String> {
        vec![
            "The block contains ONE JSON object, not an array.".to_string(),
            "The object has exactly the keys \"title\" and \"description\".".to_string(),
            "Both values are non-empty strings.".to_string(),
        ]
    }

    fn json_schema(&self) -> Option<String> {
        schema_text::<TitleDescription>()
    }

    fn accept(&self, parsed: Value) -> Result<TitleDescription, String> {
        let object = parsed.as_object().ok_or_else(|| {
            format!(
                "Expected a JSON object with \"title\" and \"description\" but found {}",
                json_kind(&parsed)
            )
        })?;

        let field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("\"{}\" must be a non-empty string", key))
        };

        Ok(TitleDescription {
            title: field("title")?,
            description: field("description")?,
        })
    }
}
