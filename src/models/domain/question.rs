use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single generated exam question, in the exact wire shape requested from the model.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    pub points: u32,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuestionOption {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "isCorrect", default)]
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Essay => "essay",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "multiple_choice" => Some(QuestionType::MultipleChoice),
            "true_false" => Some(QuestionType::TrueFalse),
            "short_answer" => Some(QuestionType::ShortAnswer),
            "essay" => Some(QuestionType::Essay),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Question {
    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

/// Counts questions per type token, keyed the way the test-info file reports them.
pub fn question_type_summary(questions: &[Question]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for question in questions {
        *counts
            .entry(question.question_type.as_str().to_string())
            .or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuestionOption {
        QuestionOption {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn question_serializes_with_wire_field_names() {
        let question = Question {
            text: "Which gas is released during photosynthesis?".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: vec![
                option("Oxygen", true),
                option("Nitrogen", false),
                option("Methane", false),
                option("Argon", false),
            ],
            points: 2,
            explanation: "Water is split in the light reactions.".to_string(),
        };

        let value = serde_json::to_value(&question).expect("question should serialize");

        assert_eq!(value["type"], "multiple_choice");
        assert_eq!(value["options"][0]["isCorrect"], true);
        assert!(value.get("question_type").is_none());
        assert_eq!(question.correct_option_count(), 1);
    }

    #[test]
    fn question_type_rejects_unknown_token() {
        let parsed = serde_json::from_str::<QuestionType>("\"matching\"");

        assert!(parsed.is_err());
        assert_eq!(QuestionType::from_token("matching"), None);
        assert_eq!(
            QuestionType::from_token("true_false"),
            Some(QuestionType::TrueFalse)
        );
    }

    #[test]
    fn missing_options_default_to_empty() {
        let question: Question = serde_json::from_str(
            r#"{"text":"Discuss federalism.","type":"essay","points":5,"explanation":"Open answer."}"#,
        )
        .expect("essay without options should deserialize");

        assert!(question.options.is_empty());
        assert_eq!(question.question_type, QuestionType::Essay);
    }

    #[test]
    fn type_summary_counts_each_type() {
        let mc = Question {
            text: "q".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: vec![],
            points: 1,
            explanation: "e".to_string(),
        };
        let mut tf = mc.clone();
        tf.question_type = QuestionType::TrueFalse;

        let summary = question_type_summary(&[mc.clone(), mc, tf]);

        assert_eq!(summary.get("multiple_choice"), Some(&2));
        assert_eq!(summary.get("true_false"), Some(&1));
    }
}
