use serde_json::Value;
use thiserror::Error;

use crate::models::domain::{
    exam_profile::ValidationRules,
    question::{Question, QuestionType},
};

/// Why a parsed element was dropped. The text is fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("item is not a JSON object")]
    NotAnObject,

    #[error("\"text\" must be a non-empty string")]
    MissingText,

    #[error("\"type\" must be one of: {expected}")]
    WrongType { expected: String },

    #[error("\"options\" must be an array of {expected} objects (found {found})")]
    WrongOptionCount { expected: String, found: String },

    #[error("exactly one option must have \"isCorrect\": true (found {0})")]
    CorrectAnswerCount(usize),

    #[error("\"explanation\" must be a non-empty string")]
    MissingExplanation,

    #[error("\"points\" must be an integer between {min} and {max}")]
    PointsOutOfRange { min: u32, max: u32 },

    #[error("item does not match the question schema: {0}")]
    Schema(String),
}

fn non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn integral_points(value: Option<&Value>) -> Option<u64> {
    let number = value?;
    if let Some(n) = number.as_u64() {
        return Some(n);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0)
        .map(|f| f as u64)
}

/// Checks one parsed element against `rules` and returns it as a typed [`Question`].
pub fn validate_question(item: &Value, rules: &ValidationRules) -> Result<Question, Rejection> {
    let object = item.as_object().ok_or(Rejection::NotAnObject)?;

    if !non_empty_str(object.get("text")) {
        return Err(Rejection::MissingText);
    }

    let expected_types = || {
        rules
            .accepted_types
            .iter()
            .map(QuestionType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let question_type = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_token)
        .filter(|t| rules.accepts_type(*t))
        .ok_or_else(|| Rejection::WrongType {
            expected: expected_types(),
        })?;

    let required = rules.required_options(question_type);
    let describe_required = || {
        if required.start() == required.end() {
            required.start().to_string()
        } else {
            format!("{}-{}", required.start(), required.end())
        }
    };
    let options: &[Value] = match object.get("options") {
        Some(Value::Array(options)) => options,
        None | Some(Value::Null) if *required.start() == 0 => &[],
        Some(other) => {
            return Err(Rejection::WrongOptionCount {
                expected: describe_required(),
                found: format!("{} instead of an array", json_kind(other)),
            })
        }
        None => {
            return Err(Rejection::WrongOptionCount {
                expected: describe_required(),
                found: "no options".to_string(),
            })
        }
    };

    if !required.contains(&options.len()) {
        return Err(Rejection::WrongOptionCount {
            expected: describe_required(),
            found: options.len().to_string(),
        });
    }

    if !options.is_empty() {
        let correct = options
            .iter()
            .filter(|o| o.get("isCorrect") == Some(&Value::Bool(true)))
            .count();
        if correct != 1 {
            return Err(Rejection::CorrectAnswerCount(correct));
        }
    }

    if !non_empty_str(object.get("explanation")) {
        return Err(Rejection::MissingExplanation);
    }

    let in_range = integral_points(object.get("points"))
        .and_then(|p| u32::try_from(p).ok())
        .is_some_and(|p| rules.points.contains(&p));
    if !in_range {
        return Err(Rejection::PointsOutOfRange {
            min: *rules.points.start(),
            max: *rules.points.end(),
        });
    }

    let mut normalized = item.clone();
    if let Some(points) = integral_points(object.get("points")) {
        normalized["points"] = Value::from(points);
    }
    serde_json::from_value(normalized).map_err(|e| Rejection::Schema(e.to_string()))
}

pub fn is_valid_question(item: &Value, rules: &ValidationRules) -> bool {
    validate_question(item, rules).is_ok()
}

/// Result of filtering a parsed array: accepted questions in order plus per-item rejections.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub accepted: Vec<Question>,
    pub rejected: Vec<(usize, Rejection)>,
}

impl ValidationReport {
    pub fn summary(&self) -> String {
        self.rejected
            .iter()
            .map(|(idx, reason)| format!("item {}: {}", idx + 1, reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn filter_valid(items: &[Value], rules: &ValidationRules) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (idx, item) in items.iter().enumerate() {
        match validate_question(item, rules) {
            Ok(question) => report.accepted.push(question),
            Err(reason) => {
                log::debug!("Dropping item {}: {}", idx + 1, reason);
                report.rejected.push((idx, reason));
            }
        }
    }
    report
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
