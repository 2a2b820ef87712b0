use std::ops::RangeInclusive;

use crate::{
    constants::exam_profiles::BUILTIN_EXAM_PROFILES,
    errors::{AppError, AppResult},
    models::domain::question::QuestionType,
};

/// Schema constraints a parsed question must satisfy to be accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRules {
    pub accepted_types: Vec<QuestionType>,
    pub multiple_choice_options: RangeInclusive<usize>,
    pub points: RangeInclusive<u32>,
}

impl ValidationRules {
    /// Exam generators: multiple choice only, exactly four options.
    pub fn exam(min_points: u32, max_points: u32) -> Self {
        Self {
            accepted_types: vec![QuestionType::MultipleChoice],
            multiple_choice_options: 4..=4,
            points: min_points..=max_points,
        }
    }

    /// Free-form question processor: every type, 3-4 choices, 1-5 points.
    pub fn generic() -> Self {
        Self {
            accepted_types: vec![
                QuestionType::MultipleChoice,
                QuestionType::TrueFalse,
                QuestionType::ShortAnswer,
                QuestionType::Essay,
            ],
            multiple_choice_options: 3..=4,
            points: 1..=5,
        }
    }

    pub fn required_options(&self, question_type: QuestionType) -> RangeInclusive<usize> {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice_options.clone(),
            QuestionType::TrueFalse => 2..=2,
            QuestionType::ShortAnswer | QuestionType::Essay => 0..=0,
        }
    }

    pub fn accepts_type(&self, question_type: QuestionType) -> bool {
        self.accepted_types.contains(&question_type)
    }
}

/// Static configuration for one target exam.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub difficulty: &'static str,
    pub description: &'static str,
    pub level_directive: &'static str,
    pub focus_areas: &'static [&'static str],
    pub time_per_question: &'static str,
    pub min_points: u32,
    pub max_points: u32,
    pub fallback_title: &'static str,
    /// `{count}` is replaced with the number of topics.
    pub fallback_description: &'static str,
}

impl ExamProfile {
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::exam(self.min_points, self.max_points)
    }

    pub fn points_label(&self) -> String {
        if self.min_points == self.max_points {
            format!("{}", self.min_points)
        } else {
            format!("{}-{}", self.min_points, self.max_points)
        }
    }

    pub fn fallback_description_for(&self, topic_count: usize) -> String {
        self.fallback_description
            .replace("{count}", &topic_count.to_string())
    }
}

/// Read-only registry of exam profiles, built once at startup.
#[derive(Clone, Debug)]
pub struct ExamProfiles {
    profiles: Vec<ExamProfile>,
}

impl ExamProfiles {
    pub fn builtin() -> Self {
        Self::new(BUILTIN_EXAM_PROFILES.to_vec())
    }

    pub fn new(profiles: Vec<ExamProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, key: &str) -> Option<&ExamProfile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    pub fn require(&self, key: &str) -> AppResult<&ExamProfile> {
        self.get(key).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unknown exam type '{}'. Available types: {}",
                key,
                self.keys().join(", ")
            ))
        })
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExamProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
