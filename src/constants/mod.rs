pub mod exam_profiles;
pub mod prompts;
