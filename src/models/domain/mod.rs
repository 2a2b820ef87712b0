pub mod batch_run;
pub mod exam_profile;
pub mod generation;
pub mod question;
pub mod topic;
pub use batch_run::BatchRun;
pub use exam_profile::{ExamProfile, ExamProfiles, ValidationRules};
pub use generation::{GenerationOutput, ProcessedQuestions, TestInfo, TitleDescription, TopicResult};
pub use question::{Question, QuestionOption, QuestionType};
pub use topic::TopicList;
