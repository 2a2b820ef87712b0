pub mod generation_handler;
pub mod health_handler;

pub use generation_handler::{generate_questions, get_exam_types, process_questions};
pub use health_handler::health_check;
