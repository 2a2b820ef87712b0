pub mod batch_service;
pub mod completion_client;
pub mod generation_goals;
pub mod output_writer;
pub mod prompt_builder;
pub mod question_processor;
pub mod question_validator;
pub mod response_parser;
pub mod retry_controller;
pub mod text_extractor;
pub mod topic_orchestrator;
