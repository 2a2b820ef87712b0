use std::sync::Arc;

use crate::{
    config::Config,
    models::domain::ExamProfiles,
    services::completion_client::{CompletionClient, OpenAiCompletionClient},
};

#[derive(Clone)]
pub struct AppState {
    pub completion_client: Arc<dyn CompletionClient>,
    pub exam_profiles: Arc<ExamProfiles>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let completion_client = Arc::new(OpenAiCompletionClient::new(&config));
        Self::with_client(config, completion_client)
    }

    pub fn with_client(config: Config, completion_client: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion_client,
            exam_profiles: Arc::new(ExamProfiles::builtin()),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn new_state_loads_builtin_profiles() {
        let state = AppState::new(Config::test_config());

        assert_eq!(state.exam_profiles.len(), 8);
        assert_eq!(state.config.gemini_model, "gemini-test");
    }
}
