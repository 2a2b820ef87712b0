#[cfg(test)]
pub mod fixtures {
    use serde_json::{json, Value};

    /// A multiple-choice question that passes exam validation for `points` in range; option B is correct.
    pub fn valid_question_json(topic: &str, points: u32) -> Value {
        json!({
            "text": format!("Question about {}", topic),
            "type": "multiple_choice",
            "options": [
                {"text": "Option A", "isCorrect": false},
                {"text": "Option B", "isCorrect": true},
                {"text": "Option C", "isCorrect": false},
                {"text": "Option D", "isCorrect": false}
            ],
            "points": points,
            "explanation": format!("Option B is the established answer for {}.", topic)
        })
    }

    /// Wraps a value in the ```json fence the model is asked to reply with.
    pub fn fenced(value: &Value) -> String {
        format!(
            "```json\n{}\n```",
            serde_json::to_string_pretty(value).unwrap()
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::response_parser::parse_json_response;

    #[test]
    fn fenced_fixture_parses_back() {
        let question = valid_question_json("Optics", 2);

        let parsed = parse_json_response(&fenced(&question)).unwrap();

        assert_eq!(parsed, question);
    }
}
