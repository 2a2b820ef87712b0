use std::path::PathBuf;

use actix_web::{get, post, web, HttpResponse};
use futures::{
    channel::{mpsc, oneshot},
    stream, StreamExt,
};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{GenerateQuestionsRequestDto, ProcessQuestionsRequestDto},
        response::{ExamTypeDto, GenerationResultDto, StreamMessage},
    },
    services::{
        output_writer::OutputWriter,
        question_processor::QuestionProcessor,
        retry_controller::RetryPolicy,
        topic_orchestrator::{ChannelReporter, TopicOrchestrator},
    },
};

#[get("/api/exam-types")]
pub async fn get_exam_types(state: web::Data<AppState>) -> HttpResponse {
    let exam_types: Vec<ExamTypeDto> = state.exam_profiles.iter().map(ExamTypeDto::from).collect();
    HttpResponse::Ok().json(exam_types)
}

/// Streams NDJSON progress lines, then one `complete` or `error` line.
#[post("/api/generate-questions")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let profile = state.exam_profiles.require(&request.exam_type)?.clone();
    let topics = request.topic_list()?;
    let output_dir = match request.output_folder()? {
        Some(folder) => PathBuf::from(&state.config.output_dir).join(folder),
        None => PathBuf::from(&state.config.output_dir),
    };
    let count = request.question_count;

    log::info!(
        "Streaming generation: {} topics x {} questions for {}",
        topics.len(),
        count,
        profile.key
    );

    let (progress_tx, progress_rx) = mpsc::unbounded();
    let (result_tx, result_rx) = oneshot::channel::<StreamMessage>();
    let client = state.completion_client.clone();
    let config = state.config.clone();

    actix_web::rt::spawn(async move {
        let reporter = ChannelReporter::new(progress_tx);
        let output = TopicOrchestrator::from_config(client.as_ref(), &config)
            .run(&profile, &topics, count, &reporter)
            .await;
        drop(reporter);

        let message = match OutputWriter::new(output_dir)
            .write_run(profile.key, &topics, &output)
            .await
        {
            Ok(files) => StreamMessage::Complete {
                result: Box::new(GenerationResultDto::new(output, Some(files))),
            },
            Err(e) => {
                log::error!("Failed to write generation output: {}", e);
                StreamMessage::Error {
                    message: e.to_string(),
                }
            }
        };
        if result_tx.send(message).is_err() {
            log::warn!("Client went away before the generation result was sent");
        }
    });

    let final_message = stream::once(async move {
        result_rx.await.unwrap_or_else(|_| StreamMessage::Error {
            message: "Generation task ended unexpectedly".to_string(),
        })
    });
    let body = progress_rx
        .map(StreamMessage::Progress)
        .chain(final_message)
        .map(|message| Ok::<_, actix_web::Error>(web::Bytes::from(message.to_line())));

    Ok(HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body))
}

#[post("/api/process-questions")]
pub async fn process_questions(
    state: web::Data<AppState>,
    request: web::Json<ProcessQuestionsRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let processed = QuestionProcessor::new(
        state.completion_client.as_ref(),
        RetryPolicy::from_config(&state.config),
    )
    .process(&request.questions_text)
    .await?;

    Ok(HttpResponse::Ok().json(processed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        services::completion_client::MockCompletionClient,
        test_utils::{
            fixtures::{fenced, valid_question_json},
            test_helpers::{assert_error_status, assert_success_status},
        },
    };
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn state_with(client: MockCompletionClient, output_dir: &std::path::Path) -> AppState {
        let config = Config {
            output_dir: output_dir.to_string_lossy().into_owned(),
            ..Config::test_config()
        };
        AppState::with_client(config, Arc::new(client))
    }

    #[actix_web::test]
    async fn exam_types_lists_every_profile() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(MockCompletionClient::new(), dir.path())))
                .service(get_exam_types),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/exam-types").to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.len(), 8);
        assert_eq!(body[0]["key"], "jkpsc");
        assert_eq!(body[0]["pointsRange"], "2-4");
    }

    #[actix_web::test]
    async fn generate_rejects_unknown_exam_before_streaming() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(MockCompletionClient::new(), dir.path())))
                .service(generate_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate-questions")
            .set_json(json!({"examType": "gre", "questionCount": 2, "topics": ["Algebra"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn generate_rejects_out_of_range_count() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(MockCompletionClient::new(), dir.path())))
                .service(generate_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate-questions")
            .set_json(json!({"examType": "neet", "questionCount": 0, "topics": ["Optics"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn generate_streams_progress_then_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = MockCompletionClient::new();
        client.expect_generate().returning(|prompt: &str| {
            if prompt.contains("title and description") {
                Ok(fenced(&json!({"title": "Optics Drill", "description": "Light"})))
            } else {
                Ok(fenced(&json!([valid_question_json("Optics", 3)])))
            }
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(client, dir.path())))
                .service(generate_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate-questions")
            .set_json(json!({
                "examType": "neet",
                "questionCount": 1,
                "topics": ["Optics"],
                "outputFolder": "run1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());
        let body = test::read_body(resp).await;

        let lines: Vec<Value> = std::str::from_utf8(&body)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["type"], "progress");
        assert_eq!(lines[0]["phase"], "topic_started");
        let last = lines.last().unwrap();
        assert_eq!(last["type"], "complete");
        assert_eq!(last["result"]["questions"].as_array().unwrap().len(), 1);
        assert_eq!(last["result"]["testInfo"]["title"], "Optics Drill");
        assert_eq!(std::fs::read_dir(dir.path().join("run1")).unwrap().count(), 2);
    }

    #[actix_web::test]
    async fn process_returns_structured_questions() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = MockCompletionClient::new();
        client.expect_generate().returning(|prompt: &str| {
            if prompt.contains("catchy title") {
                Ok(fenced(&json!({"title": "Quick Quiz", "description": "One question"})))
            } else {
                Ok(fenced(&json!([valid_question_json("pH", 1)])))
            }
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(client, dir.path())))
                .service(process_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/process-questions")
            .set_json(json!({"questionsText": "1. What is pH?"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["questions"][0]["text"], "Question about pH");
        assert_eq!(body["testInfo"]["title"], "Quick Quiz");
    }
}
