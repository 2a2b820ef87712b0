use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use examgen_server::{
    app_state::AppState,
    config::Config,
    handlers::{generate_questions, get_exam_types, health_check, process_questions},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let state = AppState::new(config);

    log::info!("Starting HTTP server on http://{}:{}", host, port);
    log::info!(
        "Model {} with up to {} retries per topic; {} exam types loaded",
        state.config.gemini_model,
        state.config.max_retries,
        state.exam_profiles.len()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(health_check)
            .service(get_exam_types)
            .service(generate_questions)
            .service(process_questions)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
