use actix_web::{get, HttpResponse};
use chrono::Utc;

use crate::models::dto::response::HealthDto;

#[get("/api/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthDto {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
