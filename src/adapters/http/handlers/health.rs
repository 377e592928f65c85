use actix_web::HttpResponse;

use crate::adapters::http::dtos::{ApiResponse, HealthResponse};

/// GET /api/health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(ApiResponse::data(HealthResponse {
    status: "ok",
    version: env!("CARGO_PKG_VERSION"),
  }))
}
