use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::AppState;

const SERVICE_NAME: &str = "recommendation-service";

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Recommendations service is working"
    }))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVICE_NAME
    }))
}

/// 503 until every in-process catalog has been loaded
#[get("/ready")]
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    if state.service.is_ready() {
        HttpResponse::Ok().json(json!({
            "status": "ready",
            "service": SERVICE_NAME
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({
            "status": "loading",
            "service": SERVICE_NAME
        }))
    }
}
