use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

use crate::time;

/// Health check endpoint
///
/// Returns the current status of the API and the application clock's time.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": time::now()
    }))
}
