use actix_web::error::PayloadError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::warn;
use serde_json::json;

use crate::error::ChatError;
use crate::proxy::ChatProxy;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint. The body is taken raw, and body read failures are caught
// here, so oversized or malformed requests get the same error shape as every
// other failure.
pub async fn chat(
    proxy: web::Data<ChatProxy>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, ChatError> {
    let body = body.map_err(unreadable_body)?;
    let response = proxy.handle(&body).await?;
    Ok(HttpResponse::Ok().json(response))
}

fn unreadable_body(e: actix_web::Error) -> ChatError {
    warn!("Could not read chat request body: {}", e);
    match e.as_error::<PayloadError>() {
        Some(PayloadError::Overflow) => ChatError::InvalidInput("Message is too long"),
        _ => ChatError::InvalidInput("Request body could not be read"),
    }
}

// CORS preflight
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ChatError> {
    warn!("{} {} not allowed", req.method(), req.path());
    Err(ChatError::MethodNotAllowed(req.method().to_string()))
}
