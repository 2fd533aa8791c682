use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::web::handlers;

pub const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
                                 Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Largest accepted chat request body.
pub const MAX_BODY_BYTES: usize = 4_500_000;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").wrap(cors_headers()).service(
            web::resource("/chat")
                .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
                .route(web::post().to(handlers::chat))
                .route(web::method(Method::OPTIONS).to(handlers::preflight))
                .default_service(web::to(handlers::method_not_allowed)),
        ),
    )
    .route("/health", web::get().to(handlers::health_check));
}

/// Headers letting any origin call the API, errors included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Credentials", "true"))
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", ALLOW_METHODS))
        .add(("Access-Control-Allow-Headers", ALLOW_HEADERS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::config::UpstreamConfig;
    use crate::proxy::tests::{proxy_with, FakeTransport};
    use crate::proxy::ChatProxy;

    fn assert_cors(headers: &actix_web::http::header::HeaderMap) {
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
        assert_eq!(headers.get("access-control-allow-methods").unwrap(), ALLOW_METHODS);
        assert_eq!(headers.get("access-control-allow-headers").unwrap(), ALLOW_HEADERS);
    }

    macro_rules! app_with {
        ($proxy:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($proxy))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn post_returns_message_and_timestamp() {
        let transport = FakeTransport::completing("Fall semester begins August 25.");
        let app = app_with!(proxy_with(transport));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "message": "When does fall semester begin?" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());
        let body: Value = test::read_body_json(resp).await;
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(body["message"], "Fall semester begins August 25.");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[actix_web::test]
    async fn options_is_empty_success() {
        let transport = FakeTransport::completing("unused");
        let app = app_with!(proxy_with(transport.clone()));

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());
        let body = test::read_body(resp).await;
        assert!(body.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[actix_web::test]
    async fn other_methods_are_rejected() {
        let app = app_with!(proxy_with(FakeTransport::completing("unused")));

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let req = test::TestRequest::default()
                .method(method.clone())
                .uri("/api/chat")
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_cors(resp.headers());
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[actix_web::test]
    async fn missing_message_is_bad_request() {
        let transport = FakeTransport::completing("unused");
        let app = app_with!(proxy_with(transport.clone()));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "history": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_cors(resp.headers());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Message is required");
        assert_eq!(transport.call_count(), 0);
    }

    #[actix_web::test]
    async fn missing_configuration_is_server_error() {
        let transport = FakeTransport::completing("unused");
        let app = app_with!(ChatProxy::new(UpstreamConfig::default(), transport.clone()));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "message": "hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Server configuration error");
        assert_eq!(transport.call_count(), 0);
    }

    #[actix_web::test]
    async fn upstream_failures_never_leak_body() {
        let cases = [
            (401, StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed with AI service"),
            (
                429,
                StatusCode::TOO_MANY_REQUESTS,
                "AI service is busy. Please try again in a moment.",
            ),
            (503, StatusCode::INTERNAL_SERVER_ERROR, "AI service temporarily unavailable"),
            (200, StatusCode::INTERNAL_SERVER_ERROR, "Invalid response from AI service"),
        ];

        for (upstream_status, expected_status, expected_error) in cases {
            let transport =
                FakeTransport::replying(upstream_status, r#"{"leak":"upstream secret detail"}"#);
            let app = app_with!(proxy_with(Arc::clone(&transport)));

            let req = test::TestRequest::post()
                .uri("/api/chat")
                .set_json(json!({ "message": "hi" }))
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), expected_status, "upstream {upstream_status}");
            let raw = test::read_body(resp).await;
            let text = std::str::from_utf8(&raw).unwrap();
            assert!(!text.contains("upstream secret detail"));
            let body: Value = serde_json::from_str(text).unwrap();
            assert_eq!(body["error"], expected_error);
            assert!(body["timestamp"].is_string());
        }
    }

    #[actix_web::test]
    async fn long_message_is_forwarded() {
        let transport = FakeTransport::completing("ok");
        let app = app_with!(proxy_with(transport.clone()));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "message": "x".repeat(300_000) }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(transport.call_count(), 1);
    }

    #[actix_web::test]
    async fn oversized_body_is_json_bad_request() {
        let transport = FakeTransport::completing("unused");
        let app = app_with!(proxy_with(transport.clone()));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "message": "x".repeat(MAX_BODY_BYTES + 1) }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_cors(resp.headers());
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert!(body["timestamp"].is_string());
        assert_eq!(transport.call_count(), 0);
    }

    #[actix_web::test]
    async fn history_entry_mixing_both_shapes_is_rejected() {
        let transport = FakeTransport::completing("unused");
        let app = app_with!(proxy_with(transport.clone()));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({
                "message": "hi",
                "history": [{ "sender": "user", "role": "user", "text": "a", "content": "a" }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "History must be a list of conversation turns");
        assert_eq!(transport.call_count(), 0);
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = app_with!(proxy_with(FakeTransport::completing("unused")));

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
