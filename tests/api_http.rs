// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /simplify (success, validation, rate limit, provider failure)

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value as Json};
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use legalese_simplifier::adapter::{CompletionReply, DisabledClient, MockClient};
use legalese_simplifier::api::{create_router, AppState};
use legalese_simplifier::lexicon::{LexiconEngine, LexiconHandle};
use legalese_simplifier::ratelimit::{AllowAll, RateLimit, SlidingWindowLimiter};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn state_with(client: Arc<dyn legalese_simplifier::adapter::CompletionClient>, limiter: Arc<dyn RateLimit>) -> AppState {
    AppState {
        lexicon: LexiconHandle::new(LexiconEngine::from_toml().expect("lexicons")),
        client,
        limiter,
        system_prompt: "test prompt".into(),
    }
}

fn router_with_mock(category: &str, plain: &str) -> Router {
    let client = MockClient::new(CompletionReply::ToolCall {
        arguments: json!({ "category": category, "plain_english": plain }).to_string(),
    });
    create_router(state_with(Arc::new(client), Arc::new(AllowAll)))
}

fn post_simplify(text: &str) -> Request<Body> {
    let payload = json!({ "text": text });
    Request::builder()
        .method("POST")
        .uri("/simplify")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /simplify")
}

async fn json_body(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn health_returns_200_and_ok_status() {
    let app = router_with_mock("Other", "n/a");
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["status"], json!("ok"));
}

#[tokio::test]
async fn simplify_returns_the_full_contract() {
    let app = router_with_mock("Contract", "You must cover the other side's losses.");
    let resp = app
        .oneshot(post_simplify(
            "The party of the first part shall indemnify the party of the second part.",
        ))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["category"], json!("Contract"));
    assert_eq!(v["response"], json!("You must cover the other side's losses."));
    assert_eq!(v["confidence"], json!("high"));
    assert_eq!(v["word_count"], json!(14));
    assert_eq!(v["parse_confidence"], json!("high"));
}

#[tokio::test]
async fn short_non_legal_text_is_echoed_from_the_fast_path() {
    // DisabledClient would 503 if the model were called.
    let app = create_router(state_with(Arc::new(DisabledClient), Arc::new(AllowAll)));
    let resp = app
        .oneshot(post_simplify("I love long movies."))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["category"], json!("Other"));
    assert_eq!(v["response"], json!("I love long movies."));
    assert_eq!(v["confidence"], json!("medium"));
}

#[tokio::test]
async fn too_short_text_is_rejected_before_the_pipeline() {
    let app = router_with_mock("Other", "n/a");
    let resp = app
        .oneshot(post_simplify("short"))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = json_body(resp).await;
    assert!(v["error"].as_str().unwrap_or_default().contains("too short"));
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let app = router_with_mock("Other", "n/a");
    let resp = app
        .oneshot(post_simplify("   \t  "))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn over_long_text_is_rejected() {
    let app = router_with_mock("Other", "n/a");
    let long = "lease ".repeat(400); // 2400 chars
    let resp = app
        .oneshot(post_simplify(&long))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn provider_failure_maps_to_service_unavailable() {
    let app = create_router(state_with(Arc::new(DisabledClient), Arc::new(AllowAll)));
    let resp = app
        .oneshot(post_simplify(
            "The lessee shall pay rent to the lessor monthly.",
        ))
        .await
        .expect("oneshot /simplify");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn second_request_over_the_limit_gets_429() {
    let limiter = Arc::new(SlidingWindowLimiter::new(1, Duration::from_secs(60)));
    let client = MockClient::new(CompletionReply::ToolCall {
        arguments: json!({ "category": "Contract", "plain_english": "Pay up." }).to_string(),
    });
    let app = create_router(state_with(Arc::new(client), limiter));

    let first = app
        .clone()
        .oneshot(post_simplify("The lessee shall pay rent monthly."))
        .await
        .expect("first request");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(post_simplify("The lessee shall pay rent monthly."))
        .await
        .expect("second request");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn forwarded_clients_are_limited_independently() {
    let limiter = Arc::new(SlidingWindowLimiter::new(1, Duration::from_secs(60)));
    let client = MockClient::new(CompletionReply::ToolCall {
        arguments: json!({ "category": "Contract", "plain_english": "Pay up." }).to_string(),
    });
    let app = create_router(state_with(Arc::new(client), limiter));

    let with_ip = |ip: &str| {
        Request::builder()
            .method("POST")
            .uri("/simplify")
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(
                json!({ "text": "The lessee shall pay rent monthly." }).to_string(),
            ))
            .expect("build request")
    };

    let a = app.clone().oneshot(with_ip("1.1.1.1")).await.expect("a");
    assert_eq!(a.status(), StatusCode::OK);
    let b = app.clone().oneshot(with_ip("2.2.2.2")).await.expect("b");
    assert_eq!(b.status(), StatusCode::OK);
    let a2 = app.oneshot(with_ip("1.1.1.1")).await.expect("a2");
    assert_eq!(a2.status(), StatusCode::TOO_MANY_REQUESTS);
}
