//! HTTP surface: router, handlers, CORS, and request-level concerns
//! (rate limiting, validation, anonymized request logging).

use std::sync::Arc;

use metrics::counter;
use shuttle_axum::axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::adapter::DynCompletionClient;
use crate::error::ServiceError;
use crate::lexicon::LexiconHandle;
use crate::pipeline::{self, SimplifyResponse};
use crate::ratelimit::RateLimit;
use crate::validate::LegalText;

pub const ENV_FRONTEND_ORIGIN: &str = "FRONTEND_ORIGIN";

#[derive(Clone)]
pub struct AppState {
    pub lexicon: LexiconHandle,
    pub client: DynCompletionClient,
    pub limiter: Arc<dyn RateLimit>,
    pub system_prompt: Arc<str>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/simplify", post(simplify))
        .layer(cors_layer())
        .with_state(state)
}

/// Browser access: localhost dev frontend plus an optional deployed origin.
fn cors_layer() -> CorsLayer {
    let mut origins: Vec<HeaderValue> = vec!["http://localhost:3000"
        .parse()
        .expect("static origin parses")];
    if let Ok(extra) = std::env::var(ENV_FRONTEND_ORIGIN) {
        match extra.parse() {
            Ok(origin) => origins.push(origin),
            Err(_) => warn!(origin = %extra, "ignoring unparseable FRONTEND_ORIGIN"),
        }
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(serde::Deserialize)]
struct SimplifyReq {
    text: String,
}

async fn simplify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SimplifyReq>,
) -> Result<Json<SimplifyResponse>, ServiceError> {
    counter!("simplify_requests_total").increment(1);

    let key = client_key(&headers);
    if !state.limiter.allow(&key) {
        counter!("simplify_rate_limited_total").increment(1);
        return Err(ServiceError::RateLimited);
    }

    let text = LegalText::parse(&body.text)?;

    // Never log raw text; only a hashed id plus coarse shape.
    let id = anon_hash(text.as_str());
    info!(%id, words = text.word_count(), "simplify request");

    let resp = pipeline::simplify(
        &text,
        &state.lexicon,
        state.client.as_ref(),
        &state.system_prompt,
    )
    .await?;

    info!(%id, category = %resp.category, parse = resp.parse_confidence.as_str(), "simplify done");
    Ok(Json(resp))
}

/// Client key for rate limiting: first x-forwarded-for hop, else a shared
/// anonymous bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Short stable id for log correlation without retaining request text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
