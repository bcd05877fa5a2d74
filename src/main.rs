//! Legalese Simplifier — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use legalese_simplifier::adapter::build_client_from_config;
use legalese_simplifier::api::{create_router, AppState};
use legalese_simplifier::config::ai::AiConfig;
use legalese_simplifier::lexicon::{
    start_hot_reload_thread, LexiconEngine, LexiconHandle, DEFAULT_LEXICONS_CONFIG_PATH,
    ENV_LEXICONS_CONFIG_PATH,
};
use legalese_simplifier::metrics::Metrics;
use legalese_simplifier::prompt::load_system_prompt;
use legalese_simplifier::ratelimit::SlidingWindowLimiter;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SIMPLIFY_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SIMPLIFY_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("legalese_simplifier=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Keyword lexicons (with dev hot reload) ---
    let engine = LexiconEngine::from_toml().expect("Failed to load lexicon config");
    let lexicon = LexiconHandle::new(engine);
    let path = std::env::var(ENV_LEXICONS_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LEXICONS_CONFIG_PATH));
    start_hot_reload_thread(lexicon.clone(), path);

    // --- Completion client (provider/mock/disabled per config + env) ---
    let ai_cfg = AiConfig::load_or_default("config/ai.json");
    let client = build_client_from_config(&ai_cfg);

    // --- Metrics endpoint ---
    let metrics = Metrics::init();

    let state = AppState {
        lexicon,
        client,
        limiter: Arc::new(SlidingWindowLimiter::from_env()),
        system_prompt: load_system_prompt().into(),
    };

    let router = create_router(state).merge(metrics.router());
    Ok(router.into())
}
