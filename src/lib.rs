// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod adapter;
pub mod api;
pub mod category;
pub mod config;
pub mod corrector;
pub mod error;
pub mod extract;
pub mod gate;
pub mod lexicon;
pub mod metrics;
pub mod paraphrase;
pub mod pipeline;
pub mod prompt;
pub mod ratelimit;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::category::Category;
pub use crate::error::{ProviderError, ServiceError, ValidationError};
pub use crate::extract::ParseConfidence;
pub use crate::pipeline::SimplifyResponse;
