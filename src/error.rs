//! Error taxonomy for the service.
//!
//! Parse degradation is *not* an error: the extractor always recovers locally
//! and reflects the tier in `parse_confidence`. Only validation, rate-limit,
//! and provider failures produce outward error signals.

use shuttle_axum::axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Rejections raised before the pipeline runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text is blank")]
    Blank,
    #[error("text too short: {chars} chars (minimum {min})")]
    TooShort { chars: usize, min: usize },
    #[error("text too long: {chars} chars (maximum {max})")]
    TooLong { chars: usize, max: usize },
}

/// Failures of the external completion call. Fatal for the request; the
/// serving path never retries.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("completion provider is disabled")]
    Disabled,
    #[error("missing API key for provider '{0}'")]
    MissingApiKey(String),
    #[error("provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("provider reply had no choices")]
    EmptyChoices,
}

/// Everything the `/simplify` handler can surface to a caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("rate limit exceeded; try again later")]
    RateLimited,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Provider(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
