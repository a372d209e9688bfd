//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info, warn};

/// Error definitions for the saucier application.
///
/// Provider and parser failures carry detail for the logs only; callers
/// always get a generic message for the category, never the raw provider
/// error.
#[derive(Debug)]
pub enum SaucierError {
    /// When you didn't do the right thing
    BadRequest,
    /// Missing or invalid user identity
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// The user's effective generation limit has been reached
    QuotaExceeded,
    /// The text reply contained no JSON-shaped payload at all
    InvalidPayload,
    /// The payload was found but could not be decoded into a recipe
    MalformedPayload(String),
    /// The text provider signalled rate limiting
    RateLimited,
    /// The configured model was rejected by the text provider
    ProviderConfig(String),
    /// The text provider could not be reached
    ProviderConnection(String),
    /// The text provider call succeeded but returned no content blocks
    EmptyReply,
    /// When DB operations fail
    DatabaseError(sea_orm::DbErr),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<sea_orm::DbErr> for SaucierError {
    fn from(err: sea_orm::DbErr) -> Self {
        SaucierError::DatabaseError(err)
    }
}

impl From<std::io::Error> for SaucierError {
    fn from(err: std::io::Error) -> Self {
        SaucierError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for SaucierError {
    fn from(err: axum::http::Error) -> Self {
        SaucierError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for SaucierError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            SaucierError::BadRequest => {
                info!("Bad request received");
                (StatusCode::BAD_REQUEST, "Invalid request data")
            }
            SaucierError::Unauthorized => {
                info!("Unauthorized request received");
                (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: missing or invalid user identity.",
                )
            }
            SaucierError::NotFound(what) => {
                info!("404 {what}");
                (StatusCode::NOT_FOUND, "Recipe not found")
            }
            SaucierError::QuotaExceeded => (
                StatusCode::FORBIDDEN,
                "Recipe generation limit reached",
            ),
            SaucierError::InvalidPayload => {
                warn!("Text reply contained no JSON payload");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to parse AI response. The service may be experiencing issues. Please try again.",
                )
            }
            SaucierError::MalformedPayload(detail) => {
                warn!("Text reply payload could not be decoded: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process AI response. Please try again with different settings.",
                )
            }
            SaucierError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit reached. Please wait a moment before generating another recipe.",
            ),
            SaucierError::ProviderConfig(detail) => {
                error!("Text provider rejected the configured model: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI service is temporarily unavailable. Please try again.",
                )
            }
            SaucierError::ProviderConnection(detail) => {
                error!("Text provider unreachable: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI service is temporarily unavailable. Please check your connection and try again.",
                )
            }
            SaucierError::EmptyReply => {
                warn!("Text provider returned an empty reply");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI service returned an empty response. Please try again.",
                )
            }
            SaucierError::DatabaseError(err) => {
                error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            SaucierError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
