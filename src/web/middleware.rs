//! Request identity extraction
//!
//! Authentication itself lives in the fronting layer; by the time a
//! request reaches this service the user id has been verified and placed
//! in the `x-user-id` header. This extractor only enforces its presence.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::AppState;
use crate::error::SaucierError;

/// Custom header carrying the authenticated user id.
pub(crate) const X_USER_ID: &str = "x-user-id";

#[derive(Debug, Clone)]
pub(crate) struct RequestUser {
    pub(crate) user_id: String,
}

impl FromRequestParts<AppState> for RequestUser {
    type Rejection = SaucierError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(X_USER_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        async move {
            let user_id = user_id.ok_or(SaucierError::Unauthorized)?;
            Ok(Self { user_id })
        }
    }
}
