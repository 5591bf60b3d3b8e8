use axum::extract::FromRequestParts;
use axum::response::Response;
use http::request::Parts;
use plateful_core::UserContext;

use crate::error::unauthenticated_response;

/// Header carrying the caller's user id
///
/// Authentication itself lives in front of this service; by the time a
/// request arrives the identity has been resolved and is forwarded here.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the resolved caller identity
///
/// Rejects with a 401 JSON body when the header is missing or empty.
pub struct Identity(pub UserContext);

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(|id| Self(UserContext::new(id)))
            .ok_or_else(unauthenticated_response)
    }
}
