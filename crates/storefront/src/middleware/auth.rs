//! Authentication extractors.
//!
//! Credentials are the external identity provider's problem. The session
//! either carries a `CurrentUser` (set by the provider's callback flow) or
//! it does not; these extractors read that out for handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Read the signed-in user out of the request's session, if any.
///
/// The session itself lives in the request extensions, put there by the
/// session layer. A missing layer reads the same as a signed-out customer.
async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Extractor for routes that only make sense signed in (order history).
/// Rejects with 401 otherwise.
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).await.map(Self).ok_or(AuthRejection)
    }
}

/// Extractor that never rejects: anonymous customers browse, cart, and
/// size themselves exactly like signed-in ones.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}
