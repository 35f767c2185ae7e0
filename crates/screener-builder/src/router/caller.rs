use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::CallerId;
use crate::error::AppError;

/// Header carrying the authenticated user id, set by the gateway in front of
/// the service.
pub const CALLER_HEADER: &str = "x-caller-id";

/// The caller every owner-scoped route acts on behalf of.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::Unauthenticated)?;
        Ok(Caller(CallerId::new(value)))
    }
}
