//! Identity extractor for the upstream auth contract.
//!
//! Authentication itself lives in the collaborating gateway; by the time a
//! request reaches this service the authenticated user's ID has been injected
//! as the `x-user-id` header. Handlers take the [`AuthUser`] extractor to
//! receive it.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use habitloop_core::UserId;

/// Header the upstream gateway sets after authenticating the request.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor providing the authenticated user's ID.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(AuthUser(user_id): AuthUser) -> impl IntoResponse {
///     format!("acting as {user_id}")
/// }
/// ```
pub struct AuthUser(pub UserId);

/// Rejection returned when the identity header is missing or malformed.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthRejection)?;

        let id = raw.parse::<i32>().map_err(|_| AuthRejection)?;
        if id <= 0 {
            return Err(AuthRejection);
        }

        Ok(Self(UserId::new(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<UserId, ()> {
        let mut builder = Request::builder().uri("/api/habits");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let request = builder.body(()).expect("valid request");
        let (mut parts, ()) = request.into_parts();

        AuthUser::from_request_parts(&mut parts, &())
            .await
            .map(|AuthUser(id)| id)
            .map_err(|_| ())
    }

    #[tokio::test]
    async fn extracts_valid_user_id() {
        assert_eq!(extract(Some("42")).await, Ok(UserId::new(42)));
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        assert!(extract(None).await.is_err());
    }

    #[tokio::test]
    async fn rejects_non_numeric_and_non_positive_ids() {
        assert!(extract(Some("abc")).await.is_err());
        assert!(extract(Some("0")).await.is_err());
        assert!(extract(Some("-3")).await.is_err());
    }
}
