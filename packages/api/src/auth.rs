// ABOUTME: Authentication context for API requests
// ABOUTME: Reads the user id resolved by the upstream auth middleware

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::response::ApiResponse;

const USER_ID_HEADER: &str = "x-user-id";

/// Current authenticated user.
///
/// Session validation happens in a reverse proxy / auth middleware outside
/// this service; it forwards the resolved user id in the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty());

        match user_id {
            Some(id) => Ok(Self { id: id.to_string() }),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    "UNAUTHORIZED",
                    "Authentication required",
                )),
            )
                .into_response()),
        }
    }
}
