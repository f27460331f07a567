use crate::error::ApiFailure;
use crate::{blocking, AppState};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use records::error::RecordsError;
use records_api::models::user::User;

pub const TOKEN_REQUIRED: &str = "Access token required";

/// The user behind the `Authorization: Bearer <token>` header of the request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| RecordsError::Unauthorized(TOKEN_REQUIRED.to_string()))?
            .to_string();
        let auth = state.auth.clone();
        let lookup = token.clone();
        let user = blocking(move || auth.authenticate(&lookup)).await?;
        Ok(CurrentUser { user, token })
    }
}
