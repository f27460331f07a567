use crate::error::ApiFailure;
use crate::extract::CurrentUser;
use crate::{blocking, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use records_api::models::auth::{
    AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest,
    UpdateProfileRequest,
};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiFailure> {
    let Json(request) = payload?;
    let response = blocking(move || state.auth.register(&request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiFailure> {
    let Json(request) = payload?;
    let response = blocking(move || state.auth.login(&request)).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MessageResponse>, ApiFailure> {
    blocking(move || state.auth.logout(&current.token)).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

pub async fn profile(current: CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: current.user })
}

pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiFailure> {
    let Json(request) = payload?;
    let user = blocking(move || state.auth.update_profile(&current.user.id, &request)).await?;
    Ok(Json(ProfileResponse { user }))
}
