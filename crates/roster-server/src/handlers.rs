use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use roster_api::{ApiError, ApiResponse, NewAccount};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Roster User Service",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn readyz() -> impl IntoResponse {
    // In future, perform checks for store/cache connectivity etc.
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> Result<ApiResponse, ApiError> {
    let profile = state.users.create_user(payload).await?;
    Ok(ApiResponse::created("User created", Some(profile)))
}

pub async fn get_users(State(state): State<AppState>) -> Result<ApiResponse, ApiError> {
    let listing = state.users.list_users().await?;
    Ok(ApiResponse::ok("Users fetched", Some(Value::Array(listing))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse, ApiError> {
    let outcome = state.users.login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::ok("Login successful", Some(outcome.into_payload())))
}

pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let profile = state.users.get_user(&id).await?;
    Ok(ApiResponse::ok("User fetched", Some(profile)))
}

pub async fn update_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<ApiResponse, ApiError> {
    let profile = state.users.update_user(&id, fields).await?;
    Ok(ApiResponse::ok("User updated", Some(profile)))
}

pub async fn delete_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    state.users.delete_user(&id).await?;
    Ok(ApiResponse::ok("User deleted", None))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ApiResponse, ApiError> {
    state.users.change_password(&id, &payload.password).await?;
    Ok(ApiResponse::ok("Password updated", None))
}

pub async fn get_activity_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let feed = state.users.activity_feed(&id).await?;
    let data = serde_json::to_value(feed).map_err(roster_core::CoreError::from)?;
    Ok(ApiResponse::ok("Activity feed fetched", Some(data)))
}
