use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::types::UserPayload;
use crate::auth::{require_auth, AuthenticatedUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPayload {
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserPayload>), ApiError> {
    let user = state
        .user_service
        .register_user(&body.email, &body.password, body.first_name, body.last_name)
        .await?;
    Ok((StatusCode::CREATED, Json(UserPayload::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<TokenPayload>, ApiError> {
    let (_user, token) = state
        .user_service
        .authenticate_user(&body.email, &body.password)
        .await?;
    Ok(Json(TokenPayload { token }))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
) -> Result<Json<Vec<UserPayload>>, ApiError> {
    require_auth(&user)?;
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserPayload::from).collect()))
}
