use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::types::TagPayload;
use crate::auth::{require_auth, AuthenticatedUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NameBody {
    pub name: Option<String>,
}

fn required_name(body: NameBody) -> Result<String, ApiError> {
    body.name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::validation("name", "this field is required"))
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagPayload>>, ApiError> {
    let tags = state.association_service.list_tags().await?;
    Ok(Json(tags.into_iter().map(TagPayload::from).collect()))
}

pub async fn create_tag(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<TagPayload>), ApiError> {
    require_auth(&user)?;
    let name = required_name(body)?;
    let tag = state.association_service.create_tag(&name).await?;
    Ok((StatusCode::CREATED, Json(TagPayload::from(tag))))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagPayload>, ApiError> {
    let tag = state.association_service.get_tag(id).await?;
    Ok(Json(TagPayload::from(tag)))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<NameBody>,
) -> Result<Json<TagPayload>, ApiError> {
    require_auth(&user)?;
    let name = required_name(body)?;
    let tag = state.association_service.rename_tag(id, &name).await?;
    Ok(Json(TagPayload::from(tag)))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
) -> Result<StatusCode, ApiError> {
    require_auth(&user)?;
    state.association_service.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_payment_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagPayload>>, ApiError> {
    let payment_types = state.association_service.list_payment_types().await?;
    Ok(Json(
        payment_types
            .into_iter()
            .map(|p| TagPayload { id: p.id, name: p.name })
            .collect(),
    ))
}

pub async fn create_payment_type(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<TagPayload>), ApiError> {
    require_auth(&user)?;
    let name = required_name(body)?;
    let payment_type = state.association_service.create_payment_type(&name).await?;
    Ok((
        StatusCode::CREATED,
        Json(TagPayload {
            id: payment_type.id,
            name: payment_type.name,
        }),
    ))
}

pub async fn get_payment_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagPayload>, ApiError> {
    let payment_type = state.association_service.get_payment_type(id).await?;
    Ok(Json(TagPayload {
        id: payment_type.id,
        name: payment_type.name,
    }))
}

pub async fn update_payment_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<NameBody>,
) -> Result<Json<TagPayload>, ApiError> {
    require_auth(&user)?;
    let name = required_name(body)?;
    let payment_type = state
        .association_service
        .rename_payment_type(id, &name)
        .await?;
    Ok(Json(TagPayload {
        id: payment_type.id,
        name: payment_type.name,
    }))
}

pub async fn delete_payment_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
) -> Result<StatusCode, ApiError> {
    require_auth(&user)?;
    state.association_service.delete_payment_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(required_name(NameBody { name: None }).is_err());
        assert!(required_name(NameBody { name: Some("  ".into()) }).is_err());
        assert_eq!(
            required_name(NameBody { name: Some("africain".into()) }).unwrap(),
            "africain"
        );
    }
}
