use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::types::{category_forest, category_node, CategoryNode};
use crate::auth::{require_auth, AuthenticatedUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub only_root: Option<bool>,
}

/// PUT replaces the placement: an absent `parent` moves the category to the
/// root, matching replace semantics rather than patch.
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: Option<String>,
    pub parent: Option<i32>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryNode>>, ApiError> {
    let all = state.category_service.all().await?;
    let listed = state
        .category_service
        .list(query.only_root.unwrap_or(false))
        .await?;

    Ok(Json(category_forest(&all, listed.iter())))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<CategoryNode>), ApiError> {
    require_auth(&user)?;
    let name = body
        .name
        .ok_or_else(|| ApiError::validation("name", "this field is required"))?;

    let category = state.category_service.create(&name, body.parent).await?;
    let all = state.category_service.all().await?;
    let node = category_node(&all, category.id).ok_or(ApiError::NotFound("category"))?;
    Ok((StatusCode::CREATED, Json(node)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CategoryNode>, ApiError> {
    let category = state
        .category_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("category"))?;

    let all = state.category_service.all().await?;
    let node = category_node(&all, category.id).ok_or(ApiError::NotFound("category"))?;
    Ok(Json(node))
}

/// Names from the category up to its root, self first.
pub async fn get_category_tree(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let category = state
        .category_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("category"))?;

    Ok(Json(state.category_service.get_tree(category.id).await?))
}

/// The category's own id plus every descendant id.
pub async fn get_category_children(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<i32>>, ApiError> {
    let category = state
        .category_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("category"))?;

    Ok(Json(
        state.category_service.get_children_ids(category.id).await?,
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<CategoryNode>, ApiError> {
    require_auth(&user)?;
    let category = state
        .category_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("category"))?;

    let updated = state
        .category_service
        .update(category.id, body.name, Some(body.parent))
        .await?;

    let all = state.category_service.all().await?;
    let node = category_node(&all, updated.id).ok_or(ApiError::NotFound("category"))?;
    Ok(Json(node))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
) -> Result<StatusCode, ApiError> {
    require_auth(&user)?;
    let category = state
        .category_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("category"))?;

    state.category_service.delete(category.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
