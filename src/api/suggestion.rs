use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::types::SuggestionPayload;
use crate::entities::phone::PhoneType;
use crate::error::ApiError;
use crate::services::{SuggestionBusinessInput, SuggestionInput, SuggestionPhoneInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionPhoneBody {
    pub number: String,
    pub r#type: PhoneType,
    pub extension: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionBusinessBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phones: Vec<SuggestionPhoneBody>,
    pub category: CategoryRef,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_owner: bool,
    pub business: SuggestionBusinessBody,
}

impl From<SuggestionBody> for SuggestionInput {
    fn from(body: SuggestionBody) -> Self {
        SuggestionInput {
            name: body.name,
            email: body.email,
            is_owner: body.is_owner,
            business: SuggestionBusinessInput {
                name: body.business.name,
                description: body.business.description,
                website: body.business.website,
                email: body.business.email,
                category_id: body.business.category.id,
                phones: body
                    .business
                    .phones
                    .into_iter()
                    .map(|phone| SuggestionPhoneInput {
                        number: phone.number,
                        phone_type: phone.r#type,
                        extension: phone.extension,
                    })
                    .collect(),
            },
        }
    }
}

/// Anonymous intake: creates the pending business, its phones, and the
/// suggestion record atomically.
pub async fn create_suggestion(
    State(state): State<AppState>,
    Json(body): Json<SuggestionBody>,
) -> Result<(StatusCode, Json<SuggestionPayload>), ApiError> {
    let details = state.suggestion_service.create(body.into()).await?;
    let all_categories = state.category_service.all().await?;
    Ok((
        StatusCode::CREATED,
        Json(SuggestionPayload::from_details(details, &all_categories)),
    ))
}

pub async fn list_suggestions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SuggestionPayload>>, ApiError> {
    let suggestions = state.suggestion_service.list().await?;
    let all_categories = state.category_service.all().await?;

    Ok(Json(
        suggestions
            .into_iter()
            .map(|details| SuggestionPayload::from_details(details, &all_categories))
            .collect(),
    ))
}

pub async fn get_suggestion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuggestionPayload>, ApiError> {
    let details = state.suggestion_service.get(id).await?;
    let all_categories = state.category_service.all().await?;
    Ok(Json(SuggestionPayload::from_details(details, &all_categories)))
}
