use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::types::{BusinessPayload, Paginated, TagPayload};
use crate::auth::{require_auth, AuthenticatedUser};
use crate::entities::business::Status;
use crate::error::ApiError;
use crate::services::{BusinessFilters, BusinessInput, Ordering, Selector};
use crate::AppState;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 25;

#[derive(Debug, Deserialize)]
pub struct BusinessListQuery {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub accepted_at: Option<NaiveDate>,
    pub accepted_at_after: Option<NaiveDate>,
    pub ordering: Option<String>,
    pub include_deleted: Option<bool>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessBody {
    pub name: Option<String>,
    pub category: Option<i32>,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(rename = "querySearch")]
    pub query_search: Option<String>,
    pub distance: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SelectorQuery {
    pub names: Option<String>,
    pub ids: Option<String>,
}

fn parse_status(value: &str) -> Result<Status, ApiError> {
    Status::parse(value).ok_or_else(|| {
        ApiError::validation("status", "must be one of pending, accepted, refused")
    })
}

fn build_filters(query: &BusinessListQuery) -> Result<BusinessFilters, ApiError> {
    let mut filters = BusinessFilters {
        name: query.name.clone(),
        tag: query.tags.clone(),
        category: query.category.clone(),
        location: query.location.clone(),
        accepted_at: query.accepted_at,
        accepted_at_after: query.accepted_at_after,
        include_deleted: query.include_deleted.unwrap_or(false),
        ..Default::default()
    };

    match query.status.as_deref() {
        Some("all") => filters.any_status = true,
        Some(value) => filters.status = Some(parse_status(value)?),
        None => {}
    }

    if let Some(ordering) = &query.ordering {
        filters.ordering = Some(
            Ordering::parse(ordering)
                .ok_or_else(|| ApiError::validation("ordering", "must be name or id"))?,
        );
    }

    Ok(filters)
}

/// Comma-separated `names=` or `ids=`; exactly the bulk attach/detach contract.
fn parse_selector(query: &SelectorQuery) -> Result<Selector, ApiError> {
    if let Some(names) = &query.names {
        let names: Vec<String> = names
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        return Ok(Selector::Names(names));
    }

    if let Some(ids) = &query.ids {
        let ids = ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i32>()
                    .map_err(|_| ApiError::validation("ids", format!("invalid id: {s}")))
            })
            .collect::<Result<Vec<i32>, ApiError>>()?;
        return Ok(Selector::Ids(ids));
    }

    Err(ApiError::BadRequest(
        "names or ids parameter is required".to_string(),
    ))
}

impl From<BusinessBody> for BusinessInput {
    fn from(body: BusinessBody) -> Self {
        BusinessInput {
            name: body.name,
            category_id: Some(body.category),
            slogan: body.slogan,
            description: body.description,
            website: body.website,
            email: body.email,
            notes: body.notes,
            status: None,
        }
    }
}

pub async fn list_businesses(
    State(state): State<AppState>,
    Query(query): Query<BusinessListQuery>,
) -> Result<Json<Paginated<BusinessPayload>>, ApiError> {
    let filters = build_filters(&query)?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let listing = state.business_service.list(&filters, page, page_size).await?;
    let all_categories = state.category_service.all().await?;

    let mut results = Vec::with_capacity(listing.businesses.len());
    for business in listing.businesses {
        let details = state.business_service.load_details(business).await?;
        results.push(BusinessPayload::from_details(details, &all_categories));
    }

    Ok(Json(Paginated::new(
        "/businesses",
        page,
        page_size,
        listing.items_count,
        listing.total_pages,
        results,
    )))
}

pub async fn create_business(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<BusinessBody>,
) -> Result<(StatusCode, Json<BusinessPayload>), ApiError> {
    let actor = require_auth(&user)?;

    let status = match &body.status {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let mut input = BusinessInput::from(body);
    input.status = status;

    let business = state.business_service.create(input, Some(actor.id)).await?;
    let payload = load_payload(&state, business).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn get_business(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<BusinessPayload>, ApiError> {
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    Ok(Json(load_payload(&state, business).await?))
}

pub async fn update_business(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<BusinessBody>,
) -> Result<Json<BusinessPayload>, ApiError> {
    let actor = require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let status = match &body.status {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let mut input = BusinessInput::from(body);
    input.status = status;

    let updated = state
        .business_service
        .update(business, input, Some(actor.id))
        .await?;
    Ok(Json(load_payload(&state, updated).await?))
}

pub async fn delete_business(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
) -> Result<StatusCode, ApiError> {
    let actor = require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    state
        .business_service
        .soft_delete(business, Some(actor.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<BusinessPayload>, ApiError> {
    let actor = require_auth(&user)?;
    let status = body
        .status
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("status is required".to_string()))?;
    let status = parse_status(status)?;

    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let updated = state
        .business_service
        .update_status(business, status, Some(actor.id))
        .await?;
    Ok(Json(load_payload(&state, updated).await?))
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let search = query
        .query_search
        .ok_or_else(|| ApiError::BadRequest("querySearch parameter is required".to_string()))?;

    let distance = query
        .distance
        .unwrap_or(crate::services::DEFAULT_MAX_DISTANCE);
    let limit = query.limit.unwrap_or(crate::services::DEFAULT_LIMIT);

    let names = state.search_service.autocomplete(&search, distance, limit).await?;
    Ok(Json(names))
}

pub async fn attach_tags(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Query(query): Query<SelectorQuery>,
) -> Result<Json<Vec<TagPayload>>, ApiError> {
    require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let selector = parse_selector(&query)?;
    let tags = state
        .association_service
        .attach_tags(business.id, selector)
        .await?;
    Ok(Json(tags.into_iter().map(TagPayload::from).collect()))
}

pub async fn detach_tags(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Query(query): Query<SelectorQuery>,
) -> Result<Json<Vec<TagPayload>>, ApiError> {
    require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let selector = parse_selector(&query)?;
    let tags = state
        .association_service
        .detach_tags(business.id, selector)
        .await?;
    Ok(Json(tags.into_iter().map(TagPayload::from).collect()))
}

pub async fn attach_payment_types(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Query(query): Query<SelectorQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let selector = parse_selector(&query)?;
    let payment_types = state
        .association_service
        .attach_payment_types(business.id, selector)
        .await?;
    Ok(Json(payment_types.into_iter().map(|p| p.name).collect()))
}

pub async fn detach_payment_types(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    Query(query): Query<SelectorQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    require_auth(&user)?;
    let business = state
        .business_service
        .find_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("business"))?;

    let selector = parse_selector(&query)?;
    let payment_types = state
        .association_service
        .detach_payment_types(business.id, selector)
        .await?;
    Ok(Json(payment_types.into_iter().map(|p| p.name).collect()))
}

async fn load_payload(
    state: &AppState,
    business: crate::entities::business::Model,
) -> Result<BusinessPayload, ApiError> {
    let details = state.business_service.load_details(business).await?;
    let all_categories = state.category_service.all().await?;
    Ok(BusinessPayload::from_details(details, &all_categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(names: Option<&str>, ids: Option<&str>) -> SelectorQuery {
        SelectorQuery {
            names: names.map(str::to_string),
            ids: ids.map(str::to_string),
        }
    }

    #[test]
    fn selector_splits_comma_separated_names() {
        match parse_selector(&query(Some("africain, tag2"), None)).unwrap() {
            Selector::Names(names) => assert_eq!(names, vec!["africain", "tag2"]),
            other => panic!("expected names selector, got {other:?}"),
        }
    }

    #[test]
    fn selector_parses_ids_and_rejects_junk() {
        match parse_selector(&query(None, Some("1,2,3"))).unwrap() {
            Selector::Ids(ids) => assert_eq!(ids, vec![1, 2, 3]),
            other => panic!("expected ids selector, got {other:?}"),
        }

        assert!(parse_selector(&query(None, Some("1,x"))).is_err());
    }

    #[test]
    fn selector_requires_names_or_ids() {
        assert!(matches!(
            parse_selector(&query(None, None)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn status_filter_accepts_all_and_rejects_unknown() {
        let mut list_query = BusinessListQuery {
            name: None,
            tags: None,
            status: Some("all".to_string()),
            category: None,
            location: None,
            accepted_at: None,
            accepted_at_after: None,
            ordering: None,
            include_deleted: None,
            page: None,
            page_size: None,
        };

        assert!(build_filters(&list_query).unwrap().any_status);

        list_query.status = Some("archived".to_string());
        assert!(build_filters(&list_query).is_err());
    }
}
