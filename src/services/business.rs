use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{
    address, business, business_tag, opening_hour, prelude::*, tag,
};
use crate::error::ApiError;
use crate::services::CategoryService;
use crate::text::slugify;

/// Listing filters. Defaults are the public view: accepted entries only,
/// soft-deleted rows excluded.
#[derive(Debug, Default, Clone)]
pub struct BusinessFilters {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub status: Option<business::Status>,
    pub any_status: bool,
    pub category: Option<String>,
    pub location: Option<String>,
    pub accepted_at: Option<NaiveDate>,
    pub accepted_at_after: Option<NaiveDate>,
    pub include_deleted: bool,
    pub ordering: Option<Ordering>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Name,
    Id,
}

impl Ordering {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Ordering::Name),
            "id" => Some(Ordering::Id),
            _ => None,
        }
    }
}

/// Mutable business fields, as accepted by create and update.
#[derive(Debug, Default, Clone)]
pub struct BusinessInput {
    pub name: Option<String>,
    pub category_id: Option<Option<i32>>,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub status: Option<business::Status>,
}

/// A business with every owned record loaded, ready for serialization.
pub struct BusinessDetails {
    pub business: business::Model,
    pub category: Option<crate::entities::category::Model>,
    pub tags: Vec<tag::Model>,
    pub payment_types: Vec<crate::entities::payment_type::Model>,
    pub phones: Vec<crate::entities::phone::Model>,
    pub social_links: Vec<crate::entities::social_link::Model>,
    pub addresses: Vec<address::Model>,
    pub opening_hours: Vec<opening_hour::Model>,
}

pub struct BusinessPage {
    pub businesses: Vec<business::Model>,
    pub items_count: u64,
    pub total_pages: u64,
}

/// accepted_at records the first transition into `accepted` and is kept
/// through every later transition, including refuse/re-accept cycles.
pub fn acceptance_date(
    previous: business::Status,
    next: business::Status,
    recorded: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if next == business::Status::Accepted
        && previous != business::Status::Accepted
        && recorded.is_none()
    {
        return Some(today);
    }
    recorded
}

#[derive(Clone)]
pub struct BusinessService {
    db: Arc<DatabaseConnection>,
    category_service: CategoryService,
}

impl BusinessService {
    pub fn new(db: Arc<DatabaseConnection>, category_service: CategoryService) -> Self {
        Self {
            db,
            category_service,
        }
    }

    pub async fn list(
        &self,
        filters: &BusinessFilters,
        page: u64,
        page_size: u64,
    ) -> Result<BusinessPage, ApiError> {
        let mut query = Business::find();

        if !filters.include_deleted {
            query = query.filter(business::Column::DeletedAt.is_null());
        }

        // Public view unless a status (or any_status) is asked for explicitly.
        if !filters.any_status {
            let status = filters.status.unwrap_or(business::Status::Accepted);
            query = query.filter(business::Column::Status.eq(status));
        }

        if let Some(name) = &filters.name {
            query = query.filter(business::Column::Name.eq(name));
        }

        if let Some(accepted_at) = filters.accepted_at {
            query = query.filter(business::Column::AcceptedAt.eq(accepted_at));
        }

        if let Some(after) = filters.accepted_at_after {
            query = query.filter(business::Column::AcceptedAt.gt(after));
        }

        if let Some(tag_name) = &filters.tag {
            let ids = self.business_ids_tagged(tag_name).await?;
            query = query.filter(business::Column::Id.is_in(ids));
        }

        if let Some(slug) = &filters.category {
            // Subtree filter: the category itself and every descendant.
            let ids = self
                .category_service
                .subtree_ids_by_slug(slug)
                .await?
                .unwrap_or_default();
            query = query.filter(business::Column::CategoryId.is_in(ids));
        }

        if let Some(city) = &filters.location {
            let ids = self.business_ids_in_city(city).await?;
            query = query.filter(business::Column::Id.is_in(ids));
        }

        query = match filters.ordering {
            Some(Ordering::Name) => query.order_by_asc(business::Column::Name),
            _ => query.order_by_asc(business::Column::Id),
        };

        let paginator = query.paginate(&*self.db, page_size);
        let totals = paginator.num_items_and_pages().await?;
        let businesses = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(BusinessPage {
            businesses,
            items_count: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    /// Resolve `{key}` as a numeric id first, then as a slug. Soft-deleted
    /// rows stay reachable here; only listings hide them.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<business::Model>, ApiError> {
        if let Ok(id) = key.parse::<i32>() {
            return Ok(Business::find_by_id(id).one(&*self.db).await?);
        }

        let business = Business::find()
            .filter(business::Column::Slug.eq(key))
            .one(&*self.db)
            .await?;
        Ok(business)
    }

    pub async fn create(
        &self,
        input: BusinessInput,
        actor_id: Option<i32>,
    ) -> Result<business::Model, ApiError> {
        let name = input
            .name
            .clone()
            .ok_or_else(|| ApiError::validation("name", "this field is required"))?;

        self.check_unique_name(&name, None).await?;
        if let Some(Some(category_id)) = input.category_id {
            self.check_category_exists(category_id).await?;
        }

        let status = input.status.unwrap_or(business::Status::Pending);
        let accepted_at = acceptance_date(
            business::Status::Pending,
            status,
            None,
            Utc::now().date_naive(),
        );

        let new_business = business::ActiveModel {
            name: Set(name.clone()),
            slug: Set(slugify(&name)),
            category_id: Set(input.category_id.flatten()),
            slogan: Set(input.slogan.unwrap_or_default()),
            description: Set(input.description.unwrap_or_default()),
            website: Set(input.website.unwrap_or_default()),
            email: Set(input.email.unwrap_or_default()),
            notes: Set(input.notes.unwrap_or_default()),
            status: Set(status),
            accepted_at: Set(accepted_at),
            last_updated_by: Set(actor_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(new_business.insert(&*self.db).await?)
    }

    /// Apply field changes. The slug follows the name at every save, and the
    /// first transition into `accepted` stamps accepted_at; the date is kept
    /// through every later transition.
    pub async fn update(
        &self,
        business: business::Model,
        input: BusinessInput,
        actor_id: Option<i32>,
    ) -> Result<business::Model, ApiError> {
        let previous_status = business.status;
        let previous_accepted_at = business.accepted_at;

        if let Some(name) = &input.name {
            self.check_unique_name(name, Some(business.id)).await?;
        }
        if let Some(Some(category_id)) = input.category_id {
            self.check_category_exists(category_id).await?;
        }

        let mut active: business::ActiveModel = business.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(slogan) = input.slogan {
            active.slogan = Set(slogan);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(website) = input.website {
            active.website = Set(website);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
            active.accepted_at = Set(acceptance_date(
                previous_status,
                status,
                previous_accepted_at,
                Utc::now().date_naive(),
            ));
        }

        active.slug = Set(slugify(active.name.as_ref()));
        active.last_updated_by = Set(actor_id);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&*self.db).await?)
    }

    /// Moderation transition. Any target state is allowed from any state.
    pub async fn update_status(
        &self,
        business: business::Model,
        status: business::Status,
        actor_id: Option<i32>,
    ) -> Result<business::Model, ApiError> {
        info!(
            business_id = business.id,
            from = ?business.status,
            to = ?status,
            "business status transition"
        );

        self.update(
            business,
            BusinessInput {
                status: Some(status),
                ..Default::default()
            },
            actor_id,
        )
        .await
    }

    /// Soft delete: stamp deleted_at, keep the row.
    pub async fn soft_delete(
        &self,
        business: business::Model,
        actor_id: Option<i32>,
    ) -> Result<business::Model, ApiError> {
        let mut active: business::ActiveModel = business.into();
        active.deleted_at = Set(Some(Utc::now().into()));
        active.last_updated_by = Set(actor_id);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&*self.db).await?)
    }

    /// Load every owned record of a business for the nested representation.
    pub async fn load_details(
        &self,
        business: business::Model,
    ) -> Result<BusinessDetails, ApiError> {
        let category = match business.category_id {
            Some(id) => Category::find_by_id(id).one(&*self.db).await?,
            None => None,
        };

        let tags = business
            .find_related(Tag)
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await?;
        let payment_types = business
            .find_related(PaymentType)
            .order_by_asc(crate::entities::payment_type::Column::Name)
            .all(&*self.db)
            .await?;
        let phones = business.find_related(Phone).all(&*self.db).await?;
        let social_links = business.find_related(SocialLink).all(&*self.db).await?;
        let addresses = business.find_related(Address).all(&*self.db).await?;
        let opening_hours = business
            .find_related(OpeningHour)
            .order_by_asc(opening_hour::Column::Day)
            .order_by_asc(opening_hour::Column::OpeningTime)
            .all(&*self.db)
            .await?;

        Ok(BusinessDetails {
            business,
            category,
            tags,
            payment_types,
            phones,
            social_links,
            addresses,
            opening_hours,
        })
    }

    async fn check_unique_name(&self, name: &str, excluding: Option<i32>) -> Result<(), ApiError> {
        let mut query = Business::find().filter(business::Column::Name.eq(name));
        if let Some(id) = excluding {
            query = query.filter(business::Column::Id.ne(id));
        }

        if query.one(&*self.db).await?.is_some() {
            return Err(ApiError::validation(
                "name",
                "a business with this name already exists",
            ));
        }
        Ok(())
    }

    async fn check_category_exists(&self, category_id: i32) -> Result<(), ApiError> {
        if Category::find_by_id(category_id).one(&*self.db).await?.is_none() {
            return Err(ApiError::validation("category", "unknown category"));
        }
        Ok(())
    }

    async fn business_ids_tagged(&self, tag_name: &str) -> Result<Vec<i32>, ApiError> {
        let tag = Tag::find()
            .filter(tag::Column::Name.eq(tag_name))
            .one(&*self.db)
            .await?;

        let Some(tag) = tag else {
            return Ok(Vec::new());
        };

        let ids = BusinessTag::find()
            .filter(business_tag::Column::TagId.eq(tag.id))
            .select_only()
            .column(business_tag::Column::BusinessId)
            .into_tuple::<i32>()
            .all(&*self.db)
            .await?;
        Ok(ids)
    }

    async fn business_ids_in_city(&self, city: &str) -> Result<Vec<i32>, ApiError> {
        let ids = Address::find()
            .filter(address::Column::City.contains(city))
            .select_only()
            .column(address::Column::BusinessId)
            .into_tuple::<i32>()
            .all(&*self.db)
            .await?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;
    use crate::entities::business::Status;

    #[test]
    fn ordering_parses_known_fields_only() {
        assert_eq!(Ordering::parse("name"), Some(Ordering::Name));
        assert_eq!(Ordering::parse("id"), Some(Ordering::Id));
        assert_eq!(Ordering::parse("slug"), None);
    }

    #[test]
    fn default_filters_describe_the_public_view() {
        let filters = BusinessFilters::default();
        assert!(!filters.include_deleted);
        assert!(!filters.any_status);
        assert!(filters.status.is_none());
    }

    #[test]
    fn acceptance_is_stamped_on_entry_into_accepted() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            acceptance_date(Status::Pending, Status::Accepted, None, today),
            Some(today)
        );
        assert_eq!(
            acceptance_date(Status::Pending, Status::Refused, None, today),
            None
        );
    }

    #[test]
    fn acceptance_date_survives_resave_refusal_and_reaccept() {
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        // re-save while already accepted
        assert_eq!(
            acceptance_date(Status::Accepted, Status::Accepted, Some(first), later),
            Some(first)
        );
        // refusing keeps the date
        assert_eq!(
            acceptance_date(Status::Accepted, Status::Refused, Some(first), later),
            Some(first)
        );
        // re-accepting keeps the original date
        assert_eq!(
            acceptance_date(Status::Refused, Status::Accepted, Some(first), later),
            Some(first)
        );
    }

    fn business_row(deleted_at: Option<chrono::DateTime<chrono::FixedOffset>>) -> business::Model {
        let now = Utc::now();
        business::Model {
            id: 1,
            name: "Gracia Afrika".to_string(),
            slug: "gracia-afrika".to_string(),
            category_id: None,
            slogan: String::new(),
            description: String::new(),
            website: String::new(),
            email: String::new(),
            notes: String::new(),
            status: Status::Accepted,
            accepted_at: None,
            last_updated_by: None,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at,
        }
    }

    #[tokio::test]
    async fn soft_delete_updates_the_row_instead_of_removing_it() {
        let stamped = business_row(Some(Utc::now().into()));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stamped]])
                .into_connection(),
        );
        let service = BusinessService::new(db.clone(), CategoryService::new(db.clone()));

        let deleted = service
            .soft_delete(business_row(None), None)
            .await
            .unwrap();
        assert!(deleted.deleted_at.is_some());

        drop(service);
        let db = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"), "expected an update: {log}");
        assert!(!log.contains("DELETE FROM"), "row must survive: {log}");
    }

    #[tokio::test]
    async fn default_listing_filters_to_accepted_and_not_deleted() {
        let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(0)))]);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row]])
                .append_query_results([Vec::<business::Model>::new()])
                .into_connection(),
        );
        let service = BusinessService::new(db.clone(), CategoryService::new(db.clone()));

        let page = service
            .list(&BusinessFilters::default(), 1, 25)
            .await
            .unwrap();
        assert_eq!(page.items_count, 0);

        drop(service);
        let db = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("deleted_at"), "missing soft-delete filter: {log}");
        assert!(log.contains("IS NULL"), "missing soft-delete filter: {log}");
        assert!(log.contains("accepted"), "missing status filter: {log}");
    }
}
