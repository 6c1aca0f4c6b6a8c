use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{
    business_payment_type, business_tag, payment_type, prelude::*, tag,
};
use crate::error::ApiError;

/// Bulk attach/detach target, either resolved-or-created by name or strictly
/// resolved by id. Unknown ids fail the whole request instead of being
/// silently skipped.
#[derive(Debug, Clone)]
pub enum Selector {
    Names(Vec<String>),
    Ids(Vec<i32>),
}

/// Tag and payment-type lookup tables plus their business associations.
/// Attach and detach follow set semantics: attaching an existing relation and
/// detaching a missing one are both no-ops.
#[derive(Clone)]
pub struct AssociationService {
    db: Arc<DatabaseConnection>,
}

impl AssociationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // --- tag lookup table ---

    pub async fn list_tags(&self) -> Result<Vec<tag::Model>, ApiError> {
        Ok(Tag::find().order_by_asc(tag::Column::Name).all(&*self.db).await?)
    }

    pub async fn get_tag(&self, id: i32) -> Result<tag::Model, ApiError> {
        Tag::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(ApiError::NotFound("tag"))
    }

    pub async fn create_tag(&self, name: &str) -> Result<tag::Model, ApiError> {
        if Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ApiError::validation("name", "a tag with this name already exists"));
        }

        let new_tag = tag::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        Ok(new_tag.insert(&*self.db).await?)
    }

    pub async fn rename_tag(&self, id: i32, name: &str) -> Result<tag::Model, ApiError> {
        let tag = self.get_tag(id).await?;

        if Tag::find()
            .filter(tag::Column::Name.eq(name))
            .filter(tag::Column::Id.ne(id))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ApiError::validation("name", "a tag with this name already exists"));
        }

        let mut active: tag::ActiveModel = tag.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&*self.db).await?)
    }

    /// Hard delete; junction rows cascade away.
    pub async fn delete_tag(&self, id: i32) -> Result<(), ApiError> {
        let result = Tag::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound("tag"));
        }
        Ok(())
    }

    // --- payment type lookup table ---

    pub async fn list_payment_types(&self) -> Result<Vec<payment_type::Model>, ApiError> {
        Ok(PaymentType::find()
            .order_by_asc(payment_type::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn get_payment_type(&self, id: i32) -> Result<payment_type::Model, ApiError> {
        PaymentType::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(ApiError::NotFound("payment type"))
    }

    pub async fn create_payment_type(&self, name: &str) -> Result<payment_type::Model, ApiError> {
        if PaymentType::find()
            .filter(payment_type::Column::Name.eq(name))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ApiError::validation(
                "name",
                "a payment type with this name already exists",
            ));
        }

        let new_payment_type = payment_type::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        Ok(new_payment_type.insert(&*self.db).await?)
    }

    pub async fn rename_payment_type(
        &self,
        id: i32,
        name: &str,
    ) -> Result<payment_type::Model, ApiError> {
        let payment_type = self.get_payment_type(id).await?;

        if PaymentType::find()
            .filter(payment_type::Column::Name.eq(name))
            .filter(payment_type::Column::Id.ne(id))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ApiError::validation(
                "name",
                "a payment type with this name already exists",
            ));
        }

        let mut active: payment_type::ActiveModel = payment_type.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&*self.db).await?)
    }

    pub async fn delete_payment_type(&self, id: i32) -> Result<(), ApiError> {
        let result = PaymentType::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound("payment type"));
        }
        Ok(())
    }

    // --- business associations ---

    /// Attach tags to a business. Returns the business's tags sorted by name.
    pub async fn attach_tags(
        &self,
        business_id: i32,
        selector: Selector,
    ) -> Result<Vec<tag::Model>, ApiError> {
        let tag_ids = self.resolve_tags(selector, true).await?;

        let existing: Vec<i32> = BusinessTag::find()
            .filter(business_tag::Column::BusinessId.eq(business_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|row| row.tag_id)
            .collect();

        let missing: Vec<business_tag::ActiveModel> = tag_ids
            .into_iter()
            .filter(|id| !existing.contains(id))
            .map(|tag_id| business_tag::ActiveModel {
                business_id: Set(business_id),
                tag_id: Set(tag_id),
            })
            .collect();

        if !missing.is_empty() {
            BusinessTag::insert_many(missing).exec(&*self.db).await?;
        }

        self.tags_of(business_id).await
    }

    pub async fn detach_tags(
        &self,
        business_id: i32,
        selector: Selector,
    ) -> Result<Vec<tag::Model>, ApiError> {
        let tag_ids = self.resolve_tags(selector, false).await?;

        BusinessTag::delete_many()
            .filter(business_tag::Column::BusinessId.eq(business_id))
            .filter(business_tag::Column::TagId.is_in(tag_ids))
            .exec(&*self.db)
            .await?;

        self.tags_of(business_id).await
    }

    pub async fn attach_payment_types(
        &self,
        business_id: i32,
        selector: Selector,
    ) -> Result<Vec<payment_type::Model>, ApiError> {
        let ids = self.resolve_payment_types(selector, true).await?;

        let existing: Vec<i32> = BusinessPaymentType::find()
            .filter(business_payment_type::Column::BusinessId.eq(business_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|row| row.payment_type_id)
            .collect();

        let missing: Vec<business_payment_type::ActiveModel> = ids
            .into_iter()
            .filter(|id| !existing.contains(id))
            .map(|payment_type_id| business_payment_type::ActiveModel {
                business_id: Set(business_id),
                payment_type_id: Set(payment_type_id),
            })
            .collect();

        if !missing.is_empty() {
            BusinessPaymentType::insert_many(missing).exec(&*self.db).await?;
        }

        self.payment_types_of(business_id).await
    }

    pub async fn detach_payment_types(
        &self,
        business_id: i32,
        selector: Selector,
    ) -> Result<Vec<payment_type::Model>, ApiError> {
        let ids = self.resolve_payment_types(selector, false).await?;

        BusinessPaymentType::delete_many()
            .filter(business_payment_type::Column::BusinessId.eq(business_id))
            .filter(business_payment_type::Column::PaymentTypeId.is_in(ids))
            .exec(&*self.db)
            .await?;

        self.payment_types_of(business_id).await
    }

    async fn tags_of(&self, business_id: i32) -> Result<Vec<tag::Model>, ApiError> {
        let ids: Vec<i32> = BusinessTag::find()
            .filter(business_tag::Column::BusinessId.eq(business_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|row| row.tag_id)
            .collect();

        Ok(Tag::find()
            .filter(tag::Column::Id.is_in(ids))
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await?)
    }

    async fn payment_types_of(&self, business_id: i32) -> Result<Vec<payment_type::Model>, ApiError> {
        let ids: Vec<i32> = BusinessPaymentType::find()
            .filter(business_payment_type::Column::BusinessId.eq(business_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|row| row.payment_type_id)
            .collect();

        Ok(PaymentType::find()
            .filter(payment_type::Column::Id.is_in(ids))
            .order_by_asc(payment_type::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// By names: resolve, creating missing tags when `create_missing`.
    /// By ids: every id must resolve; unknown ids fail loudly.
    async fn resolve_tags(
        &self,
        selector: Selector,
        create_missing: bool,
    ) -> Result<Vec<i32>, ApiError> {
        match selector {
            Selector::Names(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    let found = Tag::find()
                        .filter(tag::Column::Name.eq(&name))
                        .one(&*self.db)
                        .await?;
                    match found {
                        Some(tag) => ids.push(tag.id),
                        None if create_missing => ids.push(self.create_tag(&name).await?.id),
                        None => {}
                    }
                }
                Ok(ids)
            }
            Selector::Ids(ids) => {
                let found: Vec<i32> = Tag::find()
                    .filter(tag::Column::Id.is_in(ids.clone()))
                    .all(&*self.db)
                    .await?
                    .into_iter()
                    .map(|tag| tag.id)
                    .collect();
                check_all_resolved(&ids, &found)?;
                Ok(ids)
            }
        }
    }

    async fn resolve_payment_types(
        &self,
        selector: Selector,
        create_missing: bool,
    ) -> Result<Vec<i32>, ApiError> {
        match selector {
            Selector::Names(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    let found = PaymentType::find()
                        .filter(payment_type::Column::Name.eq(&name))
                        .one(&*self.db)
                        .await?;
                    match found {
                        Some(payment_type) => ids.push(payment_type.id),
                        None if create_missing => {
                            ids.push(self.create_payment_type(&name).await?.id)
                        }
                        None => {}
                    }
                }
                Ok(ids)
            }
            Selector::Ids(ids) => {
                let found: Vec<i32> = PaymentType::find()
                    .filter(payment_type::Column::Id.is_in(ids.clone()))
                    .all(&*self.db)
                    .await?
                    .into_iter()
                    .map(|payment_type| payment_type.id)
                    .collect();
                check_all_resolved(&ids, &found)?;
                Ok(ids)
            }
        }
    }
}

fn check_all_resolved(requested: &[i32], found: &[i32]) -> Result<(), ApiError> {
    let unresolved: Vec<String> = requested
        .iter()
        .filter(|id| !found.contains(id))
        .map(|id| id.to_string())
        .collect();

    if !unresolved.is_empty() {
        return Err(ApiError::validation(
            "ids",
            format!("unknown ids: {}", unresolved.join(", ")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_resolved_ids_pass() {
        assert!(check_all_resolved(&[1, 2], &[1, 2, 3]).is_ok());
        assert!(check_all_resolved(&[], &[]).is_ok());
    }

    #[test]
    fn unresolved_ids_are_reported_not_skipped() {
        match check_all_resolved(&[1, 7, 9], &[1]) {
            Err(ApiError::Validation { field, message }) => {
                assert_eq!(field, "ids");
                assert_eq!(message, "unknown ids: 7, 9");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
