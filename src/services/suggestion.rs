use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{business, category, phone, prelude::*, suggestion};
use crate::error::ApiError;
use crate::text::slugify;

#[derive(Debug, Clone)]
pub struct SuggestionPhoneInput {
    pub number: String,
    pub phone_type: phone::PhoneType,
    pub extension: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SuggestionBusinessInput {
    pub name: String,
    pub description: String,
    pub website: String,
    pub email: String,
    pub category_id: i32,
    pub phones: Vec<SuggestionPhoneInput>,
}

#[derive(Debug, Clone)]
pub struct SuggestionInput {
    pub name: String,
    pub email: String,
    pub is_owner: bool,
    pub business: SuggestionBusinessInput,
}

/// The nested structure echoed back after intake, and used for listings.
#[derive(Debug)]
pub struct SuggestionDetails {
    pub suggestion: suggestion::Model,
    pub business: Option<business::Model>,
    pub category: Option<category::Model>,
    pub phones: Vec<phone::Model>,
}

/// Public submission path: one transaction creates the pending business, its
/// phones, and the suggestion record, or nothing at all.
#[derive(Clone)]
pub struct SuggestionService {
    db: Arc<DatabaseConnection>,
}

impl SuggestionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: SuggestionInput) -> Result<SuggestionDetails, ApiError> {
        for phone in &input.business.phones {
            if !phone::is_valid_number(&phone.number) {
                return Err(ApiError::validation(
                    "business.phones.number",
                    format!("invalid phone number: {}", phone.number),
                ));
            }
        }

        let tx = self.db.begin().await?;

        // Category resolution gates the whole operation; the error message is
        // the fixed user-facing one. Dropping the transaction on any early
        // return rolls everything back.
        let category = Category::find_by_id(input.business.category_id)
            .one(&tx)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Unknown category".to_string()))?;

        if Business::find()
            .filter(business::Column::Name.eq(&input.business.name))
            .one(&tx)
            .await?
            .is_some()
        {
            return Err(ApiError::validation(
                "business.name",
                "a business with this name already exists",
            ));
        }

        let new_business = business::ActiveModel {
            name: Set(input.business.name.clone()),
            slug: Set(slugify(&input.business.name)),
            category_id: Set(Some(category.id)),
            slogan: Set(String::new()),
            description: Set(input.business.description),
            website: Set(input.business.website),
            email: Set(input.business.email),
            notes: Set(String::new()),
            status: Set(business::Status::Pending),
            accepted_at: Set(None),
            last_updated_by: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let created_business = new_business.insert(&tx).await?;

        let mut phones = Vec::with_capacity(input.business.phones.len());
        for phone_input in input.business.phones {
            let new_phone = phone::ActiveModel {
                business_id: Set(created_business.id),
                number: Set(phone_input.number),
                r#type: Set(phone_input.phone_type),
                extension: Set(phone_input.extension),
                ..Default::default()
            };
            phones.push(new_phone.insert(&tx).await?);
        }

        let new_suggestion = suggestion::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            is_owner: Set(input.is_owner),
            business_id: Set(Some(created_business.id)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let created_suggestion = new_suggestion.insert(&tx).await?;

        tx.commit().await?;

        info!(
            suggestion_id = created_suggestion.id,
            business_id = created_business.id,
            "suggestion received"
        );

        Ok(SuggestionDetails {
            suggestion: created_suggestion,
            business: Some(created_business),
            category: Some(category),
            phones,
        })
    }

    pub async fn list(&self) -> Result<Vec<SuggestionDetails>, ApiError> {
        let suggestions = Suggestion::find()
            .order_by_asc(suggestion::Column::Id)
            .all(&*self.db)
            .await?;

        let mut details = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            details.push(self.load_details(suggestion).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: i32) -> Result<SuggestionDetails, ApiError> {
        let suggestion = Suggestion::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(ApiError::NotFound("suggestion"))?;
        self.load_details(suggestion).await
    }

    async fn load_details(
        &self,
        suggestion: suggestion::Model,
    ) -> Result<SuggestionDetails, ApiError> {
        let business = match suggestion.business_id {
            Some(id) => Business::find_by_id(id).one(&*self.db).await?,
            None => None,
        };

        let (category, phones) = match &business {
            Some(business) => {
                let category = match business.category_id {
                    Some(id) => Category::find_by_id(id).one(&*self.db).await?,
                    None => None,
                };
                let phones = business.find_related(Phone).all(&*self.db).await?;
                (category, phones)
            }
            None => (None, Vec::new()),
        };

        Ok(SuggestionDetails {
            suggestion,
            business,
            category,
            phones,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn intake() -> SuggestionInput {
        SuggestionInput {
            name: "Jo".to_string(),
            email: "jo@mail.com".to_string(),
            is_owner: false,
            business: SuggestionBusinessInput {
                name: "Gracia Afrika".to_string(),
                description: String::new(),
                website: String::new(),
                email: String::new(),
                category_id: 42,
                phones: vec![SuggestionPhoneInput {
                    number: "514-111-1111".to_string(),
                    phone_type: phone::PhoneType::Tel,
                    extension: None,
                }],
            },
        }
    }

    #[tokio::test]
    async fn unknown_category_aborts_without_writing_anything() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );
        let service = SuggestionService::new(db.clone());

        let err = service.create(intake()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Unknown category"));

        drop(service);
        let db = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("INSERT"), "no row may be written: {log}");
    }

    #[tokio::test]
    async fn invalid_phone_number_fails_before_touching_the_database() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SuggestionService::new(db.clone());

        let mut input = intake();
        input.business.phones[0].number = "12345".to_string();

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        drop(service);
        let db = Arc::try_unwrap(db).ok().unwrap();
        assert!(db.into_transaction_log().is_empty());
    }
}
