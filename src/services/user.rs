use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::auth::JwtService;
use crate::entities::{prelude::*, user};
use crate::error::ApiError;

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    jwt_service: JwtService,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, jwt_service: JwtService) -> Self {
        Self { db, jwt_service }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<user::Model, ApiError> {
        if User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ApiError::validation(
                "email",
                "a user with this email already exists",
            ));
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

        let new_user = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            is_staff: Set(false),
            is_active: Set(true),
            date_joined: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(new_user.insert(&*self.db).await?)
    }

    /// Verify credentials and issue a bearer token. Wrong email and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(user::Model, String), ApiError> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let matches = verify(password, &user.password_hash)
            .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))?;
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(ApiError::BadRequest("this user has been deactivated".to_string()));
        }

        let token = self
            .jwt_service
            .generate_token(user.id, &user.email)
            .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;

        Ok((user, token))
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, ApiError> {
        Ok(User::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn find_user_by_id(&self, user_id: i32) -> Result<Option<user::Model>, ApiError> {
        Ok(User::find_by_id(user_id).one(&*self.db).await?)
    }
}
