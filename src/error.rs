use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

/// Request-level error taxonomy. Every variant maps to one HTTP status and a
/// `{message, code}` JSON body; nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A field failed validation. The message is flattened as `field: message`.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Database(err) => {
                warn!("database error: {}", err);
                "internal server error".to_string()
            }
            ApiError::Internal(reason) => {
                warn!("internal error: {}", reason);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(serde_json::json!({
                "message": message,
                "code": status.as_u16(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_flattened_with_field_path() {
        let err = ApiError::validation("parent", "category depth limit exceeded");
        assert_eq!(err.to_string(), "parent: category depth limit exceeded");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError::NotFound("business").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn credentials_map_to_401() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
    }
}
