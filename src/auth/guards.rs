use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// Authorization guard for handlers that mutate moderated state.
pub fn require_auth(user: &Option<AuthenticatedUser>) -> Result<&AuthenticatedUser, ApiError> {
    user.as_ref().ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_user_is_unauthorized() {
        assert!(matches!(require_auth(&None), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn present_user_passes_through() {
        let user = Some(AuthenticatedUser {
            id: 1,
            email: "jojo@mail.com".into(),
        });
        assert_eq!(require_auth(&user).unwrap().id, 1);
    }
}
