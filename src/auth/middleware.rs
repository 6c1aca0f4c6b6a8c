use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthenticatedUser, JwtService};

/// Resolves an optional bearer token into `Option<AuthenticatedUser>` for
/// every request. Public endpoints ignore it; moderation handlers check it
/// through `require_auth`.
pub async fn optional_auth_middleware(
    State(jwt_service): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let user = auth_header
        .and_then(|token| jwt_service.verify_token(token).ok())
        .map(AuthenticatedUser::from);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
