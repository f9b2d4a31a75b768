use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Auth("Invalid authorization header format".to_string())),
    }
}

/// Decodes the bearer token into a [`User`] and stores it in the request
/// extensions. Revoked tokens are rejected.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;

    let user = validate_token(&token, &state.config.jwt_secret)?;

    if state.revoked_tokens.is_revoked(&user.token_id).await {
        return Err(AppError::Auth("Token has been revoked".to_string()));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Rejects authenticated users whose token was issued for another panel.
/// Must sit inside `auth_middleware`.
pub async fn role_guard(
    State(role): State<Role>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    extract_user(&request)?.require_role(role)?;
    Ok(next.run(request).await)
}

pub fn extract_user<B>(request: &Request<B>) -> Result<User, AppError> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::test_utils::{JwtTestUtils, TestConfig, TestUser};

    fn protected_app(state: AppState, role: Role) -> Router {
        Router::new()
            .route("/me", get(|Extension(user): Extension<User>| async move { user.id }))
            .route_layer(middleware::from_fn_with_state(role, role_guard))
            .route_layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request_with(token: &str) -> Request<Body> {
        Request::builder()
            .uri("/me")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Token abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_matching_role_passes_through() {
        let config = TestConfig::default();
        let state = config.to_state();
        let user = TestUser::doctor("doc@example.com");
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        let response = protected_app(state, Role::Doctor)
            .oneshot(request_with(&token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_role_is_forbidden() {
        let config = TestConfig::default();
        let state = config.to_state();
        let user = TestUser::patient("p@example.com");
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        let response = protected_app(state, Role::Admin)
            .oneshot(request_with(&token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_revoked_token_is_unauthorized() {
        let config = TestConfig::default();
        let state = config.to_state();
        let user = TestUser::patient("p@example.com");
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        let decoded = validate_token(&token, &config.jwt_secret).unwrap();
        state
            .revoked_tokens
            .revoke(&decoded.token_id, decoded.expires_at)
            .await;

        let response = protected_app(state, Role::Patient)
            .oneshot(request_with(&token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
