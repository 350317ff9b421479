use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::AuthError;
use crate::api::state::AppState;
use crate::auth::jwt::{verify_token, Claims, Role};

/// JWT authentication extractor for protected routes
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(auth: JwtAuth) -> Result<String, ApiError> {
///     auth.require_employee()?;
///     Ok(format!("Hello user {}", auth.0.sub))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl JwtAuth {
    /// Rejects callers that are not employees with 403
    pub fn require_employee(&self) -> Result<(), AuthError> {
        match self.0.role {
            Role::Employee => Ok(()),
            Role::Parent => Err(AuthError::forbidden("Only employees may perform this action")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for JwtAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let claims = verify_token(token, &state.jwt_secret)
            .map_err(|e| AuthError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(JwtAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::auth::jwt::create_token;
    use crate::infrastructure::repositories::MemoryStore;

    const SECRET: &str = "extractor-test-secret";

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), SECRET)
    }

    async fn extract(header: Option<&str>) -> Result<JwtAuth, AuthError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let state = state();
        let result = JwtAuth::from_request_parts(&mut parts, &state).await;
        result
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.reason, "Missing authorization header");
    }

    #[tokio::test]
    async fn non_bearer_rejected() {
        let err = extract(Some("Basic abc")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_token_rejected() {
        let err = extract(Some("Bearer not-a-jwt")).await.unwrap_err();
        assert!(err.reason.starts_with("Invalid token"));
    }

    #[tokio::test]
    async fn valid_token_accepted() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, Role::Parent, SECRET).unwrap();

        let auth = extract(Some(&format!("Bearer {}", token))).await.unwrap();
        assert_eq!(auth.0.sub, user_id);
        assert_eq!(
            auth.require_employee().unwrap_err().status(),
            StatusCode::FORBIDDEN
        );
    }
}
