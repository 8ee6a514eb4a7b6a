//! HTTP API for the CareLink dashboard backend.
//!
//! The surface is a versioned REST API (Axum) mounted under `/api/v1`,
//! plus an unversioned health endpoint. Every `/api/v1` route group is
//! wrapped in a [`RequireAccessLayer`] carrying that group's access
//! requirement; the authentication layer resolves bearer tokens into an
//! `AuthContext` before the guard runs.

mod handlers;
pub mod v1;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::access::registry::NavigationRegistry;
use crate::access::session::SessionStore;
use crate::middleware::auth::{AuthConfig, AuthLayer};
use crate::store::CareStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CareStore>,
    pub registry: Arc<NavigationRegistry>,
    pub sessions: Arc<dyn SessionStore>,
}

/// Build the API router.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState { store, registry, sessions };
/// let app = build_router(state, auth_config);
/// ```
pub fn build_router(state: AppState, auth_config: AuthConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Unversioned endpoints
        .route("/health", get(handlers::health_check))
        // V1 API (stable)
        .nest("/api/v1", v1::routes::v1_router(state.sessions.clone()))
        // Middleware. AuthLayer is outermost so the guard sees AuthContext.
        .layer(AuthLayer::new(auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Standard API response wrapper.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_code: None,
        }
    }

    pub fn error_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_code: Some(code.into()),
        }
    }

    pub fn from_care_error(err: &crate::error::CareError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.user_message().to_string()),
            error_code: Some(err.code().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("test error");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("test error".to_string()));
    }

    #[test]
    fn test_api_response_from_care_error() {
        let err = crate::error::CareError::validation("bad input");
        let response: ApiResponse<()> = ApiResponse::from_care_error(&err);
        assert!(!response.success);
        assert_eq!(response.error_code, Some("ValidationError".to_string()));
    }
}
