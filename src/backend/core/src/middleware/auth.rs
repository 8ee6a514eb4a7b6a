//! Authentication middleware: the identity collaborator consumed by the
//! route guard and the access filter.
//!
//! Validates JWT bearer tokens and injects an [`AuthContext`] into request
//! extensions. A request without credentials is forwarded as anonymous;
//! the route guard decides what anonymity means for each route. A request
//! with bad credentials is rejected here.
//!
//! # Example
//!
//! ```rust,ignore
//! use carelink_core::middleware::auth::{AuthLayer, AuthConfig};
//!
//! let config = AuthConfig::new("your-secret-key");
//!
//! let app = Router::new()
//!     .route("/api/v1/navigation", get(get_navigation))
//!     .layer(AuthLayer::new(config));
//! ```

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use futures::future::BoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::task::{Context, Poll};
use thiserror::Error;
use tower::{Layer, Service};
use tracing::debug;
use uuid::Uuid;

use crate::access::model::{ParentEntityType, ProviderType, Role, StaffType, Subject};

// ═══════════════════════════════════════════════════════════════════════════════
// Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token encoding error: {0}")]
    Encoding(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The provided token is invalid",
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "The authentication token has expired",
            ),
            Self::Encoding(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An authentication error occurred",
            ),
        };

        counter!(
            "auth_errors_total",
            "error_type" => code.to_string()
        )
        .increment(1);

        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JWT Claims
// ═══════════════════════════════════════════════════════════════════════════════

/// JWT token claims carrying the access-check identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Top-level role
    pub role: Role,

    /// Permission tokens held by this user
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Staff subtype; present only for staff users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_type: Option<StaffType>,

    /// Provider subtype; present only for provider users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,

    /// Parent entity kind; present only for staff users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_entity_type: Option<ParentEntityType>,

    /// Token ID for revocation tracking
    #[serde(default = "generate_jti")]
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

fn generate_jti() -> String {
    Uuid::new_v4().to_string()
}

impl Claims {
    /// Create new claims for a user.
    pub fn new(
        user_id: impl Into<String>,
        role: Role,
        permissions: Vec<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            role,
            permissions,
            staff_type: None,
            provider_type: None,
            parent_entity_type: None,
            jti: generate_jti(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn with_staff_type(mut self, staff_type: StaffType) -> Self {
        self.staff_type = Some(staff_type);
        self
    }

    pub fn with_provider_type(mut self, provider_type: ProviderType) -> Self {
        self.provider_type = Some(provider_type);
        self
    }

    pub fn with_parent_entity_type(mut self, parent_entity_type: ParentEntityType) -> Self {
        self.parent_entity_type = Some(parent_entity_type);
        self
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Project these claims into the access-check subject.
    pub fn subject(&self) -> Subject {
        let mut subject = Subject::new(self.role, self.permissions.iter().cloned().collect());
        if let Some(st) = self.staff_type {
            subject = subject.with_staff_type(st);
        }
        if let Some(pt) = self.provider_type {
            subject = subject.with_provider_type(pt);
        }
        if let Some(pe) = self.parent_entity_type {
            subject = subject.with_parent_entity_type(pe);
        }
        subject
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration and token helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 signing.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(8),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Sign claims into a compact JWT.
pub fn issue_token(config: &AuthConfig, claims: &Claims) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::Encoding(e.to_string()))
}

/// Validate a compact JWT and return its claims.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Auth Context
// ═══════════════════════════════════════════════════════════════════════════════

/// Identity resolved for the current request.
///
/// `subject` is `None` for anonymous requests; the route guard translates
/// that into a login redirect where authentication is required.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Option<String>,
    pub subject: Option<Subject>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            subject: None,
        }
    }

    pub fn authenticated(user_id: impl Into<String>, subject: Subject) -> Self {
        Self {
            user_id: Some(user_id.into()),
            subject: Some(subject),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                let body = serde_json::json!({
                    "success": false,
                    "error": {
                        "code": "MISSING_AUTH_CONTEXT",
                        "message": "Authentication context not available. Ensure the auth middleware is applied.",
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer and Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Layer that resolves bearer tokens into an [`AuthContext`].
#[derive(Clone)]
pub struct AuthLayer {
    config: AuthConfig,
}

impl AuthLayer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service resolving the Authorization header per request.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    config: AuthConfig,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string);

            let ctx = match bearer {
                None => AuthContext::anonymous(),
                Some(token) => match verify_token(&config, &token) {
                    Ok(claims) => {
                        debug!(user_id = %claims.sub, role = %claims.role, "Authenticated request");
                        AuthContext::authenticated(claims.sub.clone(), claims.subject())
                    }
                    Err(err) => return Ok(err.into_response()),
                },
            };

            request.extensions_mut().insert(ctx);
            inner.call(request).await
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
