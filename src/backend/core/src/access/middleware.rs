//! Axum middleware that enforces an [`AccessRequirement`] on requests.
//!
//! The layer reads the `AuthContext` injected by the authentication
//! middleware, runs the route guard, and either forwards the request with
//! an [`AccessContext`] attached, redirects to login (persisting the
//! intended destination), or responds with the access-denied payload.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use metrics::counter;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

use super::guard::{self, AccessDenial, AccessRequirement, AuthState, GuardOutcome, LOGIN_PATH};
use super::model::Subject;
use super::session::SessionStore;
use crate::middleware::auth::AuthContext;

/// Header carrying the caller's session id, used to key the
/// intended-destination store for anonymous redirects.
pub const SESSION_HEADER: &str = "x-session-id";

// ═══════════════════════════════════════════════════════════════════════════════
// Access Context (extracted in handlers)
// ═══════════════════════════════════════════════════════════════════════════════

/// Guard-resolved context available to downstream handlers.
///
/// Inserted into request extensions once the guard allows the request, so
/// handlers can read the verified subject without re-evaluating.
#[derive(Debug, Clone)]
pub struct AccessContext {
    /// The authenticated subject.
    pub subject: Subject,
    /// The requirement that was checked for this route.
    pub checked_requirement: AccessRequirement,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AccessContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessContext>()
            .cloned()
            .ok_or_else(|| {
                let body = serde_json::json!({
                    "success": false,
                    "error": {
                        "code": "MISSING_ACCESS_CONTEXT",
                        "message": "Access context not available. Ensure the guard middleware is applied.",
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer
// ═══════════════════════════════════════════════════════════════════════════════

/// Layer that wraps services with route-guard enforcement.
///
/// # Example
///
/// ```rust,ignore
/// use carelink_core::access::{AccessRequirement, RequireAccessLayer};
///
/// let app = Router::new()
///     .route("/api/v1/pharmacy-orders", get(list_pharmacy_orders))
///     .layer(RequireAccessLayer::new(
///         AccessRequirement::permission("pharmacy_manage"),
///         sessions.clone(),
///     ));
/// ```
#[derive(Clone)]
pub struct RequireAccessLayer {
    requirement: AccessRequirement,
    sessions: Arc<dyn SessionStore>,
}

impl RequireAccessLayer {
    pub fn new(requirement: AccessRequirement, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            requirement,
            sessions,
        }
    }

    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }
}

impl<S> Layer<S> for RequireAccessLayer {
    type Service = RequireAccessService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAccessService {
            inner,
            requirement: self.requirement.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Service that runs the route guard per request.
#[derive(Clone)]
pub struct RequireAccessService<S> {
    inner: S,
    requirement: AccessRequirement,
    sessions: Arc<dyn SessionStore>,
}

impl<S> Service<Request<Body>> for RequireAccessService<S>
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
        let requirement = self.requirement.clone();
        let sessions = self.sessions.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let state = match request.extensions().get::<AuthContext>() {
                Some(ctx) => match &ctx.subject {
                    Some(subject) => AuthState::Authenticated(subject.clone()),
                    None => AuthState::Anonymous,
                },
                // Auth middleware not applied; treat as anonymous.
                None => AuthState::Anonymous,
            };

            let requested_path = request.uri().path().to_string();

            match guard::evaluate(&state, &requirement, &requested_path) {
                GuardOutcome::Allowed => {
                    // The guard only allows authenticated subjects.
                    let AuthState::Authenticated(subject) = state else {
                        return Ok(unauthenticated_response(&requested_path));
                    };
                    request.extensions_mut().insert(AccessContext {
                        subject,
                        checked_requirement: requirement,
                    });
                    inner.call(request).await
                }
                GuardOutcome::Unauthenticated { intended } => {
                    if let Some(session_id) = request
                        .headers()
                        .get(SESSION_HEADER)
                        .and_then(|v| v.to_str().ok())
                    {
                        sessions.set_intended_destination(session_id, &intended);
                    }
                    counter!("guard_unauthenticated_total").increment(1);
                    Ok(unauthenticated_response(&intended))
                }
                GuardOutcome::Denied(denial) => {
                    warn!(
                        path = %requested_path,
                        actual_role = %denial.actual_role,
                        reason = %denial.message,
                        "Access denied"
                    );
                    counter!("guard_denied_total").increment(1);
                    Ok(denied_response(&denial))
                }
                // The HTTP layer never sees an in-flight identity: a request
                // either carries credentials or it does not.
                GuardOutcome::Loading => Ok(unauthenticated_response(&requested_path)),
            }
        })
    }
}

/// Build the 401 response pointing the caller at the login route.
fn unauthenticated_response(intended: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": {
            "code": "UNAUTHENTICATED",
            "message": "Sign in to continue",
            "redirect_to": LOGIN_PATH,
            "intended_destination": intended,
        }
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Build the 403 access-denied panel payload.
fn denied_response(denial: &AccessDenial) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": {
            "code": "ACCESS_DENIED",
            "message": denial.message,
            "denial": denial,
        }
    });
    (StatusCode::FORBIDDEN, Json(body)).into_response()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::model::{permissions, Role};
    use crate::access::session::InMemorySessionStore;

    #[test]
    fn test_layer_holds_requirement() {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let layer = RequireAccessLayer::new(
            AccessRequirement::permission(permissions::PHARMACY_MANAGE),
            sessions,
        );
        assert_eq!(
            layer.requirement().required_permission.as_deref(),
            Some(permissions::PHARMACY_MANAGE)
        );
    }

    #[test]
    fn test_access_context_carries_subject() {
        let ctx = AccessContext {
            subject: Subject::new(Role::Staff, Default::default()),
            checked_requirement: AccessRequirement::any_role([Role::Staff]),
        };
        assert_eq!(ctx.subject.role, Role::Staff);
        assert_eq!(ctx.checked_requirement.allowed_roles, vec![Role::Staff]);
    }
}
