//! Integration tests for the HTTP API.
//!
//! Tests cover:
//! - Health check endpoint
//! - Authentication (missing, invalid, and valid bearer tokens)
//! - Route guarding (401 redirect payloads, 403 denial payloads,
//!   Platform override, basic allow-list boundaries)
//! - Navigation filtering per caller
//! - CRUD flows and validation errors on the clinical collections
//! - Intended-destination persistence for anonymous requests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use carelink_core::access::model::{permissions, ProviderType, Role, StaffType};
use carelink_core::access::registry::NavigationRegistry;
use carelink_core::access::session::InMemorySessionStore;
use carelink_core::api::{build_router, AppState};
use carelink_core::middleware::auth::{issue_token, AuthConfig, Claims};
use carelink_core::store::MockStore;

const TEST_SECRET: &str = "carelink-test-secret";

fn test_app() -> Router {
    let state = AppState {
        store: Arc::new(MockStore::for_tests()),
        registry: Arc::new(NavigationRegistry::standard()),
        sessions: Arc::new(InMemorySessionStore::new()),
    };
    build_router(state, AuthConfig::new(TEST_SECRET))
}

fn token_for(claims: &Claims) -> String {
    issue_token(&AuthConfig::new(TEST_SECRET), claims).unwrap()
}

fn claims(role: Role, perms: &[&str]) -> Claims {
    Claims::new(
        "test-user",
        role,
        perms.iter().map(|p| p.to_string()).collect(),
        chrono::Duration::hours(1),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(test_app(), get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_returns_login_redirect() {
    let (status, body) = send(test_app(), get("/api/v1/navigation", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(body["error"]["redirect_to"], "/login");
    assert_eq!(body["error"]["intended_destination"], "/api/v1/navigation");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (status, body) = send(test_app(), get("/api/v1/navigation", Some("garbage"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let other = AuthConfig::new("some-other-secret");
    let token = issue_token(&other, &claims(Role::Platform, &[])).unwrap();

    let (status, body) = send(test_app(), get("/api/v1/navigation", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

// ============================================================================
// Navigation
// ============================================================================

#[tokio::test]
async fn test_client_navigation_is_minimal() {
    let token = token_for(&claims(Role::Client, &[]));
    let (status, body) = send(test_app(), get("/api/v1/navigation", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let hrefs: Vec<&str> = body["data"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["href"].as_str().unwrap())
        .collect();
    assert_eq!(hrefs, vec!["/dashboard", "/dashboard/settings"]);
}

#[tokio::test]
async fn test_pharmacy_provider_navigation() {
    let token = token_for(
        &claims(Role::Provider, &[permissions::PHARMACY_MANAGE])
            .with_provider_type(ProviderType::Pharmacy),
    );
    let (status, body) = send(test_app(), get("/api/v1/navigation", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    let hrefs: Vec<&str> = body["data"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["href"].as_str().unwrap())
        .collect();
    assert!(hrefs.contains(&"/dashboard/pharmacy-orders"));
    assert!(!hrefs.contains(&"/dashboard/platform"));
}

#[tokio::test]
async fn test_all_sentinel_sees_full_registry() {
    let token = token_for(&claims(Role::Platform, &[permissions::ALL]));
    let (status, body) = send(test_app(), get("/api/v1/navigation", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    let count = body["data"]["entries"].as_array().unwrap().len();
    assert_eq!(count, NavigationRegistry::standard().len());
}

// ============================================================================
// Route Guarding
// ============================================================================

#[tokio::test]
async fn test_missing_permission_returns_denial_payload() {
    let token = token_for(
        &claims(Role::Staff, &[permissions::VIEW_REPORTS]).with_staff_type(StaffType::Support),
    );
    let (status, body) = send(test_app(), get("/api/v1/pharmacy-orders", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACCESS_DENIED");
    assert_eq!(body["error"]["denial"]["actual_role"], "staff");
    assert_eq!(body["error"]["denial"]["recovery_href"], "/dashboard");
    assert_eq!(
        body["error"]["denial"]["held_permissions"],
        json!([permissions::VIEW_REPORTS])
    );
}

#[tokio::test]
async fn test_platform_override_opens_permission_guarded_route() {
    let token = token_for(&claims(Role::Platform, &[]));
    let (status, _) = send(test_app(), get("/api/v1/pharmacy-orders", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_basic_allow_list_does_not_cover_medical_records() {
    // The caller holds every basic permission, but patients_read is the
    // stricter token guarding medical records.
    let token = token_for(&claims(
        Role::Staff,
        &[
            permissions::DASHBOARD_ACCESS,
            permissions::VIEW_PATIENTS,
            permissions::VIEW_REPORTS,
            permissions::BASIC_BILLING,
        ],
    ));
    let (status, body) = send(test_app(), get("/api/v1/medical-records", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_patients_read_opens_medical_records() {
    let token = token_for(&claims(Role::Staff, &[permissions::PATIENTS_READ]));
    let (status, _) = send(test_app(), get("/api/v1/medical-records", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Intended destination
// ============================================================================

#[tokio::test]
async fn test_anonymous_request_persists_intended_destination() {
    let sessions = Arc::new(InMemorySessionStore::new());
    let state = AppState {
        store: Arc::new(MockStore::for_tests()),
        registry: Arc::new(NavigationRegistry::standard()),
        sessions: sessions.clone(),
    };
    let app = build_router(state, AuthConfig::new(TEST_SECRET));

    let request = Request::builder()
        .uri("/api/v1/lab-orders")
        .header("x-session-id", "sess-42")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // After login the session consumes the stored path.
    let token = token_for(&claims(Role::Client, &[]));
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/session/intended-destination")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header("x-session-id", "sess-42")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["intended_destination"], "/api/v1/lab-orders");

    // Consumed on read.
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/session/intended-destination")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header("x-session-id", "sess-42")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(app, request).await;
    assert!(body["data"]["intended_destination"].is_null());
}

// ============================================================================
// CRUD flows
// ============================================================================

#[tokio::test]
async fn test_pharmacy_order_crud_flow() {
    let app = test_app();
    let token = token_for(&claims(Role::Provider, &[permissions::PHARMACY_MANAGE]));

    // Create
    let (status, body) = send(
        app.clone(),
        post_json(
            "/api/v1/pharmacy-orders",
            Some(&token),
            &json!({
                "patient_name": "Dana Whitfield",
                "medication": "Atorvastatin 20mg",
                "quantity": 28
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Read back
    let (status, body) = send(
        app.clone(),
        get(&format!("/api/v1/pharmacy-orders/{}", id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["medication"], "Atorvastatin 20mg");

    // Update status
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/v1/pharmacy-orders/{}", id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"status": "processing"}).to_string()))
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "processing");

    // Delete
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/pharmacy-orders/{}", id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Gone
    let (status, body) = send(
        app,
        get(&format!("/api/v1/pharmacy-orders/{}", id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let token = token_for(&claims(Role::Provider, &[permissions::PHARMACY_MANAGE]));
    let (status, body) = send(
        test_app(),
        post_json(
            "/api/v1/pharmacy-orders",
            Some(&token),
            &json!({
                "patient_name": "Dana Whitfield",
                "medication": "Atorvastatin 20mg",
                "quantity": 0
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_invalid_status_transition_conflicts() {
    let app = test_app();
    let token = token_for(&claims(Role::Provider, &[permissions::LAB_MANAGE]));

    let (status, body) = send(
        app.clone(),
        post_json(
            "/api/v1/lab-orders",
            Some(&token),
            &json!({
                "patient_name": "Elena Vasquez",
                "test_name": "Lipid panel"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Ordered cannot jump straight to result_ready.
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/v1/lab-orders/{}", id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"status": "result_ready"}).to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATUS_TRANSITION");
}

#[tokio::test]
async fn test_consultation_requires_its_permission_not_pharmacy() {
    // pharmacy_manage does not open the consultations group.
    let token = token_for(&claims(Role::Provider, &[permissions::PHARMACY_MANAGE]));
    let (status, _) = send(test_app(), get("/api/v1/consultations", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
