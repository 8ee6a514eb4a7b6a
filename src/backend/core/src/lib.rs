#![allow(clippy::result_large_err)]
//! # CareLink Core
//!
//! Backend for a multi-tenant healthcare administration dashboard.
//!
//! ## Architecture
//!
//! - **Access**: role-scoped navigation filtering and per-route guarding
//!   with a Platform override and a basic-permission allow-list
//! - **Middleware**: JWT authentication resolving bearer tokens into the
//!   access-check subject
//! - **Store**: async data access behind the `CareStore` capability trait,
//!   backed today by an in-memory mock with latency and failure injection
//! - **API**: versioned REST surface where every route group carries the
//!   same access requirement as its navigation entry
//! - **Observability**: structured logging and error metrics

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod store;

pub use error::{CareError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::access::{
        entry_visible, evaluate, filter_navigation, AccessContext, AccessDenial,
        AccessRequirement, AuthState, DenialReason, GuardOutcome, NavigationEntry,
        NavigationRegistry, ParentEntityType, PermissionSet, ProviderType, RequireAccessLayer,
        Role, StaffType, Subject, BASIC_ACCESS_PERMISSIONS, DASHBOARD_ROOT, LOGIN_PATH,
    };
    pub use crate::access::session::{InMemorySessionStore, SessionStore};
    pub use crate::api::{ApiResponse, AppState};
    pub use crate::error::{
        CareError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result,
    };
    pub use crate::middleware::auth::{
        issue_token, verify_token, AuthConfig, AuthContext, AuthLayer, Claims,
    };
    pub use crate::store::{models, CareStore, MockStore};
}
