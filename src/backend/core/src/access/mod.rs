//! Role-scoped navigation and route guarding.
//!
//! This module provides:
//! - **Model**: closed role/subtype enums, permission sets, and the
//!   access-check [`Subject`](model::Subject)
//! - **Registry**: the ordered, immutable navigation table
//! - **Filter**: the pure function selecting the visible subset of the
//!   registry for a subject
//! - **Guard**: the per-route decision tree (loading, unauthenticated,
//!   denied, allowed) with the Platform override and the basic-permission
//!   allow-list
//! - **Middleware**: the tower layer enforcing a guard requirement at the
//!   HTTP boundary
//! - **Session**: storage for the post-login intended destination
//!
//! # Usage
//!
//! ```rust,ignore
//! use carelink_core::access::{
//!     filter_navigation, evaluate, AccessRequirement, NavigationRegistry,
//! };
//!
//! let registry = NavigationRegistry::standard();
//! let visible = filter_navigation(&registry, &subject);
//!
//! let outcome = evaluate(
//!     &AuthState::Authenticated(subject),
//!     &AccessRequirement::permission("pharmacy_manage"),
//!     "/dashboard/pharmacy-orders",
//! );
//! ```

pub mod filter;
pub mod guard;
pub mod middleware;
pub mod model;
pub mod registry;
pub mod session;

pub use filter::{entry_visible, filter_navigation};
pub use guard::{
    evaluate, AccessDenial, AccessRequirement, AuthState, DenialReason, GuardOutcome,
    BASIC_ACCESS_PERMISSIONS, DASHBOARD_ROOT, LOGIN_PATH,
};
pub use middleware::{AccessContext, RequireAccessLayer, RequireAccessService};
pub use model::{
    permissions, ParentEntityType, PermissionSet, ProviderType, Role, StaffType, Subject,
};
pub use registry::{NavigationEntry, NavigationRegistry};
pub use session::{InMemorySessionStore, SessionStore, INTENDED_DESTINATION_KEY};
