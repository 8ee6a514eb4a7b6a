//! HTTP middleware for the CareLink backend.
pub mod auth;

pub use auth::{
    issue_token, verify_token, AuthConfig, AuthContext, AuthError, AuthLayer, AuthService, Claims,
};
