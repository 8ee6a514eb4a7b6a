//! The route guard: decides whether a request may reach protected content.
//!
//! The guard evaluates authentication state and a per-route
//! [`AccessRequirement`] into a [`GuardOutcome`]. Evaluation is synchronous
//! and re-run for every request; it carries no state of its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::model::{permissions, Role, Subject};

/// Where a denied or unauthenticated user is sent to recover.
pub const DASHBOARD_ROOT: &str = "/dashboard";
/// Login route used for unauthenticated redirects.
pub const LOGIN_PATH: &str = "/login";

/// Permission tokens that pass the guard's permission check even when the
/// subject does not hold them: basic operations every authenticated user may
/// perform.
///
/// Note: this allow-list is intentionally independent of the navigation
/// registry's `required_permissions`. The two permission models have
/// drifted in the platform's history; they are kept separate on purpose
/// rather than silently unified.
pub const BASIC_ACCESS_PERMISSIONS: &[&str] = &[
    permissions::DASHBOARD_ACCESS,
    permissions::VIEW_PATIENTS,
    permissions::VIEW_REPORTS,
    permissions::BASIC_BILLING,
];

// ═══════════════════════════════════════════════════════════════════════════════
// Requirement
// ═══════════════════════════════════════════════════════════════════════════════

/// A route's guard configuration.
///
/// Checks are evaluated in order: single required role, multiple allowed
/// roles, single required permission. Empty requirement admits any
/// authenticated subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessRequirement {
    /// Exact role the subject must hold. No override applies here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
    /// Roles of which the subject must hold one; Platform always passes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_roles: Vec<Role>,
    /// Permission the subject must hold, unless it is Platform or the
    /// token is in [`BASIC_ACCESS_PERMISSIONS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
}

impl AccessRequirement {
    /// Any authenticated subject.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Require exactly `role`.
    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
            ..Self::default()
        }
    }

    /// Require one of `roles`.
    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Require `token`.
    pub fn permission(token: impl Into<String>) -> Self {
        Self {
            required_permission: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_permission(mut self, token: impl Into<String>) -> Self {
        self.required_permission = Some(token.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authentication state
// ═══════════════════════════════════════════════════════════════════════════════

/// What the authentication collaborator has resolved so far.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Identity resolution still in flight.
    Resolving,
    /// Resolution finished with no user.
    Anonymous,
    /// Resolution finished with a subject.
    Authenticated(Subject),
}

// ═══════════════════════════════════════════════════════════════════════════════
// Outcome
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a subject was denied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// A single required role was not held.
    RoleRequired { required: Role, actual: Role },
    /// None of the allowed roles were held.
    RoleNotAllowed { allowed: Vec<Role>, actual: Role },
    /// The required permission was not held.
    PermissionRequired { required: String, actual: Role },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoleRequired { required, actual } => write!(
                f,
                "this area requires the {} role; your role is {}",
                required, actual
            ),
            Self::RoleNotAllowed { allowed, actual } => {
                let roles: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                write!(
                    f,
                    "this area is limited to roles [{}]; your role is {}",
                    roles.join(", "),
                    actual
                )
            }
            Self::PermissionRequired { required, actual } => write!(
                f,
                "this area requires the '{}' permission, which your {} account does not hold",
                required, actual
            ),
        }
    }
}

/// The fixed access-denied panel payload: the unmet requirement, the
/// subject's actual context, and a single recovery action. Terminal for the
/// request; never auto-redirects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessDenial {
    pub reason: DenialReason,
    pub message: String,
    pub actual_role: Role,
    pub held_permissions: Vec<String>,
    /// Single recovery action: navigate back to the dashboard root.
    pub recovery_href: String,
}

impl AccessDenial {
    fn new(reason: DenialReason, subject: &Subject) -> Self {
        let message = reason.to_string();
        let mut held: Vec<String> = subject.permissions.iter().map(str::to_string).collect();
        held.sort();
        Self {
            reason,
            message,
            actual_role: subject.role,
            held_permissions: held,
            recovery_href: DASHBOARD_ROOT.to_string(),
        }
    }
}

/// Terminal guard decision for one render/request pass.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Identity not yet resolved; render a loading indicator only.
    Loading,
    /// No user; persist the intended destination and send to login.
    Unauthenticated { intended: String },
    /// Requirement unmet; render the access-denied panel.
    Denied(AccessDenial),
    /// Render protected content unmodified.
    Allowed,
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// Evaluate the guard for one request.
///
/// `requested_path` is carried into the `Unauthenticated` outcome so the
/// caller can persist it for the post-login redirect.
pub fn evaluate(
    state: &AuthState,
    requirement: &AccessRequirement,
    requested_path: &str,
) -> GuardOutcome {
    let subject = match state {
        AuthState::Resolving => return GuardOutcome::Loading,
        AuthState::Anonymous => {
            return GuardOutcome::Unauthenticated {
                intended: requested_path.to_string(),
            }
        }
        AuthState::Authenticated(subject) => subject,
    };

    // The "all" sentinel authorizes unconditionally.
    if subject.permissions.grants_all() {
        return GuardOutcome::Allowed;
    }

    // Single required role. No Platform override on this check.
    if let Some(required) = requirement.required_role {
        if subject.role != required {
            debug!(required = %required, actual = %subject.role, "guard: required role unmet");
            return GuardOutcome::Denied(AccessDenial::new(
                DenialReason::RoleRequired {
                    required,
                    actual: subject.role,
                },
                subject,
            ));
        }
    }

    // Multiple allowed roles; Platform always passes this check.
    if !requirement.allowed_roles.is_empty()
        && !requirement.allowed_roles.contains(&subject.role)
    {
        if subject.role == Role::Platform {
            return GuardOutcome::Allowed;
        }
        debug!(actual = %subject.role, "guard: role not in allowed set");
        return GuardOutcome::Denied(AccessDenial::new(
            DenialReason::RoleNotAllowed {
                allowed: requirement.allowed_roles.clone(),
                actual: subject.role,
            },
            subject,
        ));
    }

    // Required permission; Platform and the basic allow-list both pass.
    if let Some(token) = &requirement.required_permission {
        let held = subject.permissions.has(token);
        let basic = BASIC_ACCESS_PERMISSIONS.contains(&token.as_str());
        if !held && subject.role != Role::Platform && !basic {
            debug!(permission = %token, actual = %subject.role, "guard: permission unmet");
            return GuardOutcome::Denied(AccessDenial::new(
                DenialReason::PermissionRequired {
                    required: token.clone(),
                    actual: subject.role,
                },
                subject,
            ));
        }
    }

    GuardOutcome::Allowed
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::model::PermissionSet;

    fn subject(role: Role, perms: &[&str]) -> Subject {
        Subject::new(role, perms.iter().copied().collect())
    }

    fn authed(role: Role, perms: &[&str]) -> AuthState {
        AuthState::Authenticated(subject(role, perms))
    }

    #[test]
    fn test_loading_while_resolving() {
        let outcome = evaluate(
            &AuthState::Resolving,
            &AccessRequirement::authenticated(),
            "/dashboard/billing",
        );
        assert_eq!(outcome, GuardOutcome::Loading);
    }

    #[test]
    fn test_anonymous_carries_intended_path() {
        let outcome = evaluate(
            &AuthState::Anonymous,
            &AccessRequirement::authenticated(),
            "/dashboard/lab-orders",
        );
        assert_eq!(
            outcome,
            GuardOutcome::Unauthenticated {
                intended: "/dashboard/lab-orders".to_string()
            }
        );
    }

    #[test]
    fn test_empty_requirement_admits_any_authenticated_subject() {
        for role in Role::all() {
            let outcome = evaluate(
                &authed(role, &[]),
                &AccessRequirement::authenticated(),
                "/dashboard",
            );
            assert!(outcome.is_allowed());
        }
    }

    #[test]
    fn test_required_role_mismatch_denies_with_context() {
        let outcome = evaluate(
            &authed(Role::Provider, &[]),
            &AccessRequirement::role(Role::Staff),
            "/dashboard/staff",
        );
        match outcome {
            GuardOutcome::Denied(denial) => {
                assert_eq!(
                    denial.reason,
                    DenialReason::RoleRequired {
                        required: Role::Staff,
                        actual: Role::Provider,
                    }
                );
                assert_eq!(denial.recovery_href, DASHBOARD_ROOT);
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_required_role_has_no_platform_override() {
        let outcome = evaluate(
            &authed(Role::Platform, &[]),
            &AccessRequirement::role(Role::Client),
            "/portal",
        );
        assert!(outcome.is_denied());
    }

    #[test]
    fn test_platform_overrides_allowed_roles() {
        // Platform does not hold the Staff role, yet still passes.
        let outcome = evaluate(
            &authed(Role::Platform, &[]),
            &AccessRequirement::any_role([Role::Staff]),
            "/dashboard/staff",
        );
        assert!(outcome.is_allowed());

        // A provider in the same position is denied.
        let outcome = evaluate(
            &authed(Role::Provider, &[]),
            &AccessRequirement::any_role([Role::Staff]),
            "/dashboard/staff",
        );
        assert!(outcome.is_denied());
    }

    #[test]
    fn test_permission_denied_outside_allow_list() {
        // patients_read is not in the basic allow-list.
        let outcome = evaluate(
            &authed(Role::Provider, &[]),
            &AccessRequirement::permission(permissions::PATIENTS_READ),
            "/dashboard/medical-records",
        );
        match outcome {
            GuardOutcome::Denied(denial) => {
                assert_eq!(
                    denial.reason,
                    DenialReason::PermissionRequired {
                        required: permissions::PATIENTS_READ.to_string(),
                        actual: Role::Provider,
                    }
                );
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_allow_list_passes_unheld_permission() {
        let outcome = evaluate(
            &authed(Role::Provider, &[]),
            &AccessRequirement::permission(permissions::DASHBOARD_ACCESS),
            "/dashboard",
        );
        assert!(outcome.is_allowed());
    }

    #[test]
    fn test_held_permission_passes() {
        let outcome = evaluate(
            &authed(Role::Provider, &[permissions::PATIENTS_READ]),
            &AccessRequirement::permission(permissions::PATIENTS_READ),
            "/dashboard/medical-records",
        );
        assert!(outcome.is_allowed());
    }

    #[test]
    fn test_platform_overrides_permission_check() {
        let outcome = evaluate(
            &authed(Role::Platform, &[]),
            &AccessRequirement::permission(permissions::RECORDS_MANAGE),
            "/dashboard/medical-records",
        );
        assert!(outcome.is_allowed());
    }

    #[test]
    fn test_all_sentinel_authorizes_before_role_checks() {
        let state = AuthState::Authenticated(
            Subject::new(Role::Client, [permissions::ALL].into_iter().collect::<PermissionSet>()),
        );
        let requirement = AccessRequirement {
            required_role: Some(Role::Platform),
            allowed_roles: vec![Role::Staff],
            required_permission: Some(permissions::SETTINGS_MANAGE.to_string()),
        };
        assert!(evaluate(&state, &requirement, "/anywhere").is_allowed());
    }

    #[test]
    fn test_combined_checks_run_in_order() {
        // Role check fails before the permission check is ever reached.
        let requirement = AccessRequirement::any_role([Role::Staff])
            .with_permission(permissions::BILLING_MANAGE);
        let outcome = evaluate(&authed(Role::Client, &[]), &requirement, "/dashboard/billing");
        match outcome {
            GuardOutcome::Denied(denial) => {
                assert!(matches!(denial.reason, DenialReason::RoleNotAllowed { .. }));
            }
            other => panic!("expected role denial, got {:?}", other),
        }

        // Staff passes the role gate, then fails on the permission.
        let outcome = evaluate(&authed(Role::Staff, &[]), &requirement, "/dashboard/billing");
        match outcome {
            GuardOutcome::Denied(denial) => {
                assert!(matches!(denial.reason, DenialReason::PermissionRequired { .. }));
            }
            other => panic!("expected permission denial, got {:?}", other),
        }
    }

    #[test]
    fn test_denial_payload_lists_held_permissions() {
        let outcome = evaluate(
            &authed(Role::Staff, &[permissions::VIEW_REPORTS, permissions::BASIC_BILLING]),
            &AccessRequirement::permission(permissions::SETTINGS_MANAGE),
            "/dashboard/settings-admin",
        );
        match outcome {
            GuardOutcome::Denied(denial) => {
                assert_eq!(
                    denial.held_permissions,
                    vec![
                        permissions::BASIC_BILLING.to_string(),
                        permissions::VIEW_REPORTS.to_string()
                    ]
                );
                assert!(denial.message.contains(permissions::SETTINGS_MANAGE));
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }
}
