//! End-to-end tests for the access filter and route guard working together.
//!
//! Tests cover:
//! - Platform override scope (permission and multi-role checks only)
//! - The basic-permission allow-list
//! - The "all" sentinel short-circuit
//! - Navigation/guard consistency for the standard registry

use carelink_core::access::{
    evaluate, filter_navigation, AccessRequirement, AuthState, DenialReason, GuardOutcome,
    NavigationRegistry, ParentEntityType, PermissionSet, ProviderType, Role, StaffType, Subject,
    BASIC_ACCESS_PERMISSIONS, DASHBOARD_ROOT,
};
use carelink_core::access::model::permissions;

fn subject(role: Role, perms: &[&str]) -> Subject {
    Subject::new(role, perms.iter().copied().collect())
}

fn authed(subject: Subject) -> AuthState {
    AuthState::Authenticated(subject)
}

// ============================================================================
// Guard: authentication states
// ============================================================================

#[test]
fn test_anonymous_is_redirected_with_intended_destination() {
    let outcome = evaluate(
        &AuthState::Anonymous,
        &AccessRequirement::authenticated(),
        "/dashboard/lab-orders",
    );

    match outcome {
        GuardOutcome::Unauthenticated { intended } => {
            assert_eq!(intended, "/dashboard/lab-orders");
        }
        other => panic!("expected Unauthenticated, got {:?}", other),
    }
}

#[test]
fn test_resolving_identity_reports_loading() {
    let outcome = evaluate(
        &AuthState::Resolving,
        &AccessRequirement::authenticated(),
        "/dashboard",
    );
    assert_eq!(outcome, GuardOutcome::Loading);
}

#[test]
fn test_authenticated_passes_bare_requirement() {
    let outcome = evaluate(
        &authed(subject(Role::Client, &[])),
        &AccessRequirement::authenticated(),
        "/dashboard",
    );
    assert!(outcome.is_allowed());
}

// ============================================================================
// Guard: Platform override scope
// ============================================================================

#[test]
fn test_platform_overrides_multi_role_check() {
    let requirement = AccessRequirement::any_role([Role::Provider, Role::Staff]);
    let outcome = evaluate(&authed(subject(Role::Platform, &[])), &requirement, "/x");
    assert!(outcome.is_allowed());
}

#[test]
fn test_platform_does_not_override_single_required_role() {
    let requirement = AccessRequirement::role(Role::Client);
    let outcome = evaluate(&authed(subject(Role::Platform, &[])), &requirement, "/x");

    match outcome {
        GuardOutcome::Denied(denial) => {
            assert!(matches!(denial.reason, DenialReason::RoleRequired { .. }));
            assert_eq!(denial.actual_role, Role::Platform);
            assert_eq!(denial.recovery_href, DASHBOARD_ROOT);
        }
        other => panic!("expected Denied, got {:?}", other),
    }
}

#[test]
fn test_platform_overrides_permission_check() {
    let requirement = AccessRequirement::permission(permissions::LAB_MANAGE);
    let outcome = evaluate(&authed(subject(Role::Platform, &[])), &requirement, "/x");
    assert!(outcome.is_allowed());
}

// ============================================================================
// Guard: basic allow-list
// ============================================================================

#[test]
fn test_basic_permissions_granted_without_holding_them() {
    for token in BASIC_ACCESS_PERMISSIONS {
        let requirement = AccessRequirement::permission(*token);
        let outcome = evaluate(&authed(subject(Role::Client, &[])), &requirement, "/x");
        assert!(outcome.is_allowed(), "{} should be allow-listed", token);
    }
}

#[test]
fn test_non_basic_permission_denied_when_not_held() {
    let requirement = AccessRequirement::permission(permissions::PATIENTS_READ);
    let outcome = evaluate(&authed(subject(Role::Staff, &[])), &requirement, "/x");

    match outcome {
        GuardOutcome::Denied(denial) => {
            assert!(matches!(
                denial.reason,
                DenialReason::PermissionRequired { .. }
            ));
            assert!(denial
                .held_permissions
                .iter()
                .all(|p| p != permissions::PATIENTS_READ));
        }
        other => panic!("expected Denied, got {:?}", other),
    }
}

#[test]
fn test_held_permission_allowed() {
    let requirement = AccessRequirement::permission(permissions::PATIENTS_READ);
    let outcome = evaluate(
        &authed(subject(Role::Staff, &[permissions::PATIENTS_READ])),
        &requirement,
        "/x",
    );
    assert!(outcome.is_allowed());
}

// ============================================================================
// Guard: "all" sentinel
// ============================================================================

#[test]
fn test_all_sentinel_short_circuits_role_and_permission_checks() {
    let caller = subject(Role::Client, &[permissions::ALL]);

    let role_req = AccessRequirement::role(Role::Platform);
    assert!(evaluate(&authed(caller.clone()), &role_req, "/x").is_allowed());

    let perm_req = AccessRequirement::permission(permissions::SETTINGS_MANAGE);
    assert!(evaluate(&authed(caller), &perm_req, "/x").is_allowed());
}

// ============================================================================
// Filter and guard consistency
// ============================================================================

#[test]
fn test_pharmacy_provider_sees_pharmacy_and_can_enter() {
    let registry = NavigationRegistry::standard();
    let caller = subject(Role::Provider, &[permissions::PHARMACY_MANAGE])
        .with_provider_type(ProviderType::Pharmacy);

    let visible = filter_navigation(&registry, &caller);
    let hrefs: Vec<&str> = visible.iter().map(|e| e.href.as_str()).collect();
    assert!(hrefs.contains(&"/dashboard/pharmacy-orders"));

    // The matching route requirement admits the same caller.
    let outcome = evaluate(
        &authed(caller),
        &AccessRequirement::permission(permissions::PHARMACY_MANAGE),
        "/dashboard/pharmacy-orders",
    );
    assert!(outcome.is_allowed());
}

#[test]
fn test_physician_does_not_see_pharmacy_entry() {
    let registry = NavigationRegistry::standard();
    let caller = subject(Role::Provider, &[permissions::CONSULTATIONS_MANAGE])
        .with_provider_type(ProviderType::Physician);

    let visible = filter_navigation(&registry, &caller);
    let hrefs: Vec<&str> = visible.iter().map(|e| e.href.as_str()).collect();
    assert!(!hrefs.contains(&"/dashboard/pharmacy-orders"));
    assert!(hrefs.contains(&"/dashboard/consultations"));
}

#[test]
fn test_finance_staff_navigation() {
    let registry = NavigationRegistry::standard();
    let caller = subject(Role::Staff, &[permissions::BASIC_BILLING])
        .with_staff_type(StaffType::Finance)
        .with_parent_entity_type(ParentEntityType::Clinic);

    let visible = filter_navigation(&registry, &caller);
    let hrefs: Vec<&str> = visible.iter().map(|e| e.href.as_str()).collect();
    assert!(hrefs.contains(&"/dashboard/billing"));
    // Finance staff are not in the patients entry's staff-type list.
    assert!(!hrefs.contains(&"/dashboard/patients"));
}

#[test]
fn test_permission_set_parses_all_sentinel() {
    let perms: PermissionSet = ["all"].into_iter().collect();
    assert!(perms.grants_all());
    let perms: PermissionSet = ["view_reports"].into_iter().collect();
    assert!(!perms.grants_all());
}
