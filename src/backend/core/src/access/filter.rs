//! The access filter: a pure predicate over the navigation registry.
//!
//! Given a subject, returns the visible subset of the registry in original
//! order. No sorting, no deduplication, no side effects; calling it twice
//! with identical inputs yields an identical sequence.

use super::model::{Role, Subject};
use super::registry::{NavigationEntry, NavigationRegistry};

/// Filter the registry down to the entries visible to `subject`.
///
/// Entries are evaluated in registry order; output preserves that order.
pub fn filter_navigation<'a>(
    registry: &'a NavigationRegistry,
    subject: &Subject,
) -> Vec<&'a NavigationEntry> {
    registry
        .iter()
        .filter(|entry| entry_visible(entry, subject))
        .collect()
}

/// Evaluate a single entry's visibility predicate.
///
/// Checks run in a fixed order and short-circuit on the first failure:
/// the `"all"` sentinel, role membership (`allowed_roles`, then
/// `required_roles`), subtype refinements (staff type, provider type,
/// parent entity type — each only when the subject's role matches), and
/// finally the OR-semantics permission gate. An entry with no restricting
/// fields is visible to every authenticated role.
pub fn entry_visible(entry: &NavigationEntry, subject: &Subject) -> bool {
    // 1. Universal override.
    if subject.permissions.grants_all() {
        return true;
    }

    // 2. Allowed roles.
    if let Some(allowed) = &entry.allowed_roles {
        if !allowed.contains(&subject.role) {
            return false;
        }
    }

    // 3. Required roles.
    if let Some(required) = &entry.required_roles {
        if !required.contains(&subject.role) {
            return false;
        }
    }

    // 4. Staff subtype; only binds staff callers.
    if let Some(staff_types) = &entry.required_staff_types {
        if subject.role == Role::Staff {
            match subject.staff_type {
                Some(st) if staff_types.contains(&st) => {}
                _ => return false,
            }
        }
    }

    // 5. Provider subtype; only binds provider callers.
    if let Some(provider_types) = &entry.required_provider_types {
        if subject.role == Role::Provider {
            match subject.provider_type {
                Some(pt) if provider_types.contains(&pt) => {}
                _ => return false,
            }
        }
    }

    // 6. Parent entity subtype; only binds staff callers.
    if let Some(parent_types) = &entry.required_parent_entity_types {
        if subject.role == Role::Staff {
            match subject.parent_entity_type {
                Some(pe) if parent_types.contains(&pe) => {}
                _ => return false,
            }
        }
    }

    // 7. Permission gate: at least one token held (OR, not AND). Terminal.
    if let Some(required) = &entry.required_permissions {
        return required.iter().any(|token| subject.permissions.has(token));
    }

    // 8. Nothing restricted the entry.
    true
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
