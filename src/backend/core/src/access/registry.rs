//! The navigation registry: an ordered, immutable table of menu entries,
//! each carrying its visibility metadata.
//!
//! The registry is built once at startup and injected wherever it is
//! needed; nothing in this crate reads it as ambient global state. Order is
//! significant (display order). Hrefs are unique by convention, not
//! enforced.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::model::{permissions, ParentEntityType, ProviderType, Role, StaffType};

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation Entry
// ═══════════════════════════════════════════════════════════════════════════════

/// One menu item plus its visibility predicate.
///
/// An entry with no `allowed_roles`, no `required_roles`, and no
/// `required_permissions` is visible to every authenticated role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Display title.
    pub title: String,
    /// Route path; unique across the registry by convention.
    pub href: String,
    /// Icon reference resolved by the consuming frontend.
    pub icon: String,
    /// Short description shown in menus and cards.
    pub description: String,

    /// OR-semantics permission gate; terminal check in the filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permissions: Option<HashSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<HashSet<Role>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<HashSet<Role>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_staff_types: Option<HashSet<StaffType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_provider_types: Option<HashSet<ProviderType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_parent_entity_types: Option<HashSet<ParentEntityType>>,
}

impl NavigationEntry {
    /// Create an unrestricted entry (visible to every authenticated role).
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            icon: icon.into(),
            description: description.into(),
            required_permissions: None,
            required_roles: None,
            allowed_roles: None,
            required_staff_types: None,
            required_provider_types: None,
            required_parent_entity_types: None,
        }
    }

    pub fn with_required_permissions<S: Into<String>>(
        mut self,
        tokens: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_permissions = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_required_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn with_allowed_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn with_required_staff_types(
        mut self,
        types: impl IntoIterator<Item = StaffType>,
    ) -> Self {
        self.required_staff_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_required_provider_types(
        mut self,
        types: impl IntoIterator<Item = ProviderType>,
    ) -> Self {
        self.required_provider_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_required_parent_entity_types(
        mut self,
        types: impl IntoIterator<Item = ParentEntityType>,
    ) -> Self {
        self.required_parent_entity_types = Some(types.into_iter().collect());
        self
    }

    /// True when no role or permission field restricts this entry.
    pub fn is_unrestricted(&self) -> bool {
        self.allowed_roles.is_none()
            && self.required_roles.is_none()
            && self.required_permissions.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered collection of navigation entries, immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRegistry {
    entries: Vec<NavigationEntry>,
}

impl NavigationRegistry {
    pub fn new(entries: Vec<NavigationEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its href.
    pub fn find(&self, href: &str) -> Option<&NavigationEntry> {
        self.entries.iter().find(|e| e.href == href)
    }

    /// The standard CareLink menu.
    ///
    /// Order here is display order. Access metadata mirrors the platform's
    /// role model: clinical work areas are scoped to the provider subtype
    /// that owns them, back-office areas to staff subtypes, and the
    /// platform console to the platform role alone.
    pub fn standard() -> Self {
        Self::new(vec![
            NavigationEntry::new(
                "Dashboard",
                "/dashboard",
                "layout-dashboard",
                "Overview of your activity and shortcuts",
            ),
            NavigationEntry::new(
                "Pharmacy Orders",
                "/dashboard/pharmacy-orders",
                "pill",
                "Track and fulfil medication orders",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff, Role::Client])
            .with_required_provider_types([ProviderType::Pharmacy])
            .with_required_permissions([permissions::PHARMACY_MANAGE]),
            NavigationEntry::new(
                "Consultations",
                "/dashboard/consultations",
                "stethoscope",
                "Scheduled and past consultations",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff, Role::Client])
            .with_required_provider_types([ProviderType::Physician])
            .with_required_permissions([
                permissions::CONSULTATIONS_MANAGE,
                permissions::VIEW_PATIENTS,
            ]),
            NavigationEntry::new(
                "Homecare Bookings",
                "/dashboard/homecare",
                "house-heart",
                "Home visit requests and schedules",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff, Role::Client])
            .with_required_provider_types([ProviderType::Homecare])
            .with_required_permissions([permissions::HOMECARE_MANAGE]),
            NavigationEntry::new(
                "Lab Orders",
                "/dashboard/lab-orders",
                "flask-conical",
                "Lab work requests and results",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff, Role::Client])
            .with_required_provider_types([ProviderType::Laboratory])
            .with_required_permissions([permissions::LAB_MANAGE]),
            NavigationEntry::new(
                "Medical Records",
                "/dashboard/medical-records",
                "folder-heart",
                "Patient history, diagnoses, and documents",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff, Role::Client])
            .with_required_permissions([
                permissions::PATIENTS_READ,
                permissions::RECORDS_MANAGE,
            ]),
            NavigationEntry::new(
                "Patients",
                "/dashboard/patients",
                "users",
                "Patient directory and onboarding",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff])
            .with_required_staff_types([StaffType::Support, StaffType::Clinical, StaffType::Admissions])
            .with_required_permissions([permissions::VIEW_PATIENTS, permissions::PATIENTS_READ]),
            NavigationEntry::new(
                "Staff Management",
                "/dashboard/staff",
                "id-card",
                "Manage staff accounts and assignments",
            )
            .with_allowed_roles([Role::Platform, Role::Staff])
            .with_required_staff_types([StaffType::Support])
            .with_required_parent_entity_types([
                ParentEntityType::Clinic,
                ParentEntityType::Hospital,
            ])
            .with_required_permissions([permissions::STAFF_MANAGE]),
            NavigationEntry::new(
                "Billing",
                "/dashboard/billing",
                "receipt",
                "Invoices, claims, and payouts",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff])
            .with_required_staff_types([StaffType::Finance, StaffType::Support])
            .with_required_permissions([permissions::BASIC_BILLING, permissions::BILLING_MANAGE]),
            NavigationEntry::new(
                "Reports",
                "/dashboard/reports",
                "bar-chart-3",
                "Operational and clinical reporting",
            )
            .with_allowed_roles([Role::Platform, Role::Provider, Role::Staff])
            .with_required_permissions([permissions::VIEW_REPORTS, permissions::REPORTS_EXPORT]),
            NavigationEntry::new(
                "Platform Console",
                "/dashboard/platform",
                "shield",
                "Tenant administration and platform settings",
            )
            .with_required_roles([Role::Platform]),
            NavigationEntry::new(
                "Settings",
                "/dashboard/settings",
                "settings",
                "Profile and notification preferences",
            ),
        ])
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
