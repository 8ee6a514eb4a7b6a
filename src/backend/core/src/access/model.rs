//! Access-control data model: roles, subtype refinements, permission sets,
//! and the access-check subject.
//!
//! Roles and subtypes are closed enumerations so the compiler enforces
//! exhaustive handling wherever they are matched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Roles
// ═══════════════════════════════════════════════════════════════════════════════

/// Top-level actor category. A user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operators; privileged role with guard-level overrides.
    Platform,
    /// External care providers (physicians, pharmacies, labs, homecare agencies).
    Provider,
    /// Internal staff of a parent entity (clinic, hospital, agency).
    Staff,
    /// Patients and their delegates.
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Provider => "provider",
            Self::Staff => "staff",
            Self::Client => "client",
        }
    }

    /// All roles, in privilege order.
    pub fn all() -> [Role; 4] {
        [Self::Platform, Self::Provider, Self::Staff, Self::Client]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(Self::Platform),
            "provider" => Ok(Self::Provider),
            "staff" => Ok(Self::Staff),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Subtype refinements
// ═══════════════════════════════════════════════════════════════════════════════

/// Refinement of the Staff role; present only when the role is Staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffType {
    Support,
    Finance,
    Clinical,
    Admissions,
}

impl StaffType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Finance => "finance",
            Self::Clinical => "clinical",
            Self::Admissions => "admissions",
        }
    }
}

impl fmt::Display for StaffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support" => Ok(Self::Support),
            "finance" => Ok(Self::Finance),
            "clinical" => Ok(Self::Clinical),
            "admissions" => Ok(Self::Admissions),
            other => Err(format!("unknown staff type: {}", other)),
        }
    }
}

/// Refinement of the Provider role; present only when the role is Provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Physician,
    Pharmacy,
    Laboratory,
    Homecare,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physician => "physician",
            Self::Pharmacy => "pharmacy",
            Self::Laboratory => "laboratory",
            Self::Homecare => "homecare",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physician" => Ok(Self::Physician),
            "pharmacy" => Ok(Self::Pharmacy),
            "laboratory" => Ok(Self::Laboratory),
            "homecare" => Ok(Self::Homecare),
            other => Err(format!("unknown provider type: {}", other)),
        }
    }
}

/// Kind of parent entity a Staff member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentEntityType {
    Clinic,
    Hospital,
    Agency,
}

impl ParentEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinic => "clinic",
            Self::Hospital => "hospital",
            Self::Agency => "agency",
        }
    }
}

impl fmt::Display for ParentEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParentEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clinic" => Ok(Self::Clinic),
            "hospital" => Ok(Self::Hospital),
            "agency" => Ok(Self::Agency),
            other => Err(format!("unknown parent entity type: {}", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Permissions
// ═══════════════════════════════════════════════════════════════════════════════

/// Well-known permission tokens.
///
/// Permissions are opaque string capability tokens; these constants keep the
/// spelling consistent across the registry, the guard, and route wiring.
pub mod permissions {
    /// Universal override: a subject holding this passes every check.
    pub const ALL: &str = "all";

    pub const DASHBOARD_ACCESS: &str = "dashboard_access";
    pub const VIEW_PATIENTS: &str = "view_patients";
    pub const VIEW_REPORTS: &str = "view_reports";
    pub const BASIC_BILLING: &str = "basic_billing";

    pub const PATIENTS_READ: &str = "patients_read";
    pub const PHARMACY_MANAGE: &str = "pharmacy_manage";
    pub const CONSULTATIONS_MANAGE: &str = "consultations_manage";
    pub const HOMECARE_MANAGE: &str = "homecare_manage";
    pub const LAB_MANAGE: &str = "lab_manage";
    pub const RECORDS_MANAGE: &str = "records_manage";
    pub const BILLING_MANAGE: &str = "billing_manage";
    pub const STAFF_MANAGE: &str = "staff_manage";
    pub const REPORTS_EXPORT: &str = "reports_export";
    pub const SETTINGS_MANAGE: &str = "settings_manage";
}

/// A set of permission tokens held by a subject.
///
/// The sentinel token `"all"` short-circuits every access check to allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a specific token is held.
    pub fn has(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Check whether at least one of the given tokens is held.
    pub fn has_any<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        tokens.iter().any(|t| self.has(t.as_ref()))
    }

    /// Check for the universal `"all"` sentinel.
    pub fn grants_all(&self) -> bool {
        self.has(permissions::ALL)
    }

    pub fn insert(&mut self, token: impl Into<String>) {
        self.0.insert(token.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Subject
// ═══════════════════════════════════════════════════════════════════════════════

/// The access-check view of a user.
///
/// Supplied by the authentication collaborator; never persisted by this
/// core. Subtype fields are only meaningful for the matching role and are
/// ignored by the filter otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub role: Role,
    pub permissions: PermissionSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_type: Option<StaffType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_entity_type: Option<ParentEntityType>,
}

impl Subject {
    /// Create a subject with no subtype attributes.
    pub fn new(role: Role, permissions: PermissionSet) -> Self {
        Self {
            role,
            permissions,
            staff_type: None,
            provider_type: None,
            parent_entity_type: None,
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

    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.has(token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::all() {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::Platform).unwrap();
        assert_eq!(json, r#""platform""#);
        let role: Role = serde_json::from_str(r#""staff""#).unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn test_permission_set_has_any() {
        let perms: PermissionSet =
            [permissions::VIEW_REPORTS, permissions::BASIC_BILLING].into_iter().collect();

        assert!(perms.has(permissions::VIEW_REPORTS));
        assert!(perms.has_any(&[permissions::PHARMACY_MANAGE, permissions::BASIC_BILLING]));
        assert!(!perms.has_any(&[permissions::PHARMACY_MANAGE, permissions::LAB_MANAGE]));
    }

    #[test]
    fn test_permission_set_all_sentinel() {
        let perms: PermissionSet = [permissions::ALL].into_iter().collect();
        assert!(perms.grants_all());
        assert!(!perms.has(permissions::VIEW_REPORTS));

        let without: PermissionSet = [permissions::VIEW_REPORTS].into_iter().collect();
        assert!(!without.grants_all());
    }

    #[test]
    fn test_subject_builder() {
        let subject = Subject::new(Role::Staff, PermissionSet::new())
            .with_staff_type(StaffType::Support)
            .with_parent_entity_type(ParentEntityType::Clinic);

        assert_eq!(subject.role, Role::Staff);
        assert_eq!(subject.staff_type, Some(StaffType::Support));
        assert_eq!(subject.parent_entity_type, Some(ParentEntityType::Clinic));
        assert!(subject.provider_type.is_none());
    }

    #[test]
    fn test_subtype_parsing() {
        assert_eq!("support".parse::<StaffType>().unwrap(), StaffType::Support);
        assert_eq!("pharmacy".parse::<ProviderType>().unwrap(), ProviderType::Pharmacy);
        assert_eq!("hospital".parse::<ParentEntityType>().unwrap(), ParentEntityType::Hospital);
        assert!("plumber".parse::<StaffType>().is_err());
    }
}
