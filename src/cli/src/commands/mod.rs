//! CLI command implementations.

pub mod check;
pub mod health;
pub mod nav;

use clap::Args;

use carelink_core::access::model::{
    ParentEntityType, PermissionSet, ProviderType, Role, StaffType, Subject,
};

/// Flags describing the subject whose access is being previewed.
#[derive(Args)]
pub struct SubjectArgs {
    /// Subject role (platform, provider, staff, client)
    #[arg(long)]
    pub role: Role,

    /// Staff subtype (support, finance, clinical, admissions)
    #[arg(long)]
    pub staff_type: Option<StaffType>,

    /// Provider subtype (physician, pharmacy, laboratory, homecare)
    #[arg(long)]
    pub provider_type: Option<ProviderType>,

    /// Parent entity kind (clinic, hospital, agency)
    #[arg(long)]
    pub parent_entity: Option<ParentEntityType>,

    /// Permission token held by the subject (repeatable; "all" grants everything)
    #[arg(long = "permission", short = 'p')]
    pub permissions: Vec<String>,
}

impl SubjectArgs {
    pub fn to_subject(&self) -> Subject {
        let perms: PermissionSet = self.permissions.iter().map(String::as_str).collect();
        let mut subject = Subject::new(self.role, perms);
        if let Some(st) = self.staff_type {
            subject = subject.with_staff_type(st);
        }
        if let Some(pt) = self.provider_type {
            subject = subject.with_provider_type(pt);
        }
        if let Some(pe) = self.parent_entity {
            subject = subject.with_parent_entity_type(pe);
        }
        subject
    }
}
