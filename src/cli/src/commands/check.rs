//! Route guard check command.
//!
//! Evaluates the guard locally for a subject and a route requirement,
//! printing the outcome the dashboard would render.

use anyhow::Result;
use clap::Args;

use carelink_core::access::guard::{evaluate, AccessRequirement, AuthState, GuardOutcome};
use carelink_core::access::model::Role;

use super::SubjectArgs;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Path being requested (used for the login redirect payload)
    #[arg(long, default_value = "/dashboard")]
    path: String,

    /// Evaluate as an anonymous (unauthenticated) caller
    #[arg(long)]
    anonymous: bool,

    /// Exact role the route requires (no Platform override)
    #[arg(long)]
    require_role: Option<Role>,

    /// Role the route accepts (repeatable; Platform always passes)
    #[arg(long = "allow-role")]
    allow_roles: Vec<Role>,

    /// Permission token the route requires
    #[arg(long)]
    require_permission: Option<String>,

    #[command(flatten)]
    subject: SubjectArgs,
}

pub fn execute(args: CheckArgs, format: OutputFormat) -> Result<()> {
    let mut requirement = AccessRequirement {
        required_role: args.require_role,
        allowed_roles: args.allow_roles.clone(),
        required_permission: None,
    };
    if let Some(token) = &args.require_permission {
        requirement = requirement.with_permission(token.clone());
    }

    let state = if args.anonymous {
        AuthState::Anonymous
    } else {
        AuthState::Authenticated(args.subject.to_subject())
    };

    let outcome = evaluate(&state, &requirement, &args.path);

    match format {
        OutputFormat::Table => match &outcome {
            GuardOutcome::Allowed => {
                output::print_success(&format!("Access to {} allowed", args.path));
            }
            GuardOutcome::Unauthenticated { intended } => {
                output::print_error("Not signed in");
                output::print_detail("Redirect to", "/login");
                output::print_detail("Intended destination", intended);
            }
            GuardOutcome::Denied(denial) => {
                output::print_error(&format!("Access to {} denied", args.path));
                output::print_detail("Reason", &denial.message);
                output::print_detail("Your role", denial.actual_role.as_str());
                output::print_detail("Held permissions", &denial.held_permissions.join(", "));
                output::print_detail("Recovery", &denial.recovery_href);
            }
            GuardOutcome::Loading => {
                output::print_detail("Outcome", "identity still resolving");
            }
        },
        _ => {
            let value = match &outcome {
                GuardOutcome::Allowed => serde_json::json!({"outcome": "allowed"}),
                GuardOutcome::Unauthenticated { intended } => serde_json::json!({
                    "outcome": "unauthenticated",
                    "redirect_to": "/login",
                    "intended_destination": intended,
                }),
                GuardOutcome::Denied(denial) => serde_json::json!({
                    "outcome": "denied",
                    "denial": denial,
                }),
                GuardOutcome::Loading => serde_json::json!({"outcome": "loading"}),
            };
            output::print_item(&value, format);
        }
    }

    if outcome.is_denied() || matches!(outcome, GuardOutcome::Unauthenticated { .. }) {
        std::process::exit(2);
    }

    Ok(())
}
