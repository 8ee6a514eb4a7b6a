//! Navigation preview command.
//!
//! Runs the access filter locally over the standard registry and shows
//! which entries the given subject would see in the dashboard sidebar.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use carelink_core::access::filter::filter_navigation;
use carelink_core::access::registry::NavigationRegistry;

use super::SubjectArgs;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct NavArgs {
    #[command(flatten)]
    subject: SubjectArgs,

    /// Also list the entries the subject cannot see
    #[arg(long)]
    show_hidden: bool,
}

#[derive(Tabled, Serialize)]
struct NavRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Href")]
    href: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn execute(args: NavArgs, format: OutputFormat) -> Result<()> {
    let registry = NavigationRegistry::standard();
    let subject = args.subject.to_subject();
    let visible = filter_navigation(&registry, &subject);

    let rows: Vec<NavRow> = visible
        .iter()
        .map(|e| NavRow {
            title: e.title.clone(),
            href: e.href.clone(),
            icon: e.icon.clone(),
            description: e.description.clone(),
        })
        .collect();

    if matches!(format, OutputFormat::Table) {
        output::print_header(&format!(
            "Navigation for {} ({} of {} entries visible)",
            subject.role,
            rows.len(),
            registry.len()
        ));
    }
    output::print_list(&rows, format);

    if args.show_hidden && matches!(format, OutputFormat::Table) {
        let hidden: Vec<NavRow> = registry
            .iter()
            .filter(|e| !visible.iter().any(|v| v.href == e.href))
            .map(|e| NavRow {
                title: e.title.clone(),
                href: e.href.clone(),
                icon: e.icon.clone(),
                description: e.description.clone(),
            })
            .collect();
        output::print_header("Hidden entries");
        output::print_list(&hidden, format);
    }

    Ok(())
}
