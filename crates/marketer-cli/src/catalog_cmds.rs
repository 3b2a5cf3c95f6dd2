use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use marketer_core::{ArchetypeKey, Catalog, Goal, Industry};

use crate::config::MarketerConfig;

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List industries, goals and audience archetypes
    List,
    /// Show the play templates for one goal
    Show {
        /// Goal: brand, lead, sales, retention
        goal: Goal,
    },
    /// Check that a catalog file loads and passes validation
    Validate {
        /// Path to the catalog TOML file
        file: String,
    },
}

/// `list` and `show` work on the resolved catalog; `validate` only reads the
/// file it is given.
pub fn run_catalog_command(command: CatalogCommands, cli_catalog: Option<&Path>) -> Result<()> {
    match command {
        CatalogCommands::List => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            print!("{}", describe_catalog(&resolved.catalog));
        }
        CatalogCommands::Show { goal } => {
            let resolved = MarketerConfig::resolve(cli_catalog)?;
            print!("{}", describe_goal(&resolved.catalog, goal));
        }
        CatalogCommands::Validate { file } => print!("{}", validate_file(Path::new(&file))?),
    }
    Ok(())
}

fn validate_file(path: &Path) -> Result<String> {
    let loaded =
        Catalog::load(path).with_context(|| format!("catalog {} is invalid", path.display()))?;
    let mut out = String::new();
    let _ = writeln!(out, "{} is valid.", path.display());
    for goal in Goal::ALL {
        let _ = writeln!(
            out,
            "  {goal}: {} plays, share total {:.2}",
            loaded.campaign_templates(goal).len(),
            loaded.share_total(goal)
        );
    }
    Ok(out)
}

fn describe_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Industries:");
    for industry in Industry::ALL {
        let marker = if catalog.industry_preset(industry).is_some() {
            ""
        } else {
            "  (no preset)"
        };
        let _ = writeln!(out, "  {industry:<12} {}{marker}", industry.label());
    }
    let _ = writeln!(out, "Goals:");
    for goal in Goal::ALL {
        let _ = writeln!(
            out,
            "  {goal:<12} {} ({} plays)",
            goal.label(),
            catalog.campaign_templates(goal).len()
        );
    }
    let _ = writeln!(out, "Archetypes:");
    for key in ArchetypeKey::ALL {
        let headline = catalog
            .archetype(key)
            .map(|a| a.headline.as_str())
            .unwrap_or("");
        let _ = writeln!(out, "  {key:<20} {headline}");
    }
    out
}

fn describe_goal(catalog: &Catalog, goal: Goal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({goal})", goal.label());
    for t in catalog.campaign_templates(goal) {
        let _ = writeln!(
            out,
            "  {:<24} {:<32} {:>5.2}  {}",
            t.id, t.name, t.budget_share, t.cadence
        );
    }
    let _ = writeln!(out, "  share total: {:.2}", catalog.share_total(goal));
    out
}
