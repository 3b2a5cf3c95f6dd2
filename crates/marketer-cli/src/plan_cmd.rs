use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use marketer_core::{Catalog, InputSnapshot, OutputBundle, PlanAssembler};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
    Toml,
}

/// Snapshot and bundle together, as written by the JSON and TOML outputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument<'a> {
    pub share_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub input: &'a InputSnapshot,
    pub plan: &'a OutputBundle,
}

impl<'a> PlanDocument<'a> {
    pub fn new(input: &'a InputSnapshot, plan: &'a OutputBundle) -> Self {
        Self {
            share_code: input.fingerprint(),
            generated_at: None,
            input,
            plan,
        }
    }

    pub fn generated_at(mut self, stamp: impl Into<String>) -> Self {
        self.generated_at = Some(stamp.into());
        self
    }
}

/// Render a plan in the requested format.
pub fn format_plan(
    snapshot: &InputSnapshot,
    bundle: &OutputBundle,
    format: PlanFormat,
) -> Result<String> {
    let rendered = match format {
        PlanFormat::Text => render::render_text(snapshot, bundle),
        PlanFormat::Json => {
            let doc = PlanDocument::new(snapshot, bundle);
            let mut json =
                serde_json::to_string_pretty(&doc).context("failed to serialize plan as JSON")?;
            json.push('\n');
            json
        }
        PlanFormat::Toml => {
            let doc = PlanDocument::new(snapshot, bundle);
            toml::to_string_pretty(&doc).context("failed to serialize plan as TOML")?
        }
    };
    Ok(rendered)
}

/// Execute `marketer plan`.
pub fn run_plan(catalog: &Catalog, snapshot: &InputSnapshot, format: PlanFormat) -> Result<()> {
    let bundle = PlanAssembler::new(catalog).assemble(snapshot);
    print!("{}", format_plan(snapshot, &bundle, format)?);
    Ok(())
}

/// Execute `marketer share`.
pub fn run_share(catalog: &Catalog, snapshot: &InputSnapshot) -> Result<()> {
    let bundle = PlanAssembler::new(catalog).assemble(snapshot);
    print!("{}", render::render_share(snapshot, &bundle));
    Ok(())
}
