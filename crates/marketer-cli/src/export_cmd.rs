use std::io::Write;

use anyhow::Context;
use clap::ValueEnum;

use marketer_core::{Catalog, InputSnapshot, OutputBundle, PlanAssembler};

use crate::plan_cmd::PlanDocument;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Json,
    Csv,
}

/// Render an export. `generated_at` is stamped into the markdown and JSON
/// outputs; CSV carries campaign rows only.
pub fn render_export(
    snapshot: &InputSnapshot,
    bundle: &OutputBundle,
    format: ExportFormat,
    generated_at: &str,
) -> anyhow::Result<String> {
    let rendered = match format {
        ExportFormat::Markdown => render::render_markdown(snapshot, bundle, generated_at),
        ExportFormat::Json => {
            let doc = PlanDocument::new(snapshot, bundle).generated_at(generated_at);
            let mut json =
                serde_json::to_string_pretty(&doc).context("failed to serialize plan as JSON")?;
            json.push('\n');
            json
        }
        ExportFormat::Csv => render::render_csv(bundle),
    };
    Ok(rendered)
}

/// Export the plan to `output`, or stdout when no path is given.
pub fn run_export(
    catalog: &Catalog,
    snapshot: &InputSnapshot,
    format: ExportFormat,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let bundle = PlanAssembler::new(catalog).assemble(snapshot);
    let generated_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rendered = render_export(snapshot, &bundle, format, &generated_at)?;

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;

    if let Some(path) = output {
        tracing::info!(path, ?format, plays = bundle.campaigns.len(), "plan exported");
        println!("Exported plan for {} to {path}", snapshot.brand_name());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketer_core::assemble;

    const STAMP: &str = "2026-03-01T08:00:00Z";

    #[test]
    fn json_export_carries_timestamp() {
        let snapshot = InputSnapshot::default();
        let bundle = assemble(&snapshot);
        let out = render_export(&snapshot, &bundle, ExportFormat::Json, STAMP).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["generatedAt"], STAMP);
        assert_eq!(json["plan"]["budgetBand"], "growth");
    }

    #[test]
    fn csv_export_has_no_timestamp() {
        let snapshot = InputSnapshot::default();
        let bundle = assemble(&snapshot);
        let out = render_export(&snapshot, &bundle, ExportFormat::Csv, STAMP).unwrap();
        assert!(out.starts_with(render::CSV_HEADER));
        assert!(!out.contains(STAMP));
    }

    #[test]
    fn export_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plan.md");
        let path_str = path.to_str().unwrap();
        run_export(
            Catalog::builtin(),
            &InputSnapshot::default(),
            ExportFormat::Markdown,
            Some(path_str),
        )
        .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Marketing plan: Nimbus Labs"));
    }

    #[test]
    fn export_to_missing_dir_fails() {
        let err = run_export(
            Catalog::builtin(),
            &InputSnapshot::default(),
            ExportFormat::Csv,
            Some("/nonexistent/dir/plan.csv"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot create output file"));
    }
}
