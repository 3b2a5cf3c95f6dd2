//! Human-readable renderings of a plan: terminal text, markdown brief and
//! campaign CSV.

use std::fmt::Write as _;

use marketer_core::{InputSnapshot, OutputBundle};

/// Shown in place of the industry differentiator when the catalog has no
/// preset for the snapshot's industry.
pub const DIFFERENTIATOR_FALLBACK: &str =
    "Tekankan value proposition utama brand dalam semua touchpoint.";

/// Format an amount as Indonesian Rupiah, e.g. `Rp 30.000.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

fn percent(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

fn differentiator(bundle: &OutputBundle) -> &str {
    bundle
        .industry_preset
        .as_ref()
        .map(|p| p.differentiator.as_str())
        .unwrap_or(DIFFERENTIATOR_FALLBACK)
}

// ---------------------------------------------------------------------------
// Terminal text
// ---------------------------------------------------------------------------

/// Render a plan for the terminal.
pub fn render_text(snapshot: &InputSnapshot, bundle: &OutputBundle) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_text(&mut out, snapshot, bundle);
    out
}

fn write_text(
    out: &mut String,
    snapshot: &InputSnapshot,
    bundle: &OutputBundle,
) -> std::fmt::Result {
    writeln!(
        out,
        "{} | {} | {} | {}",
        snapshot.brand_name(),
        snapshot.industry().label(),
        snapshot.goal().label(),
        format_rupiah(snapshot.budget())
    )?;
    writeln!(out, "Differentiator: {}", differentiator(bundle))?;
    writeln!(out)?;

    writeln!(out, "Campaign plays")?;
    for play in &bundle.campaigns {
        writeln!(
            out,
            "  {:<32} {:>16}  {:>4}  {}",
            play.name,
            format_rupiah(play.budget),
            percent(play.budget_share),
            play.cadence
        )?;
        writeln!(out, "    {}", play.description)?;
        writeln!(out, "    KPI: {}", play.kpi)?;
    }
    if bundle.campaigns.is_empty() {
        writeln!(out, "  (no plays for this goal)")?;
    }
    writeln!(out, "  Allocated: {}", format_rupiah(bundle.allocated_total()))?;
    writeln!(out)?;

    writeln!(out, "Weekly plan")?;
    for entry in &bundle.weekly_plan {
        writeln!(out, "  {:<7} {}", entry.day, entry.focus)?;
        writeln!(out, "          {}", entry.action)?;
        writeln!(out, "          Metric: {}", entry.metric)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Audience ({}): {}",
        bundle.audience_key.label(),
        bundle.audience_profile.headline
    )?;
    for m in &bundle.audience_profile.motivators {
        writeln!(out, "  + {m}")?;
    }
    for f in &bundle.audience_profile.friction {
        writeln!(out, "  - {f}")?;
    }
    writeln!(out)?;

    writeln!(out, "Messaging pillars")?;
    for pillar in &bundle.messaging_pillars {
        writeln!(out, "  {}: {}", pillar.label, pillar.narrative)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Budget ({}): {}",
        bundle.budget_band, bundle.budget_insight.title
    )?;
    writeln!(out, "  {}", bundle.budget_insight.detail)?;
    for insight in &bundle.goal_insights {
        writeln!(out, "  * {}: {}", insight.title, insight.detail)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Markdown brief
// ---------------------------------------------------------------------------

/// Render the plan as a markdown brief. `generated_at` goes into the header.
pub fn render_markdown(
    snapshot: &InputSnapshot,
    bundle: &OutputBundle,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    let _ = write_markdown(&mut out, snapshot, bundle, generated_at);
    out
}

fn write_markdown(
    out: &mut String,
    snapshot: &InputSnapshot,
    bundle: &OutputBundle,
    generated_at: &str,
) -> std::fmt::Result {
    writeln!(out, "# Marketing plan: {}", snapshot.brand_name())?;
    writeln!(out)?;
    writeln!(out, "- Industry: {}", snapshot.industry().label())?;
    writeln!(out, "- Goal: {}", snapshot.goal().label())?;
    writeln!(out, "- Budget: {}", format_rupiah(snapshot.budget()))?;
    writeln!(out, "- Tone: {}", snapshot.tone())?;
    writeln!(out, "- Audience: {}", snapshot.audience())?;
    writeln!(out, "- Share code: `{}`", snapshot.fingerprint())?;
    writeln!(out, "- Generated: {generated_at}")?;
    writeln!(out)?;
    writeln!(out, "> {}", differentiator(bundle))?;
    writeln!(out)?;

    writeln!(out, "## Campaign plays")?;
    writeln!(out)?;
    writeln!(out, "| Play | Budget | Share | KPI | Cadence |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for play in &bundle.campaigns {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            play.name,
            format_rupiah(play.budget),
            percent(play.budget_share),
            play.kpi,
            play.cadence
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Weekly plan")?;
    writeln!(out)?;
    for entry in &bundle.weekly_plan {
        writeln!(
            out,
            "- **{}**: {}. {} ({})",
            entry.day, entry.focus, entry.action, entry.metric
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Audience")?;
    writeln!(out)?;
    writeln!(out, "{}", bundle.audience_profile.headline)?;
    writeln!(out)?;
    for m in &bundle.audience_profile.motivators {
        writeln!(out, "- Motivator: {m}")?;
    }
    for f in &bundle.audience_profile.friction {
        writeln!(out, "- Friction: {f}")?;
    }
    writeln!(out)?;

    writeln!(out, "## Messaging pillars")?;
    writeln!(out)?;
    for pillar in &bundle.messaging_pillars {
        writeln!(out, "- **{}**: {}", pillar.label, pillar.narrative)?;
    }
    writeln!(out)?;

    writeln!(out, "## KPI insights")?;
    writeln!(out)?;
    writeln!(
        out,
        "- **{}**: {}",
        bundle.budget_insight.title, bundle.budget_insight.detail
    )?;
    for insight in &bundle.goal_insights {
        writeln!(out, "- **{}**: {}", insight.title, insight.detail)?;
    }
    if let Some(ref preset) = bundle.industry_preset {
        for win in &preset.quick_wins {
            writeln!(out, "- Quick win, **{}**: {}", win.title, win.detail)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub const CSV_HEADER: &str = "id,name,budget,budget_share,kpi,cadence";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One CSV row per campaign play, header included.
pub fn render_csv(bundle: &OutputBundle) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for play in &bundle.campaigns {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            csv_field(&play.id),
            csv_field(&play.name),
            play.budget,
            play.budget_share,
            csv_field(&play.kpi),
            csv_field(&play.cadence),
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Share brief
// ---------------------------------------------------------------------------

/// Short team brief printed by `marketer share`.
pub fn render_share(snapshot: &InputSnapshot, bundle: &OutputBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Share code: {}", snapshot.fingerprint());
    let _ = writeln!(
        out,
        "{} ({}): {} dengan budget {}",
        snapshot.brand_name(),
        snapshot.industry().label(),
        snapshot.goal().label(),
        format_rupiah(snapshot.budget())
    );
    let plays: Vec<String> = bundle
        .campaigns
        .iter()
        .map(|p| format!("{} ({})", p.name, format_rupiah(p.budget)))
        .collect();
    if !plays.is_empty() {
        let _ = writeln!(out, "Plays: {}", plays.join(", "));
    }
    let _ = writeln!(out, "Audience: {}", bundle.audience_profile.headline);
    let _ = writeln!(out, "Budget: {}", bundle.budget_insight.title);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketer_core::{Goal, Industry, assemble};

    #[test]
    fn rupiah_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(1_000), "Rp 1.000");
        assert_eq!(format_rupiah(30_000_000), "Rp 30.000.000");
        assert_eq!(format_rupiah(120_000_000), "Rp 120.000.000");
        assert_eq!(format_rupiah(1_234_567), "Rp 1.234.567");
    }

    #[test]
    fn text_shows_budgets_and_plays() {
        let snapshot = InputSnapshot::default();
        let text = render_text(&snapshot, &assemble(&snapshot));
        assert!(text.starts_with("Nimbus Labs | SaaS / Teknologi | Lead Generation | Rp 30.000.000"));
        assert!(text.contains("Lead Magnet Engine"));
        assert!(text.contains("Rp 10.800.000"));
        assert!(text.contains("Allocated: Rp 30.000.000"));
    }

    #[test]
    fn text_uses_fallback_without_preset() {
        let snapshot = InputSnapshot::default().with_industry(Industry::B2b);
        let mut bundle = assemble(&snapshot);
        bundle.industry_preset = None;
        let text = render_text(&snapshot, &bundle);
        assert!(text.contains(DIFFERENTIATOR_FALLBACK));
    }

    #[test]
    fn markdown_has_sections() {
        let snapshot = InputSnapshot::default().with_goal(Goal::Retention);
        let md = render_markdown(&snapshot, &assemble(&snapshot), "2026-01-01T00:00:00Z");
        assert!(md.starts_with("# Marketing plan: Nimbus Labs\n"));
        assert!(md.contains("- Generated: 2026-01-01T00:00:00Z"));
        assert!(md.contains(&format!("`{}`", snapshot.fingerprint())));
        for heading in ["## Campaign plays", "## Weekly plan", "## Messaging pillars"] {
            assert!(md.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let snapshot = InputSnapshot::default();
        let mut bundle = assemble(&snapshot);
        bundle.campaigns[0].kpi = "CPL, MQL".into();
        let csv = render_csv(&bundle);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + bundle.campaigns.len());
        assert!(lines[1].contains(",10800000,0.36,\"CPL, MQL\","));
    }

    #[test]
    fn csv_field_escapes_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn share_brief_leads_with_code() {
        let snapshot = InputSnapshot::default();
        let brief = render_share(&snapshot, &assemble(&snapshot));
        let first = brief.lines().next().unwrap();
        assert_eq!(first, format!("Share code: {}", snapshot.fingerprint()));
        assert!(brief.contains("Lead Magnet Engine (Rp 10.800.000)"));
    }
}
