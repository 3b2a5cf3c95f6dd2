//! Planner form input: CLI flags layered over configured defaults.

use anyhow::{Context, Result};
use clap::Args;

use marketer_core::{Goal, Industry, InputSnapshot};

/// Smallest budget the form accepts.
pub const BUDGET_MIN: u64 = 10_000_000;
/// Largest budget the form accepts.
pub const BUDGET_MAX: u64 = 120_000_000;
/// Budget slider step, counted from [`BUDGET_MIN`].
pub const BUDGET_STEP: u64 = 5_000_000;

/// Flags shared by every command that builds a plan.
#[derive(Debug, Default, Clone, Args)]
pub struct PlanArgs {
    /// Brand name
    #[arg(long)]
    pub brand: Option<String>,
    /// Industry: saas, ecommerce, b2b, hospitality
    #[arg(long)]
    pub industry: Option<Industry>,
    /// Primary goal: brand, lead, sales, retention
    #[arg(long)]
    pub goal: Option<Goal>,
    /// Monthly budget in Rupiah
    #[arg(long)]
    pub budget: Option<u64>,
    /// Brand tone of voice
    #[arg(long)]
    pub tone: Option<String>,
    /// Free-form description of the target audience
    #[arg(long)]
    pub audience: Option<String>,
    /// Pass the budget through without clamping it to the slider range
    #[arg(long)]
    pub raw_budget: bool,
}

impl PlanArgs {
    /// Apply these flags on top of `defaults`.
    pub fn to_snapshot(&self, defaults: &InputSnapshot) -> Result<InputSnapshot> {
        let mut snapshot = defaults.clone();
        if let Some(ref brand) = self.brand {
            snapshot = snapshot.with_brand_name(brand.clone());
        }
        if let Some(industry) = self.industry {
            snapshot = snapshot.with_industry(industry);
        }
        if let Some(goal) = self.goal {
            snapshot = snapshot.with_goal(goal);
        }
        if let Some(ref tone) = self.tone {
            snapshot = snapshot.with_tone(tone.clone());
        }
        if let Some(ref audience) = self.audience {
            snapshot = snapshot.with_audience(audience.clone());
        }

        let requested = self.budget.unwrap_or(snapshot.budget());
        let budget = if self.raw_budget {
            requested
        } else {
            let clamped = clamp_budget(requested);
            if clamped != requested {
                tracing::warn!(requested, clamped, "budget adjusted to slider range");
            }
            clamped
        };
        snapshot.with_budget(budget).context("invalid budget")
    }
}

/// Clamp a budget into `[BUDGET_MIN, BUDGET_MAX]` and snap it to the nearest
/// step. Halfway values snap up.
pub fn clamp_budget(budget: u64) -> u64 {
    let clamped = budget.clamp(BUDGET_MIN, BUDGET_MAX);
    let steps = (clamped - BUDGET_MIN + BUDGET_STEP / 2) / BUDGET_STEP;
    (BUDGET_MIN + steps * BUDGET_STEP).min(BUDGET_MAX)
}
