//! Deterministic marketing plan engine.
//!
//! Turns an [`InputSnapshot`] (brand, industry, goal, budget, tone, audience)
//! into an [`OutputBundle`]: campaign plays with budget allocations, a weekly
//! execution calendar, an audience profile, messaging pillars and KPI
//! insights. Everything is derived synchronously from a static [`Catalog`].

pub mod assemble;
pub mod catalog;
pub mod classify;
pub mod derive;
pub mod model;

pub use assemble::{PlanAssembler, assemble};
pub use catalog::{Catalog, CatalogError};
pub use classify::{classify_audience, classify_budget};
pub use model::{
    ArchetypeKey, AudienceArchetype, BudgetBand, CampaignPlay, CampaignPlayTemplate, Goal,
    Industry, IndustryPreset, InputSnapshot, Insight, MessagingPillar, OutputBundle, PillarLabel,
    SnapshotError, WeeklyFocus, WeeklyPlanEntry,
};

/// Industry preset from the built-in catalog.
pub fn lookup_industry_preset(industry: Industry) -> Option<&'static IndustryPreset> {
    Catalog::builtin().industry_preset(industry)
}

/// Play templates for a goal from the built-in catalog.
pub fn lookup_campaign_templates(goal: Goal) -> &'static [CampaignPlayTemplate] {
    Catalog::builtin().campaign_templates(goal)
}

/// Weekly focus template for a goal from the built-in catalog.
pub fn lookup_weekly_focus(goal: Goal) -> &'static [WeeklyFocus] {
    Catalog::builtin().weekly_focus(goal)
}

/// KPI insights for a goal from the built-in catalog.
pub fn lookup_goal_insights(goal: Goal) -> &'static [Insight] {
    Catalog::builtin().goal_insights(goal)
}
