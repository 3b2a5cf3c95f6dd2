//! Plan assembly: classifiers and derivers composed into one bundle.

use crate::catalog::Catalog;
use crate::classify::{classify_audience, classify_budget};
use crate::derive::{
    derive_budget_insight, derive_messaging_pillars, derive_weekly_plan, instantiate_campaigns,
};
use crate::model::{
    AudienceArchetype, CampaignPlay, Goal, InputSnapshot, OutputBundle, WeeklyPlanEntry,
};

/// Builds [`OutputBundle`]s against one catalog.
///
/// Holds only a shared reference, so one assembler can serve any number of
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct PlanAssembler<'a> {
    catalog: &'a Catalog,
}

impl<'a> PlanAssembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Weekly plan for `goal`, naming the given campaigns.
    pub fn weekly_plan(&self, campaigns: &[CampaignPlay], goal: Goal) -> Vec<WeeklyPlanEntry> {
        derive_weekly_plan(self.catalog.weekly_focus(goal), campaigns)
    }

    /// Derive the full bundle for a snapshot.
    ///
    /// No I/O and no hidden state: equal snapshots give equal bundles.
    pub fn assemble(&self, snapshot: &InputSnapshot) -> OutputBundle {
        let goal = snapshot.goal();
        let audience_key = classify_audience(snapshot.audience());
        let budget_band = classify_budget(snapshot.budget());
        tracing::debug!(
            %goal,
            industry = %snapshot.industry(),
            %audience_key,
            %budget_band,
            "assembling plan"
        );

        let campaigns = instantiate_campaigns(self.catalog.campaign_templates(goal), snapshot);
        let weekly_plan = self.weekly_plan(&campaigns, goal);
        // Catalog validation guarantees every archetype is present.
        let audience_profile = self
            .catalog
            .archetype(audience_key)
            .cloned()
            .unwrap_or_else(|| AudienceArchetype {
                headline: audience_key.label().to_string(),
                motivators: Vec::new(),
                friction: Vec::new(),
            });

        OutputBundle {
            campaigns,
            weekly_plan,
            audience_key,
            audience_profile,
            messaging_pillars: derive_messaging_pillars(snapshot),
            industry_preset: self.catalog.industry_preset(snapshot.industry()).cloned(),
            budget_band,
            budget_insight: derive_budget_insight(snapshot.budget(), goal),
            goal_insights: self.catalog.goal_insights(goal).to_vec(),
        }
    }
}

impl Default for PlanAssembler<'static> {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

/// Assemble a bundle against the built-in catalog.
pub fn assemble(snapshot: &InputSnapshot) -> OutputBundle {
    PlanAssembler::default().assemble(snapshot)
}
