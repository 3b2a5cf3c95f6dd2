//! Input and output types of the plan engine.
//!
//! [`InputSnapshot`] is the only input; [`OutputBundle`] is the only output.
//! Everything in between is a catalog entry or a value derived from one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Industry vertical of the brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Ecommerce,
    B2b,
    Saas,
    Hospitality,
}

impl Industry {
    pub const ALL: [Industry; 4] = [
        Industry::Saas,
        Industry::Ecommerce,
        Industry::B2b,
        Industry::Hospitality,
    ];

    /// Human-readable name shown next to the key in pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Saas => "SaaS / Teknologi",
            Self::Ecommerce => "E-Commerce",
            Self::B2b => "B2B Service",
            Self::Hospitality => "Hospitality",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ecommerce => "ecommerce",
            Self::B2b => "b2b",
            Self::Saas => "saas",
            Self::Hospitality => "hospitality",
        };
        f.pad(s)
    }
}

impl FromStr for Industry {
    type Err = IndustryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecommerce" => Ok(Self::Ecommerce),
            "b2b" => Ok(Self::B2b),
            "saas" => Ok(Self::Saas),
            "hospitality" => Ok(Self::Hospitality),
            other => Err(IndustryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Industry`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid industry: {0:?} (expected ecommerce, b2b, saas, or hospitality)")]
pub struct IndustryParseError(pub String);

// ---------------------------------------------------------------------------

/// Primary marketing objective. Selects plays, weekly focus and KPI insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Brand,
    Lead,
    Sales,
    Retention,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::Brand, Goal::Lead, Goal::Sales, Goal::Retention];

    pub fn label(self) -> &'static str {
        match self {
            Self::Brand => "Awareness",
            Self::Lead => "Lead Generation",
            Self::Sales => "Penjualan",
            Self::Retention => "Retensi",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Brand => "brand",
            Self::Lead => "lead",
            Self::Sales => "sales",
            Self::Retention => "retention",
        };
        f.pad(s)
    }
}

impl FromStr for Goal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand" => Ok(Self::Brand),
            "lead" => Ok(Self::Lead),
            "sales" => Ok(Self::Sales),
            "retention" => Ok(Self::Retention),
            other => Err(GoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Goal`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid goal: {0:?} (expected brand, lead, sales, or retention)")]
pub struct GoalParseError(pub String);

// ---------------------------------------------------------------------------

/// Persona key produced by the audience classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKey {
    YoungProfessional,
    BusinessOwner,
    YoungParent,
}

impl ArchetypeKey {
    pub const ALL: [ArchetypeKey; 3] = [
        ArchetypeKey::YoungProfessional,
        ArchetypeKey::BusinessOwner,
        ArchetypeKey::YoungParent,
    ];

    /// Persona name in the catalog's locale.
    pub fn label(self) -> &'static str {
        match self {
            Self::YoungProfessional => "profesional muda",
            Self::BusinessOwner => "pemilik bisnis",
            Self::YoungParent => "orang tua muda",
        }
    }
}

impl fmt::Display for ArchetypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::YoungProfessional => "young_professional",
            Self::BusinessOwner => "business_owner",
            Self::YoungParent => "young_parent",
        };
        f.pad(s)
    }
}

impl FromStr for ArchetypeKey {
    type Err = ArchetypeKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "young_professional" => Ok(Self::YoungProfessional),
            "business_owner" => Ok(Self::BusinessOwner),
            "young_parent" => Ok(Self::YoungParent),
            other => Err(ArchetypeKeyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ArchetypeKey`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid archetype key: {0:?} (expected young_professional, business_owner, or young_parent)")]
pub struct ArchetypeKeyParseError(pub String);

/// Coarse bucket of monthly spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    Lean,
    Growth,
    Scale,
}

impl fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lean => "lean",
            Self::Growth => "growth",
            Self::Scale => "scale",
        };
        f.pad(s)
    }
}

/// Label of a messaging pillar. Always emitted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PillarLabel {
    Emosi,
    Rasional,
    Urgensi,
}

impl fmt::Display for PillarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Emosi => "Emosi",
            Self::Rasional => "Rasional",
            Self::Urgensi => "Urgensi",
        };
        f.pad(s)
    }
}

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

/// Errors raised when building an [`InputSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("budget must be greater than zero")]
    ZeroBudget,

    #[error("budget {0} exceeds the maximum of {max}", max = InputSnapshot::MAX_BUDGET)]
    BudgetTooLarge(u64),
}

/// One immutable set of planner inputs.
///
/// `budget` is in whole currency units. Out-of-domain values are rejected
/// at construction: negative amounts cannot be represented and zero is
/// refused with [`SnapshotError::ZeroBudget`]. Budgets above
/// [`InputSnapshot::MAX_BUDGET`] are refused with
/// [`SnapshotError::BudgetTooLarge`], since allocation works in `f64`. No
/// range clamping happens here; that belongs to whatever collects the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSnapshot")]
pub struct InputSnapshot {
    brand_name: String,
    industry: Industry,
    goal: Goal,
    budget: u64,
    tone: String,
    audience: String,
}

impl InputSnapshot {
    pub const DEFAULT_BRAND_NAME: &'static str = "Nimbus Labs";
    pub const DEFAULT_INDUSTRY: Industry = Industry::Saas;
    pub const DEFAULT_GOAL: Goal = Goal::Lead;
    pub const DEFAULT_BUDGET: u64 = 30_000_000;
    pub const DEFAULT_TONE: &'static str = "visioner dan solutif";
    pub const DEFAULT_AUDIENCE: &'static str = "Profesional muda di kota besar";

    /// Largest accepted budget, 2^53: every amount up to here is exact in `f64`.
    pub const MAX_BUDGET: u64 = 1 << 53;

    pub fn new(
        brand_name: impl Into<String>,
        industry: Industry,
        goal: Goal,
        budget: u64,
        tone: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, SnapshotError> {
        check_budget(budget)?;
        Ok(Self {
            brand_name: brand_name.into(),
            industry,
            goal,
            budget,
            tone: tone.into(),
            audience: audience.into(),
        })
    }

    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    pub fn industry(&self) -> Industry {
        self.industry
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = brand_name.into();
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = industry;
        self
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goal = goal;
        self
    }

    /// Replace the budget. Fails on zero or above [`Self::MAX_BUDGET`], like
    /// [`InputSnapshot::new`].
    pub fn with_budget(mut self, budget: u64) -> Result<Self, SnapshotError> {
        check_budget(budget)?;
        self.budget = budget;
        Ok(self)
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Short stable identifier for this snapshot.
    ///
    /// First 16 hex chars of SHA-256 over the canonical JSON encoding, so
    /// structurally equal snapshots always share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "brandName": self.brand_name,
            "industry": self.industry,
            "goal": self.goal,
            "budget": self.budget,
            "tone": self.tone,
            "audience": self.audience,
        });
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        hex::encode(digest)[..16].to_string()
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            brand_name: Self::DEFAULT_BRAND_NAME.to_string(),
            industry: Self::DEFAULT_INDUSTRY,
            goal: Self::DEFAULT_GOAL,
            budget: Self::DEFAULT_BUDGET,
            tone: Self::DEFAULT_TONE.to_string(),
            audience: Self::DEFAULT_AUDIENCE.to_string(),
        }
    }
}

fn check_budget(budget: u64) -> Result<(), SnapshotError> {
    if budget == 0 {
        return Err(SnapshotError::ZeroBudget);
    }
    if budget > InputSnapshot::MAX_BUDGET {
        return Err(SnapshotError::BudgetTooLarge(budget));
    }
    Ok(())
}

/// Wire form of [`InputSnapshot`]: every field optional, filled from the
/// defaults, then validated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    brand_name: Option<String>,
    industry: Option<Industry>,
    goal: Option<Goal>,
    budget: Option<u64>,
    tone: Option<String>,
    audience: Option<String>,
}

impl TryFrom<RawSnapshot> for InputSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let d = InputSnapshot::default();
        InputSnapshot::new(
            raw.brand_name.unwrap_or(d.brand_name),
            raw.industry.unwrap_or(d.industry),
            raw.goal.unwrap_or(d.goal),
            raw.budget.unwrap_or(d.budget),
            raw.tone.unwrap_or(d.tone),
            raw.audience.unwrap_or(d.audience),
        )
    }
}

// ---------------------------------------------------------------------------
// Catalog entry types
// ---------------------------------------------------------------------------

/// Titled recommendation snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

impl Insight {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Positioning guidance for one industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryPreset {
    pub differentiator: String,
    #[serde(alias = "audience_angle")]
    pub audience_angle: String,
    #[serde(default, alias = "quick_wins")]
    pub quick_wins: Vec<Insight>,
}

/// Campaign play as stored in the catalog, before budget is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlayTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub kpi: String,
    /// Fraction of the monthly budget, in (0, 1].
    #[serde(alias = "budget_share")]
    pub budget_share: f64,
    pub cadence: String,
}

/// Persona profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceArchetype {
    pub headline: String,
    #[serde(default)]
    pub motivators: Vec<String>,
    #[serde(default)]
    pub friction: Vec<String>,
}

/// One day of the weekly focus template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyFocus {
    pub day: String,
    pub focus: String,
    pub action: String,
    pub metric: String,
}

// ---------------------------------------------------------------------------
// Derived types
// ---------------------------------------------------------------------------

/// A play instantiated for a snapshot: description personalised and
/// budget allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlay {
    pub id: String,
    pub name: String,
    pub description: String,
    pub channels: Vec<String>,
    pub deliverables: Vec<String>,
    pub kpi: String,
    pub budget_share: f64,
    pub cadence: String,
    /// Whole currency units, `round(budget_share * snapshot.budget)`.
    pub budget: u64,
}

/// Weekly focus entry whose action names the campaign it drives.
pub type WeeklyPlanEntry = WeeklyFocus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingPillar {
    pub label: PillarLabel,
    pub narrative: String,
}

/// Everything derived from one [`InputSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputBundle {
    pub campaigns: Vec<CampaignPlay>,
    pub weekly_plan: Vec<WeeklyPlanEntry>,
    pub audience_key: ArchetypeKey,
    pub audience_profile: AudienceArchetype,
    pub messaging_pillars: Vec<MessagingPillar>,
    /// `None` when the catalog has no preset for the snapshot's industry.
    /// The renderer decides what to show in its place.
    pub industry_preset: Option<IndustryPreset>,
    pub budget_band: BudgetBand,
    pub budget_insight: Insight,
    pub goal_insights: Vec<Insight>,
}

impl OutputBundle {
    /// Sum of all campaign budgets. Close to, not necessarily equal to, the
    /// snapshot budget.
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    pub fn allocated_total(&self) -> u64 {
        self.campaigns
            .iter()
            .fold(0u64, |total, c| total.saturating_add(c.budget))
    }
}
