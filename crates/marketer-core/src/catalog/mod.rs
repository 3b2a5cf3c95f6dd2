//! Reference catalog: industry presets, campaign plays, audience archetypes,
//! KPI insights and weekly focus templates.
//!
//! The built-in catalog lives in `catalog.toml` and is embedded in the binary
//! at compile time. Alternative catalogs (a maintainer's file, a test
//! fixture) go through the same parser and validation.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    ArchetypeKey, AudienceArchetype, CampaignPlayTemplate, Goal, Industry, IndustryPreset,
    Insight, WeeklyFocus,
};

/// Number of entries every weekly focus template must have.
pub const WEEKLY_FOCUS_LEN: usize = 3;

/// Number of KPI insights every goal must have.
pub const GOAL_INSIGHT_LEN: usize = 2;

/// How far a goal's share total may drift from 1.0 before loading warns.
pub const SHARE_DRIFT_TOLERANCE: f64 = 0.005;

/// The embedded catalog TOML.
static CATALOG_TOML: &str = include_str!("catalog.toml");

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::from_toml_str(CATALOG_TOML).expect("embedded catalog.toml is invalid")
});

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to read catalog file {path:?}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unknown {section} key {key:?}")]
    UnknownKey { section: &'static str, key: String },

    #[error("{section} has no entry for goal {goal:?}")]
    MissingGoal { section: &'static str, goal: Goal },

    #[error("archetype {0:?} is missing")]
    MissingArchetype(ArchetypeKey),

    #[error("weekly focus for goal {goal:?} has {len} entries (expected 3)")]
    WeeklyFocusLength { goal: Goal, len: usize },

    #[error("insights for goal {goal:?} has {len} entries (expected 2)")]
    GoalInsightLength { goal: Goal, len: usize },

    #[error("play {id:?} for goal {goal:?} has budget share {share} (expected 0 < share <= 1)")]
    InvalidShare { goal: Goal, id: String, share: f64 },

    #[error("duplicate play id {id:?} for goal {goal:?}")]
    DuplicatePlayId { goal: Goal, id: String },
}

// ---------------------------------------------------------------------------
// On-disk format
// ---------------------------------------------------------------------------

/// Container for deserializing a catalog TOML file. Keys stay strings here
/// so unknown keys can be reported by section.
#[derive(Debug, Deserialize)]
struct CatalogToml {
    #[serde(default)]
    industries: BTreeMap<String, IndustryPreset>,
    #[serde(default)]
    plays: BTreeMap<String, Vec<CampaignPlayTemplate>>,
    #[serde(default)]
    archetypes: BTreeMap<String, AudienceArchetype>,
    #[serde(default)]
    insights: BTreeMap<String, Vec<Insight>>,
    #[serde(default)]
    weekly_focus: BTreeMap<String, Vec<WeeklyFocus>>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Validated, read-only lookup tables.
///
/// Every [`Goal`] and every [`ArchetypeKey`] is guaranteed to be present, so
/// goal and archetype lookups cannot miss. Industries are optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    industries: BTreeMap<Industry, IndustryPreset>,
    plays: BTreeMap<Goal, Vec<CampaignPlayTemplate>>,
    archetypes: BTreeMap<ArchetypeKey, AudienceArchetype>,
    insights: BTreeMap<Goal, Vec<Insight>>,
    weekly_focus: BTreeMap<Goal, Vec<WeeklyFocus>>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    ///
    /// # Panics
    ///
    /// Panics on first use if the embedded TOML is invalid. The embedded file
    /// is covered by tests, so a built binary always has a valid catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parse and validate a catalog TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let raw: CatalogToml = toml::from_str(content)?;
        let catalog = Self::from_raw(raw)?;
        catalog.warn_on_share_drift();
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loading catalog");
        Self::from_toml_str(&content)
    }

    fn from_raw(raw: CatalogToml) -> Result<Self, CatalogError> {
        let industries = rekey(raw.industries, "industries", |k| k.parse::<Industry>().ok())?;
        let plays = rekey(raw.plays, "plays", |k| k.parse::<Goal>().ok())?;
        let archetypes = rekey(raw.archetypes, "archetypes", |k| {
            k.parse::<ArchetypeKey>().ok()
        })?;
        let insights = rekey(raw.insights, "insights", |k| k.parse::<Goal>().ok())?;
        let weekly_focus = rekey(raw.weekly_focus, "weekly_focus", |k| k.parse::<Goal>().ok())?;

        for goal in Goal::ALL {
            let goal_plays = plays.get(&goal).ok_or(CatalogError::MissingGoal {
                section: "plays",
                goal,
            })?;
            validate_plays(goal, goal_plays)?;

            let focus = weekly_focus.get(&goal).ok_or(CatalogError::MissingGoal {
                section: "weekly_focus",
                goal,
            })?;
            if focus.len() != WEEKLY_FOCUS_LEN {
                return Err(CatalogError::WeeklyFocusLength {
                    goal,
                    len: focus.len(),
                });
            }

            let goal_insights = insights.get(&goal).ok_or(CatalogError::MissingGoal {
                section: "insights",
                goal,
            })?;
            if goal_insights.len() != GOAL_INSIGHT_LEN {
                return Err(CatalogError::GoalInsightLength {
                    goal,
                    len: goal_insights.len(),
                });
            }
        }

        for key in ArchetypeKey::ALL {
            if !archetypes.contains_key(&key) {
                return Err(CatalogError::MissingArchetype(key));
            }
        }

        Ok(Self {
            industries,
            plays,
            archetypes,
            insights,
            weekly_focus,
        })
    }

    fn warn_on_share_drift(&self) {
        for goal in Goal::ALL {
            let total = self.share_total(goal);
            if self.campaign_templates(goal).is_empty() {
                continue;
            }
            if (total - 1.0).abs() > SHARE_DRIFT_TOLERANCE {
                tracing::warn!(
                    %goal,
                    total,
                    "budget shares do not add up to 1.0; allocations will not match the budget"
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Industry preset, or `None` when this catalog has no entry for it.
    pub fn industry_preset(&self, industry: Industry) -> Option<&IndustryPreset> {
        self.industries.get(&industry)
    }

    /// Play templates for a goal, in catalog order.
    pub fn campaign_templates(&self, goal: Goal) -> &[CampaignPlayTemplate] {
        self.plays.get(&goal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The weekly focus template for a goal.
    pub fn weekly_focus(&self, goal: Goal) -> &[WeeklyFocus] {
        self.weekly_focus.get(&goal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// KPI insights for a goal.
    pub fn goal_insights(&self, goal: Goal) -> &[Insight] {
        self.insights.get(&goal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn archetype(&self, key: ArchetypeKey) -> Option<&AudienceArchetype> {
        self.archetypes.get(&key)
    }

    /// Sum of `budget_share` over a goal's plays.
    pub fn share_total(&self, goal: Goal) -> f64 {
        self.campaign_templates(goal)
            .iter()
            .map(|t| t.budget_share)
            .sum()
    }
}

/// Convert a string-keyed section into an enum-keyed map, failing on the
/// first key that does not parse.
fn rekey<K: Ord, V>(
    section: BTreeMap<String, V>,
    name: &'static str,
    parse: impl Fn(&str) -> Option<K>,
) -> Result<BTreeMap<K, V>, CatalogError> {
    section
        .into_iter()
        .map(|(key, value)| match parse(&key) {
            Some(k) => Ok((k, value)),
            None => Err(CatalogError::UnknownKey { section: name, key }),
        })
        .collect()
}

fn validate_plays(goal: Goal, plays: &[CampaignPlayTemplate]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for play in plays {
        if !seen.insert(play.id.as_str()) {
            return Err(CatalogError::DuplicatePlayId {
                goal,
                id: play.id.clone(),
            });
        }
        // Written so that NaN fails too.
        if !(play.budget_share > 0.0 && play.budget_share <= 1.0) {
            return Err(CatalogError::InvalidShare {
                goal,
                id: play.id.clone(),
                share: play.budget_share,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn play_line(goal: Goal) -> String {
        format!(
            "{goal} = [{{ id = \"{goal}-play\", name = \"{goal} play\", \
             description = \"brand play\", kpi = \"kpi\", budget_share = 1.0, \
             cadence = \"weekly\" }}]\n"
        )
    }

    /// Smallest valid catalog: one play per goal, every archetype present.
    fn minimal_toml() -> String {
        let mut s = String::from("[plays]\n");
        for goal in Goal::ALL {
            s.push_str(&play_line(goal));
        }
        s.push('\n');
        for goal in Goal::ALL {
            for i in 0..GOAL_INSIGHT_LEN {
                s.push_str(&format!(
                    "[[insights.{goal}]]\ntitle = \"t{i}\"\ndetail = \"d{i}\"\n\n"
                ));
            }
            for day in ["Senin", "Rabu", "Jumat"] {
                s.push_str(&format!(
                    "[[weekly_focus.{goal}]]\nday = \"{day}\"\nfocus = \"f\"\n\
                     action = \"a\"\nmetric = \"m\"\n\n"
                ));
            }
        }
        for key in ArchetypeKey::ALL {
            s.push_str(&format!("[archetypes.{key}]\nheadline = \"{key}\"\n\n"));
        }
        s
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        for goal in Goal::ALL {
            assert_eq!(catalog.campaign_templates(goal).len(), 3);
            assert_eq!(catalog.weekly_focus(goal).len(), WEEKLY_FOCUS_LEN);
            assert_eq!(catalog.goal_insights(goal).len(), GOAL_INSIGHT_LEN);
        }
        for key in ArchetypeKey::ALL {
            assert!(catalog.archetype(key).is_some());
        }
    }

    #[test]
    fn builtin_has_every_industry() {
        let catalog = Catalog::builtin();
        for industry in Industry::ALL {
            let preset = catalog
                .industry_preset(industry)
                .unwrap_or_else(|| panic!("missing preset for {industry}"));
            assert_eq!(preset.quick_wins.len(), 2);
        }
    }

    #[test]
    fn builtin_shares_add_up() {
        let catalog = Catalog::builtin();
        for goal in Goal::ALL {
            let total = catalog.share_total(goal);
            assert!(
                (total - 1.0).abs() <= SHARE_DRIFT_TOLERANCE,
                "{goal} shares add up to {total}"
            );
        }
    }

    #[test]
    fn builtin_play_order_is_catalog_order() {
        let ids: Vec<&str> = Catalog::builtin()
            .campaign_templates(Goal::Sales)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["promo-acceleration", "creator-collab", "retarget-automation"]
        );
    }

    #[test]
    fn minimal_catalog_parses_without_industries() {
        let catalog = Catalog::from_toml_str(&minimal_toml()).expect("should parse");
        assert!(catalog.industry_preset(Industry::Saas).is_none());
        assert!(Industry::ALL.iter().all(|i| catalog.industry_preset(*i).is_none()));
    }

    #[test]
    fn empty_play_list_is_allowed() {
        let toml_str = minimal_toml().replace(&play_line(Goal::Sales), "sales = []\n");
        let catalog = Catalog::from_toml_str(&toml_str).expect("should parse");
        assert!(catalog.campaign_templates(Goal::Sales).is_empty());
        assert_eq!(catalog.share_total(Goal::Sales), 0.0);
    }

    #[test]
    fn missing_goal_is_rejected() {
        let toml_str = minimal_toml().replace(&play_line(Goal::Retention), "");
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingGoal {
                section: "plays",
                goal: Goal::Retention
            }
        ));
    }

    #[test]
    fn unknown_goal_key_is_rejected() {
        let toml_str = minimal_toml().replace("[[insights.retention]]", "[[insights.other]]");
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(
            matches!(err, CatalogError::UnknownKey { section: "insights", ref key } if key == "other"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_archetype_is_rejected() {
        let toml_str = minimal_toml().replace(
            "[archetypes.young_parent]\nheadline = \"young_parent\"\n",
            "",
        );
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingArchetype(ArchetypeKey::YoungParent)
        ));
    }

    #[test]
    fn zero_share_is_rejected() {
        let toml_str = minimal_toml().replacen("budget_share = 1.0", "budget_share = 0.0", 1);
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidShare { goal: Goal::Brand, .. }));
    }

    #[test]
    fn share_above_one_is_rejected() {
        let toml_str = minimal_toml().replacen("budget_share = 1.0", "budget_share = 1.5", 1);
        assert!(Catalog::from_toml_str(&toml_str).is_err());
    }

    #[test]
    fn short_weekly_focus_is_rejected() {
        let toml_str = minimal_toml().replacen(
            "[[weekly_focus.brand]]\nday = \"Jumat\"\nfocus = \"f\"\naction = \"a\"\nmetric = \"m\"\n\n",
            "",
            1,
        );
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::WeeklyFocusLength {
                goal: Goal::Brand,
                len: 2
            }
        ));
    }

    #[test]
    fn duplicate_play_id_is_rejected() {
        let twice = "lead = [\
            { id = \"p\", name = \"a\", description = \"d\", kpi = \"k\", budget_share = 0.5, cadence = \"c\" }, \
            { id = \"p\", name = \"b\", description = \"d\", kpi = \"k\", budget_share = 0.5, cadence = \"c\" }\
            ]\n";
        let toml_str = minimal_toml().replace(&play_line(Goal::Lead), twice);
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePlayId { goal: Goal::Lead, .. }));
    }

    #[test]
    fn unknown_industry_key_is_rejected() {
        let extra = "[industries.fintech]\ndifferentiator = \"d\"\naudience_angle = \"a\"\n";
        let toml_str = format!("{}{extra}", minimal_toml());
        let err = Catalog::from_toml_str(&toml_str).unwrap_err();
        assert!(err.to_string().contains("fintech"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Catalog::from_toml_str("plays = [").unwrap_err();
        assert!(matches!(err, CatalogError::TomlError(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, minimal_toml()).unwrap();
        let catalog = Catalog::load(&path).expect("should load");
        assert_eq!(catalog.campaign_templates(Goal::Lead).len(), 1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
