//! Classifiers: map free text and amounts onto catalog keys.

use crate::model::{ArchetypeKey, BudgetBand};

/// Archetype returned for empty text and for text no rule matches.
pub const DEFAULT_ARCHETYPE: ArchetypeKey = ArchetypeKey::YoungProfessional;

/// Upper bound (inclusive) of the lean band, in whole currency units.
pub const LEAN_BUDGET_MAX: u64 = 15_000_000;

/// Upper bound (inclusive) of the growth band, in whole currency units.
pub const GROWTH_BUDGET_MAX: u64 = 45_000_000;

/// Keyword rules in priority order. The first rule with any keyword
/// contained in the normalized text wins.
const AUDIENCE_RULES: &[(&[&str], ArchetypeKey)] = &[
    (&["profesional", "executive"], ArchetypeKey::YoungProfessional),
    (&["bisnis", "umkm"], ArchetypeKey::BusinessOwner),
    (&["orang tua", "ibu"], ArchetypeKey::YoungParent),
];

/// Classify a free-form audience description into a persona key.
///
/// Matching is a plain substring test on the trimmed, lower-cased text.
pub fn classify_audience(text: &str) -> ArchetypeKey {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return DEFAULT_ARCHETYPE;
    }

    AUDIENCE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(_, key)| *key)
        .unwrap_or(DEFAULT_ARCHETYPE)
}

/// Bucket a monthly budget. Boundary values belong to the lower band.
pub fn classify_budget(budget: u64) -> BudgetBand {
    if budget <= LEAN_BUDGET_MAX {
        BudgetBand::Lean
    } else if budget <= GROWTH_BUDGET_MAX {
        BudgetBand::Growth
    } else {
        BudgetBand::Scale
    }
}
