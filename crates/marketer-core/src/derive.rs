//! Derivers: combine a snapshot with catalog entries into one part of the
//! output bundle. All functions here are pure.

use crate::classify::classify_budget;
use crate::model::{
    BudgetBand, CampaignPlay, CampaignPlayTemplate, Goal, InputSnapshot, Insight,
    MessagingPillar, PillarLabel, WeeklyFocus, WeeklyPlanEntry,
};

/// Word in play descriptions that gets replaced by the brand name.
pub const BRAND_PLACEHOLDER: &str = "brand";

/// Campaign name used in the weekly plan when there are no plays.
pub const NO_CAMPAIGN_PLACEHOLDER: &str = "Eksperimen Kanal";

/// Brand name used in messaging when the snapshot's is blank.
pub const FALLBACK_BRAND_NAME: &str = "Brand";

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

/// Instantiate play templates for a snapshot.
///
/// Each play gets `round(budget_share * budget)`, rounding half away from
/// zero. Shares are not normalized, so the allocated total can differ from
/// the snapshot budget by rounding or by catalog drift. Output order is
/// template order.
pub fn instantiate_campaigns(
    templates: &[CampaignPlayTemplate],
    snapshot: &InputSnapshot,
) -> Vec<CampaignPlay> {
    let brand = snapshot.brand_name();
    templates
        .iter()
        .map(|t| CampaignPlay {
            id: t.id.clone(),
            name: t.name.clone(),
            description: personalize_description(&t.description, brand),
            channels: t.channels.clone(),
            deliverables: t.deliverables.clone(),
            kpi: t.kpi.clone(),
            budget_share: t.budget_share,
            cadence: t.cadence.clone(),
            budget: allocate(t.budget_share, snapshot.budget()),
        })
        .collect()
}

/// Replace the first occurrence of [`BRAND_PLACEHOLDER`] with the
/// lower-cased brand name, whitespace included. A blank brand leaves the
/// text unchanged.
fn personalize_description(description: &str, brand: &str) -> String {
    if brand.trim().is_empty() {
        return description.to_string();
    }
    description.replacen(BRAND_PLACEHOLDER, &brand.to_lowercase(), 1)
}

fn allocate(share: f64, budget: u64) -> u64 {
    // Shares are validated to (0, 1], so the product is never negative and
    // never exceeds the budget.
    (share * budget as f64).round() as u64
}

// ---------------------------------------------------------------------------
// Weekly plan
// ---------------------------------------------------------------------------

/// Attach a campaign to each weekly focus entry.
///
/// Entry `i` names `campaigns[i % campaigns.len()]`, so short campaign lists
/// wrap around. With no campaigns the entry names
/// [`NO_CAMPAIGN_PLACEHOLDER`].
pub fn derive_weekly_plan(
    focus: &[WeeklyFocus],
    campaigns: &[CampaignPlay],
) -> Vec<WeeklyPlanEntry> {
    focus
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let campaign_name = if campaigns.is_empty() {
                NO_CAMPAIGN_PLACEHOLDER
            } else {
                campaigns[i % campaigns.len()].name.as_str()
            };
            WeeklyPlanEntry {
                day: entry.day.clone(),
                focus: entry.focus.clone(),
                action: format!("{}. Fokus kampanye: {campaign_name}", entry.action),
                metric: entry.metric.clone(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Messaging pillars
// ---------------------------------------------------------------------------

/// Build the three messaging pillars: Emosi, Rasional, Urgensi.
///
/// Brand name, tone and industry are inserted verbatim.
pub fn derive_messaging_pillars(snapshot: &InputSnapshot) -> Vec<MessagingPillar> {
    let brand = match snapshot.brand_name() {
        name if name.trim().is_empty() => FALLBACK_BRAND_NAME,
        name => name,
    };
    vec![
        MessagingPillar {
            label: PillarLabel::Emosi,
            narrative: format!(
                "{brand} menghadirkan pengalaman {} yang membuat audiens merasa \
                 diperhatikan sejak interaksi pertama.",
                snapshot.tone()
            ),
        },
        MessagingPillar {
            label: PillarLabel::Rasional,
            narrative: format!(
                "Tunjukkan bukti nyata: demo, testimoni, dan data performa yang \
                 relevan untuk industri {}.",
                snapshot.industry()
            ),
        },
        MessagingPillar {
            label: PillarLabel::Urgensi,
            narrative: "Berikan CTA jelas dengan penawaran waktu terbatas atau slot \
                        terbatas untuk mendorong aksi cepat."
                .to_string(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Budget insight
// ---------------------------------------------------------------------------

/// Framing note for the snapshot's budget band.
pub fn derive_budget_insight(budget: u64, goal: Goal) -> Insight {
    match classify_budget(budget) {
        BudgetBand::Lean => Insight::new(
            "Prioritas kanal efisien",
            "Fokus pada konten organik berkualitas + retargeting low cost. \
             Maksimalkan automation untuk meminimalkan biaya operasional.",
        ),
        BudgetBand::Growth => Insight::new(
            "Skala terukur",
            format!(
                "Alokasikan 15% untuk eksperimen kreatif baru dan gunakan mix paid + \
                 automation untuk mencapai tujuan {goal}"
            ),
        ),
        BudgetBand::Scale => Insight::new(
            "Dominasi share of voice",
            "Gabungkan always-on ads dengan program kolaborasi strategis dan channel \
             diversifikasi untuk mempercepat compound growth.",
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
