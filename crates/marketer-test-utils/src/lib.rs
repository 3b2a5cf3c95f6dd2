//! Shared test fixtures for marketer integration tests.
//!
//! Provides a small catalog with deliberate gaps (missing industries, an
//! empty play list, drifting shares) and a few ready-made snapshots.

use std::path::PathBuf;

use marketer_core::{Catalog, Goal, Industry, InputSnapshot};

/// TOML of the fixture catalog.
pub const FIXTURE_CATALOG_TOML: &str = include_str!("../fixtures/catalog.toml");

/// Parse the fixture catalog.
pub fn fixture_catalog() -> Catalog {
    Catalog::from_toml_str(FIXTURE_CATALOG_TOML).expect("fixture catalog should be valid")
}

/// Path to the fixture catalog file on disk.
pub fn fixture_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("catalog.toml")
}

/// The "Acme" snapshot: saas, sales goal, 40M budget, SME-owner audience.
pub fn acme_snapshot() -> InputSnapshot {
    InputSnapshot::new(
        "Acme",
        Industry::Saas,
        Goal::Sales,
        40_000_000,
        "bold",
        "pemilik UMKM",
    )
    .expect("acme snapshot should be valid")
}

/// One snapshot per goal/industry pair, with the default tone and audience.
pub fn snapshot_grid(budget: u64) -> Vec<InputSnapshot> {
    let base = InputSnapshot::default()
        .with_budget(budget)
        .expect("grid budget should be valid");
    Goal::ALL
        .iter()
        .flat_map(|goal| {
            let base = base.clone();
            Industry::ALL
                .iter()
                .map(move |industry| base.clone().with_goal(*goal).with_industry(*industry))
        })
        .collect()
}
