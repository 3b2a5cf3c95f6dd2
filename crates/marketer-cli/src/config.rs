//! Configuration file management for marketer.
//!
//! Provides a TOML-based config file at `~/.config/marketer/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use marketer_core::{Catalog, Goal, Industry, InputSnapshot};

/// Env var naming a catalog file to use instead of the built-in one.
pub const CATALOG_ENV: &str = "MARKETER_CATALOG";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// Form defaults. Unset fields fall back to the built-in defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DefaultsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Path to a catalog TOML file. Absent means the built-in catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl DefaultsSection {
    /// The built-in defaults, spelled out so `marketer init` writes a file
    /// the user can edit.
    pub fn builtin() -> Self {
        let d = InputSnapshot::default();
        Self {
            brand_name: Some(d.brand_name().to_string()),
            industry: Some(d.industry()),
            goal: Some(d.goal()),
            budget: Some(d.budget()),
            tone: Some(d.tone().to_string()),
            audience: Some(d.audience().to_string()),
        }
    }

    /// Overlay these defaults onto the built-in snapshot.
    pub fn to_snapshot(&self) -> Result<InputSnapshot> {
        let mut snapshot = InputSnapshot::default();
        if let Some(ref brand_name) = self.brand_name {
            snapshot = snapshot.with_brand_name(brand_name.clone());
        }
        if let Some(industry) = self.industry {
            snapshot = snapshot.with_industry(industry);
        }
        if let Some(goal) = self.goal {
            snapshot = snapshot.with_goal(goal);
        }
        if let Some(budget) = self.budget {
            snapshot = snapshot
                .with_budget(budget)
                .context("invalid budget in config defaults")?;
        }
        if let Some(ref tone) = self.tone {
            snapshot = snapshot.with_tone(tone.clone());
        }
        if let Some(ref audience) = self.audience {
            snapshot = snapshot.with_audience(audience.clone());
        }
        Ok(snapshot)
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the marketer config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/marketer` or `~/.config/marketer`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("marketer");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("marketer")
}

/// Return the path to the marketer config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns an error if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Load the config file if there is one.
///
/// A missing file is not an error; a file that exists but does not parse is.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write a config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct MarketerConfig {
    pub catalog: Catalog,
    /// Snapshot that CLI flags are applied on top of.
    pub defaults: InputSnapshot,
}

impl MarketerConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Catalog: `cli_catalog` > `MARKETER_CATALOG` env > `catalog.path` > built-in
    /// - Defaults: `[defaults]` in the config file > built-in defaults
    pub fn resolve(cli_catalog: Option<&Path>) -> Result<Self> {
        let file_config = load_config()?;
        Self::resolve_with(cli_catalog, file_config)
    }

    fn resolve_with(cli_catalog: Option<&Path>, file_config: Option<ConfigFile>) -> Result<Self> {
        let file_config = file_config.unwrap_or_default();

        let catalog_path = if let Some(path) = cli_catalog {
            Some(path.to_path_buf())
        } else if let Ok(path) = std::env::var(CATALOG_ENV) {
            Some(PathBuf::from(path))
        } else {
            file_config.catalog.path.clone()
        };

        let catalog = match catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "using catalog file");
                Catalog::load(&path)
                    .with_context(|| format!("failed to load catalog {}", path.display()))?
            }
            None => Catalog::builtin().clone(),
        };

        let defaults = file_config.defaults.to_snapshot()?;

        Ok(Self { catalog, defaults })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
