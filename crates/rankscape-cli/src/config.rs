//! Configuration for the `rankscape` binary.
//!
//! Settings come from a TOML file (default `<config_dir>/rankscape/config.toml`),
//! then `RANKSCAPE_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rankscape_core::{ScoreFamily, SortOption};
use rankscape_grid::{DEFAULT_RESOLUTION, Scale, check_resolution, default_scales};
use rankscape_render::{Colormap, FigureLayout, NormParams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_DIR: &str = "RANKSCAPE_OUTPUT_DIR";
/// Environment variable overriding the grid resolution.
pub const ENV_RESOLUTION: &str = "RANKSCAPE_RESOLUTION";
/// Environment variable overriding the colour map.
pub const ENV_COLORMAP: &str = "RANKSCAPE_COLORMAP";

// ============================================================================
// ConfigManager
// ============================================================================

/// A TOML-backed configuration that the `config` sub-commands can manage.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name, used for the config directory.
    fn project_name() -> &'static str;

    /// Platform default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Explicit path if given, else the platform default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit.map(PathBuf::from).or_else(Self::default_config_path)
    }

    /// Load the effective configuration.
    fn load(explicit: Option<&str>) -> Result<Self>;

    /// Serialize as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))
    }

    /// Environment variables reproducing the overridable settings.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;

    /// Checks that deserialization alone cannot express.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// RankscapeConfig
// ============================================================================

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

fn default_scenarios() -> Vec<SortOption> {
    SortOption::default_scenarios()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankscapeConfig {
    /// Directory plots are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Samples per grid axis.
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    /// Fixed reference date for date sorts; now when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<DateTime<Utc>>,

    /// Scenarios plotted when none are given on the command line.
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<SortOption>,

    /// Also write per-scale CSV files.
    #[serde(default)]
    pub export_csv: bool,

    /// Rendering settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Scale overrides.
    #[serde(default)]
    pub scales: ScalesConfig,
}

impl Default for RankscapeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            resolution: default_resolution(),
            reference_date: None,
            scenarios: default_scenarios(),
            export_csv: false,
            render: RenderConfig::default(),
            scales: ScalesConfig::default(),
        }
    }
}

fn default_linthresh() -> f64 {
    NormParams::default().linthresh
}

fn default_linscale() -> f64 {
    NormParams::default().linscale
}

fn default_base() -> f64 {
    NormParams::default().base
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Colour map name.
    #[serde(default)]
    pub colormap: Colormap,

    /// Symmetric-log linear threshold.
    #[serde(default = "default_linthresh")]
    pub linthresh: f64,

    /// Symmetric-log linear scale.
    #[serde(default = "default_linscale")]
    pub linscale: f64,

    /// Symmetric-log base.
    #[serde(default = "default_base")]
    pub base: f64,

    /// Figure layout in pixels.
    #[serde(default)]
    pub layout: FigureLayout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            linthresh: default_linthresh(),
            linscale: default_linscale(),
            base: default_base(),
            layout: FigureLayout::default(),
        }
    }
}

impl RenderConfig {
    /// Normalisation parameters.
    pub fn norm(&self) -> NormParams {
        NormParams {
            linthresh: self.linthresh,
            linscale: self.linscale,
            base: self.base,
        }
    }
}

/// `[scales]` section: replaces the built-in scales of a family when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalesConfig {
    /// Bookmark scales.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bookmarks: Vec<Scale>,

    /// Date scales.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Scale>,
}

impl ScalesConfig {
    /// Scales to plot for `family`.
    pub fn for_family(&self, family: ScoreFamily) -> Vec<Scale> {
        let custom = match family {
            ScoreFamily::Bookmarks => &self.bookmarks,
            ScoreFamily::Date => &self.dates,
        };
        if custom.is_empty() {
            default_scales(family)
        } else {
            custom.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        for (family, scales) in [
            (ScoreFamily::Bookmarks, &self.bookmarks),
            (ScoreFamily::Date, &self.dates),
        ] {
            for scale in scales {
                scale.validate()?;
                if scale.range.family() != family {
                    return Err(Error::config(format!(
                        "scale '{}' is listed under the wrong family",
                        scale.label
                    )));
                }
            }
        }
        Ok(())
    }
}

impl RankscapeConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {e}")))
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply overrides from `lookup` (an environment variable reader).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_RESOLUTION) {
            self.resolution = raw
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{ENV_RESOLUTION} is not a number: '{raw}'")))?;
        }
        if let Some(raw) = lookup(ENV_COLORMAP) {
            self.render.colormap = raw.parse()?;
        }
        Ok(())
    }

    /// Apply `RANKSCAPE_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Check values that would otherwise fail deep inside plotting.
    pub fn validate(&self) -> Result<()> {
        check_resolution(self.resolution)?;
        if self.scenarios.is_empty() {
            return Err(Error::config("at least one scenario must be configured"));
        }
        self.render.layout.validate()?;
        self.render.norm().for_range(0.0, 1.0)?;
        self.scales.validate()
    }
}

impl ConfigManager for RankscapeConfig {
    fn project_name() -> &'static str {
        "rankscape"
    }

    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (
                ENV_OUTPUT_DIR.to_string(),
                self.output_dir.display().to_string(),
            ),
            (ENV_RESOLUTION.to_string(), self.resolution.to_string()),
            (ENV_COLORMAP.to_string(), self.render.colormap.to_string()),
        ])
    }

    fn check(&self) -> Result<()> {
        self.validate()
    }
}

// ============================================================================
// Tests
// ============================================================================
