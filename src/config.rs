//! Configuration file handling.
//!
//! Settings come from `aumdash.toml` in the working directory, or from the
//! file passed with `--config`. Every field has a default, so a partial file
//! (or none at all) is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "aumdash.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub views: ViewConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the yearly batches live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Workbook directory holding one CSV per sheet.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Sheet (batch) names, loaded in this order.
    #[serde(default = "default_sheets")]
    pub sheets: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sheets: default_sheets(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_sheets() -> Vec<String> {
    (2017..=2022).map(|year| format!("Base {year}")).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Advisors shown in the top-advisor ranking.
    #[serde(default = "default_top_advisors")]
    pub top_advisors: usize,

    /// Advisors offered for drill-down.
    #[serde(default = "default_advisor_options")]
    pub advisor_options: usize,

    /// Rows shown by the detail view when `--rows` is absent.
    #[serde(default = "default_detail_rows")]
    pub detail_rows: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            top_advisors: default_top_advisors(),
            advisor_options: default_advisor_options(),
            detail_rows: default_detail_rows(),
        }
    }
}

fn default_top_advisors() -> usize {
    10
}

fn default_advisor_options() -> usize {
    20
}

fn default_detail_rows() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Cap on data rows written to the workbook export.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
        }
    }
}

fn default_max_rows() -> usize {
    10_000
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Explicit path if given, else `aumdash.toml` when present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            log::info!("Using configuration from {}", default_path.display());
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }
}
