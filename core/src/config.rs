//! Analyzer configuration, read from a TOML file such as:
//!
//! ```toml
//! [trace]
//! extra-offset = 1
//! max-trace = -1
//!
//! [report]
//! format = "json"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    pub trace: TraceConfig,
    pub report: ReportConfig,
}

/// Bounds applied to every per-path interpreter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TraceConfig {
    /// Instructions to keep consuming after the call-site ceiling is crossed.
    pub extra_offset: i64,
    /// Replaces the call-site index as the ceiling; `-1` disables the ceiling.
    pub max_trace: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl AnalyzerConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("Failed to parse analyzer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("Invalid config '{}'", path.display()))
    }
}
