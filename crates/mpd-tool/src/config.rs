//! Optional TOML configuration for `mpd-tool`.
//!
//! ```toml
//! [output]
//! format = "json"   # or "text"
//!
//! [log]
//! filter = "mpd_core=debug,info"
//! ```

use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolConfigInput {
    pub output: OutputConfigInput,
    pub log: LogConfigInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfigInput {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfigInput {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub output: OutputFormat,
    pub log_filter: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ToolConfigInput {
    pub fn resolve(self) -> Result<ToolConfig, String> {
        let output = match self.output.format {
            Some(f) => f.parse()?,
            None => OutputFormat::default(),
        };
        let log_filter = self
            .log
            .filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(ToolConfig { output, log_filter })
    }
}

impl ToolConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        if input.trim().is_empty() {
            return Ok(ToolConfig::default());
        }
        let parsed: ToolConfigInput =
            toml::from_str(input).map_err(|e| format!("Invalid config TOML: {}", e))?;
        parsed.resolve()
    }

    /// Load the config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(ToolConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        Self::from_toml_str(&text).map_err(anyhow::Error::msg)
    }
}
