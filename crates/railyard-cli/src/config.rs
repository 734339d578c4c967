//! CLI configuration management.

use anyhow::{Context, bail};
use railyard_core::runner::Backend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Backend whose runner names are emitted.
    #[serde(default)]
    pub backend: Backend,
    /// Environment recorded on resolved applications.
    #[serde(default = "default_environment")]
    pub default_environment: String,
    /// Declaration file used when no path is given.
    #[serde(default = "default_declarations")]
    pub declarations: String,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_declarations() -> String {
    "railyard.yaml".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            backend: Backend::default(),
            default_environment: default_environment(),
            declarations: default_declarations(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl CliConfig {
    /// Load configuration from file.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "railyard", "railyard")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "output_format" => {
                self.output_format = match value {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    "yaml" => OutputFormat::Yaml,
                    _ => bail!("Invalid output format: {}", value),
                };
            }
            "backend" => self.backend = value.parse()?,
            "default_environment" => {
                if value.trim().is_empty() {
                    bail!("Environment cannot be empty");
                }
                self.default_environment = value.to_string();
            }
            "declarations" => self.declarations = value.to_string(),
            _ => bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config: CliConfig = serde_yaml::from_str("backend: azure\n").unwrap();
        assert_eq!(config.backend, Backend::Azure);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert_eq!(config.default_environment, "development");
        assert_eq!(config.declarations, "railyard.yaml");
    }

    #[test]
    fn test_set_known_keys() {
        let mut config = CliConfig::default();
        config.set("output_format", "json").unwrap();
        config.set("backend", "local").unwrap();
        config.set("default_environment", "staging").unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.default_environment, "staging");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = CliConfig::default();
        assert!(config.set("output_format", "xml").is_err());
        assert!(config.set("backend", "jenkins").is_err());
        assert!(config.set("default_environment", " ").is_err());
        assert!(config.set("api_url", "http://localhost").is_err());
    }
}
