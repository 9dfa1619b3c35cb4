//! Editor session configuration, loadable from a TOML file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::view::MIN_GRID_STEP;

/// Errors that can occur when loading editor configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Session-level editor settings
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Snapping granularity in world units (clamped to a minimum of 4)
    pub grid_step: f64,
    /// Model name written into exported documents
    pub model_name: String,
    /// Backend endpoint accepting exported XMI for code generation
    pub generate_endpoint: String,
}

#[derive(Deserialize)]
struct TomlConfig {
    grid_step: Option<f64>,
    model_name: Option<String>,
    generate_endpoint: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_step: 16.0,
            model_name: "Project".to_string(),
            generate_endpoint: "http://localhost:8000/generate".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        Ok(Self {
            grid_step: parsed.grid_step.unwrap_or(defaults.grid_step),
            model_name: parsed.model_name.unwrap_or(defaults.model_name),
            generate_endpoint: parsed
                .generate_endpoint
                .unwrap_or(defaults.generate_endpoint),
        })
    }

    /// The effective grid step, never below the minimum.
    pub fn grid_step(&self) -> f64 {
        self.grid_step.max(MIN_GRID_STEP)
    }

    /// Set the grid step
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Set the model name
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.grid_step(), 16.0);
        assert_eq!(config.model_name, "Project");
    }

    #[test]
    fn test_grid_step_clamped() {
        let config = EditorConfig::default().with_grid_step(1.0);
        assert_eq!(config.grid_step(), 4.0);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EditorConfig::from_toml("grid_step = 8.0").expect("should parse");
        assert_eq!(config.grid_step(), 8.0);
        assert_eq!(config.model_name, "Project");
    }

    #[test]
    fn test_from_toml_full() {
        let config = EditorConfig::from_toml(
            r#"
grid_step = 20.0
model_name = "Billing"
generate_endpoint = "http://example.test/generate"
"#,
        )
        .expect("should parse");
        assert_eq!(config.grid_step(), 20.0);
        assert_eq!(config.model_name, "Billing");
        assert_eq!(config.generate_endpoint, "http://example.test/generate");
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(EditorConfig::from_toml("grid_step = {{").is_err());
    }
}
