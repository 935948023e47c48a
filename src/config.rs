use crate::{
    error::{ConfigError, FlowdeckError},
    layout::leveled::{DEFAULT_FONT_SIZE, DEFAULT_NODE_GAP, DEFAULT_PADDING},
};
use serde::Deserialize;
use std::{fs, path::Path};

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Layout configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Label font size in points
    pub font_size: usize,

    /// Padding between a label and its box edge
    pub padding: f32,

    /// Vertical gap between stacked boxes in one column
    pub node_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            node_gap: DEFAULT_NODE_GAP,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowdeckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(FlowdeckError::Config(ConfigError::MissingFile(
                path.to_path_buf(),
            )));
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(ConfigError::from)?;

        Ok(config)
    }
}
