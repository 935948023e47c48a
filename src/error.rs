//! Error types for flowdeck operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading the TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The main error type for flowdeck operations.
#[derive(Debug, Error)]
pub enum FlowdeckError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown workflow: {0}")]
    Workflow(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for FlowdeckError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
