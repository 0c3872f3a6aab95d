//! Domain error types for formkit
//!
//! - `SelectorError` for option lists and index changes
//! - `ConfigError` for the configuration file and key bindings
//! - `FormError` as the top-level error type

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for formkit
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or driving a `Selector`
#[derive(Debug, Error, PartialEq)]
pub enum SelectorError {
    #[error("invalid option {0}")]
    InvalidOption(String),

    #[error("selector needs at least one option")]
    Empty,

    #[error("index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors related to the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown key name '{0}'")]
    UnknownKey(String),

    #[error("Selector '{0}': {1}")]
    Selector(String, SelectorError),
}

/// Result type alias for FormError
pub type Result<T> = std::result::Result<T, FormError>;

/// Result type alias for SelectorError
pub type SelectorResult<T> = std::result::Result<T, SelectorError>;

/// Result type alias for ConfigError
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
