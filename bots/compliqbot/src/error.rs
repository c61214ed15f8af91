// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for compliqbot

use crate::document::DocumentError;
use thiserror::Error;

/// Main error type for compliqbot
#[derive(Error, Debug)]
pub enum CompliqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CompliqError>;
