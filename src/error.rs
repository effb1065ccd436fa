//! Error types for environment resolution.
//!
//! This module defines [`GateError`], the error returned by every fatal
//! failure, [`LoadWarning`] for recoverable env file problems, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems and missing variables halt the calling stage
//! - Env file problems are reported as [`LoadWarning`] and absorbed by the resolver
//! - Every message should tell the operator what to fix

use std::path::PathBuf;
use thiserror::Error;

use crate::environment::validator::MissingVariables;

/// Core error type for environment resolution.
#[derive(Debug, Error)]
pub enum GateError {
    /// The plugin was used before `initialize` or after `cleanup`.
    #[error("Plugin not initialized")]
    NotInitialized,

    /// The variable naming the current environment is absent or empty.
    #[error("{variable} not set")]
    EnvironmentNotSet { variable: String },

    /// The current environment has no entry in the registry.
    #[error(
        "Environment '{name}' not found in configuration. Available: {}",
        available.join(", ")
    )]
    UnknownEnvironment {
        name: String,
        available: Vec<String>,
    },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// One or more required variables are absent after loading.
    #[error(transparent)]
    MissingVariables(#[from] MissingVariables),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GateError {
    /// True for errors caused by missing or inconsistent configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::EnvironmentNotSet { .. }
                | Self::UnknownEnvironment { .. }
                | Self::InvalidConfig { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigParseError { .. }
        )
    }

    /// True when required variables were missing.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::MissingVariables(_))
    }
}

/// A local env file, or a line of it, could not be used.
///
/// Never fatal: the resolver logs it and moves on to validation, and the
/// parser logs a malformed line and moves on to the next one.
#[derive(Debug, Error)]
pub enum LoadWarning {
    /// The env file does not exist.
    #[error("env file not found: {path}")]
    NotFound { path: PathBuf },

    /// The env file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that is not a valid assignment. The line is skipped.
    #[error("invalid line {line} in {path}: {content}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

impl LoadWarning {
    /// Path of the env file this warning refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path }
            | Self::Unreadable { path, .. }
            | Self::Malformed { path, .. } => path,
        }
    }
}

/// Result type alias for environment resolution.
pub type Result<T> = std::result::Result<T, GateError>;
