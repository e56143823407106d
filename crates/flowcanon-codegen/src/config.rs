// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::path::PathBuf;

/// Build pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root directory generated artifacts are written to
    pub output_dir: PathBuf,
    /// Crate name of the generated code (prefix of every indexed type path)
    pub crate_name: String,
    /// Crate providing the builder API the generated code calls into
    pub runtime_crate: String,
    /// Type-check generated sources with rustc after syntax compilation
    pub rustc_check: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(".flowcanon/generated"),
            crate_name: "flowcanon_app".to_string(),
            runtime_crate: "flowcanon_runtime".to_string(),
            rustc_check: false,
        }
    }
}

impl BuildConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `FLOWCANON_OUTPUT_DIR`: artifact output root (default: .flowcanon/generated)
    /// - `FLOWCANON_CRATE_NAME`: generated crate name (default: flowcanon_app)
    /// - `FLOWCANON_RUNTIME_CRATE`: builder API crate (default: flowcanon_runtime)
    /// - `FLOWCANON_RUSTC_CHECK`: `true`/`false`, run rustc on generated code (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let output_dir = std::env::var("FLOWCANON_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let crate_name = std::env::var("FLOWCANON_CRATE_NAME").unwrap_or(defaults.crate_name);
        if !is_crate_name(&crate_name) {
            return Err(ConfigError::Invalid(
                "FLOWCANON_CRATE_NAME",
                "must be a valid Rust crate name (letters, digits, underscores)",
            ));
        }

        let runtime_crate =
            std::env::var("FLOWCANON_RUNTIME_CRATE").unwrap_or(defaults.runtime_crate);
        if !is_crate_name(&runtime_crate) {
            return Err(ConfigError::Invalid(
                "FLOWCANON_RUNTIME_CRATE",
                "must be a valid Rust crate name (letters, digits, underscores)",
            ));
        }

        let rustc_check = match std::env::var("FLOWCANON_RUSTC_CHECK") {
            Ok(value) => parse_bool(&value)
                .ok_or(ConfigError::Invalid("FLOWCANON_RUSTC_CHECK", "must be true or false"))?,
            Err(_) => defaults.rustc_check,
        };

        Ok(Self {
            output_dir,
            crate_name,
            runtime_crate,
            rustc_check,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn is_crate_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
