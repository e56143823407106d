// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the build pipeline.
//!
//! Every fault is a deterministic function of the build inputs; nothing here is
//! retried.

use thiserror::Error;

use crate::capabilities::MissingCapability;
use crate::codegen::ast::TranslationFault;
use crate::config::ConfigError;

/// Build pipeline errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// A process model contains a node the visitor set cannot translate.
    #[error("Process '{process_id}': {source}")]
    Translation {
        /// Process whose translation failed
        process_id: String,
        /// The offending node
        #[source]
        source: TranslationFault,
    },

    /// Two generators produced an artifact at the same path.
    #[error("Artifact path '{path}' is produced by both '{first}' and '{second}'")]
    ArtifactCollision {
        /// Colliding relative path
        path: String,
        /// Generator that claimed the path first
        first: String,
        /// Generator that claimed it again
        second: String,
    },

    /// Generated code failed to compile. Always a generator bug.
    #[error(
        "Generated artifact '{path}' failed to compile: {diagnostic}\n\n\
         This is likely a code generation bug. Please report this issue."
    )]
    Compilation {
        /// Artifact the diagnostic points at
        path: String,
        /// Compiler diagnostic
        diagnostic: String,
    },

    /// The environment lacks a capability the configured build requires.
    #[error(transparent)]
    Capability(#[from] MissingCapability),

    /// A templated generator failed to render.
    #[error("Template error in generator '{generator}': {source}")]
    Template {
        /// Generator owning the template
        generator: String,
        /// Rendering error
        #[source]
        source: minijinja::Error,
    },

    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Attach a process id to a translation fault.
    pub fn translation(process_id: impl Into<String>, source: TranslationFault) -> Self {
        BuildError::Translation {
            process_id: process_id.into(),
            source,
        }
    }
}

/// Result type using [`BuildError`].
pub type Result<T> = std::result::Result<T, BuildError>;
