// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flowcanon Codegen - Process Model Compiler and Build Pipeline
//!
//! This crate translates process models into Rust builder code and drives the
//! build around it: generator discovery, artifact generation, compilation,
//! type indexing and derivation of the reflection allow-list used by
//! ahead-of-time packaging.
//!
//! # Architecture
//!
//! ```text
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │  Process    │      │  Generated  │      │  Compiled   │
//!     │   Model     │─────▶│  Artifacts  │─────▶│   Units     │
//!     │  (JSON)     │      │ (generators)│      │ (syn/rustc) │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!           ▲                                         │
//!           │                                         ▼
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │ Capability  │      │ Allow-List  │◀─────│ Type Index  │
//!     │ Validation  │      │ (reflection)│      │  (merged)   │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use flowcanon_codegen::{BuildConfig, BuildPipeline};
//!
//! let pipeline = BuildPipeline::new(BuildConfig::from_env()?);
//! let output = pipeline.run(&models, &environment, &closure)?;
//! println!("{} types preserved", output.allow_list.len());
//! ```
//!
//! # Modules
//!
//! - [`capabilities`]: Environment capability rules gating REST generation
//! - [`codegen`]: Process model to builder-call translation
//! - [`generators`]: Generator discovery and the collision barrier
//! - [`compile`]: Syntax compilation and optional rustc type-check
//! - [`index`]: Type index construction
//! - [`reflection`]: Reflection allow-list derivation
//! - [`pipeline`]: Stage orchestration

#![deny(missing_docs)]

/// Capability validation of the build environment.
pub mod capabilities;

/// AST code generation from process models.
pub mod codegen;

/// Compilation of generated sources.
pub mod compile;

/// Configuration from environment variables.
pub mod config;

/// Build pipeline errors.
pub mod error;

/// Generator registry and built-in generators.
pub mod generators;

/// Type indexing of compiled sources.
pub mod index;

/// Build orchestration.
pub mod pipeline;

/// Reflection allow-list derivation.
pub mod reflection;

// Re-export main types
pub use capabilities::{CapabilityOutcome, GENERATE_REST_PROPERTY, MissingCapability};
pub use codegen::ast::nodes::VisitorSet;
pub use codegen::ast::{FaultReason, TranslationFault, compile_process};
pub use compile::{CompiledUnit, RustcCompiler, SourceCompiler, SyntaxCompiler};
pub use config::{BuildConfig, ConfigError};
pub use error::{BuildError, Result};
pub use generators::{ArtifactKind, GeneratedArtifact, GenerationContext, Generator};
pub use pipeline::{BuildOutput, BuildPipeline};
pub use reflection::{AllowListEntry, OptionalGroup, ReflectionTable, derive_allow_list};

// Re-export model types for convenience
pub use flowcanon_model::{DependencyClosure, EnvironmentDescriptor, ProcessModel, TypeIndex};
