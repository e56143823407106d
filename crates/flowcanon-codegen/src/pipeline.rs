// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Build orchestration.
//!
//! One sequential pass per invocation:
//!
//! ```text
//! validate -> discover -> generate -> write -> compile -> index -> allow-list
//! ```
//!
//! Every stage consumes the previous stage's output. A fault in any stage aborts
//! the build; nothing is retried.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

use crate::capabilities::{self, CapabilityOutcome};
use crate::codegen::ast::nodes::VisitorSet;
use crate::compile::{CompiledUnit, RustcCompiler, SourceCompiler, SyntaxCompiler};
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::generators::{self, GeneratedArtifact, GenerationContext};
use crate::index;
use crate::reflection::{self, AllowListEntry, ReflectionTable};
use flowcanon_model::{DependencyClosure, EnvironmentDescriptor, ProcessModel, TypeIndex};

/// Everything a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Capability validation result
    pub outcome: CapabilityOutcome,
    /// Generated artifacts, in discovery order
    pub artifacts: Vec<GeneratedArtifact>,
    /// Compiled source artifacts
    pub units: Vec<CompiledUnit>,
    /// Dependency index merged with the compiled declarations
    pub index: TypeIndex,
    /// Types to preserve for ahead-of-time packaging
    pub allow_list: BTreeSet<AllowListEntry>,
}

/// The build pipeline.
#[derive(Debug, Clone)]
pub struct BuildPipeline {
    config: BuildConfig,
    visitors: VisitorSet,
    reflection: ReflectionTable,
}

impl BuildPipeline {
    /// Pipeline translating every node kind with the built-in reflection table.
    pub fn new(config: BuildConfig) -> Self {
        let reflection = ReflectionTable::for_runtime(&config.runtime_crate);
        Self {
            config,
            visitors: VisitorSet::full(),
            reflection,
        }
    }

    /// Restrict the node kinds the process generators translate.
    pub fn with_visitors(mut self, visitors: VisitorSet) -> Self {
        self.visitors = visitors;
        self
    }

    /// Replace the reflection table.
    pub fn with_reflection_table(mut self, table: ReflectionTable) -> Self {
        self.reflection = table;
        self
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run a complete build.
    ///
    /// Artifacts and the reflection config are written below the configured
    /// output directory. Nothing is written when validation or generation fails.
    pub fn run(
        &self,
        models: &[ProcessModel],
        env: &EnvironmentDescriptor,
        closure: &DependencyClosure,
    ) -> Result<BuildOutput> {
        let build_start = Instant::now();
        info!(
            processes = models.len(),
            output_dir = %self.config.output_dir.display(),
            "Starting build"
        );

        // Stage 0: capability gate
        let outcome = capabilities::validate(env).map_err(|e| {
            error!(capability = %e.capability, "Capability validation failed");
            BuildError::from(e)
        })?;

        // Stage 1: discovery
        let generators = generators::discover(models, env, outcome.generate_rest());

        // Stage 2: generation
        let generation_start = Instant::now();
        let ctx = GenerationContext {
            models,
            visitors: &self.visitors,
            crate_name: &self.config.crate_name,
            runtime_crate: &self.config.runtime_crate,
        };
        let artifacts = generators::generate(&generators, &ctx).inspect_err(|e| {
            error!(error = %e, "Generation failed");
        })?;
        info!(
            generators = generators.len(),
            artifacts = artifacts.len(),
            generation_duration_ms = generation_start.elapsed().as_millis() as u64,
            "Generation completed"
        );

        write_artifacts(&self.config.output_dir, &artifacts)?;

        // Stage 3: compilation
        let compile_start = Instant::now();
        let compiler: Box<dyn SourceCompiler> = if self.config.rustc_check {
            Box::new(RustcCompiler::new(
                &self.config.crate_name,
                &self.config.output_dir,
            ))
        } else {
            Box::new(SyntaxCompiler::new(&self.config.crate_name))
        };
        let units = compiler.compile(&artifacts, closure).inspect_err(|e| {
            error!(error = %e, "Compilation of generated code failed");
        })?;
        info!(
            units = units.len(),
            rustc_check = self.config.rustc_check,
            compile_duration_ms = compile_start.elapsed().as_millis() as u64,
            "Compilation completed"
        );

        // Stage 4: indexing
        let index = index::index(&units, &closure.index);
        info!(
            prior_types = closure.index.len(),
            types = index.len(),
            "Indexing completed"
        );

        // Stage 5: allow-list
        let allow_list = reflection::derive_allow_list(&index, &self.reflection, &env.addons);
        let config_path = self.config.output_dir.join(reflection::REFLECTION_CONFIG_PATH);
        fs::write(&config_path, reflection::to_reflection_config(&allow_list)?)?;
        info!(
            entries = allow_list.len(),
            path = %config_path.display(),
            "Reflection allow-list written"
        );

        info!(
            build_duration_ms = build_start.elapsed().as_millis() as u64,
            "Build completed"
        );

        Ok(BuildOutput {
            outcome,
            artifacts,
            units,
            index,
            allow_list,
        })
    }
}

/// Write every artifact below `root`, creating directories as needed.
pub fn write_artifacts(root: &Path, artifacts: &[GeneratedArtifact]) -> Result<()> {
    fs::create_dir_all(root)?;
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.content)?;
    }
    info!(count = artifacts.len(), root = %root.display(), "Artifacts written");
    Ok(())
}
