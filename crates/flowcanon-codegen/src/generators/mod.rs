// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Generator registry.
//!
//! Discovery selects the generators applicable to a set of process models and
//! an environment, in a fixed order. Generation runs them in parallel and joins
//! before the collision barrier: every artifact path must be claimed by exactly
//! one generator.

pub mod application;
pub mod events;
pub mod hot_reload;
pub mod manifest;
pub mod messaging;
pub mod process;
pub mod rest;

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::codegen::ast::context::EmitContext;
use crate::codegen::ast::nodes::VisitorSet;
use crate::error::{BuildError, Result};
use flowcanon_model::{EnvironmentDescriptor, ProcessModel, capability};

pub use application::ApplicationGenerator;
pub use events::ProcessEventsGenerator;
pub use hot_reload::HotReloadSupportGenerator;
pub use manifest::ProcessManifestGenerator;
pub use messaging::MessagingInitializerGenerator;
pub use process::ProcessGenerator;
pub use rest::RestResourceGenerator;

/// Logical kind of a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Rust source, compiled and indexed
    Source,
    /// Static resource, written as-is
    Resource,
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Source or resource
    pub kind: ArtifactKind,
    /// Path relative to the output root, `/`-separated
    pub path: String,
    /// File content
    pub content: String,
}

impl GeneratedArtifact {
    /// A Rust source artifact.
    pub fn source(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Source,
            path: path.into(),
            content: content.into(),
        }
    }

    /// A resource artifact.
    pub fn resource(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Resource,
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Shared, read-only inputs of one generation pass.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Every process model of the build
    pub models: &'a [ProcessModel],
    /// Node kinds the process generators can translate
    pub visitors: &'a VisitorSet,
    /// Name of the generated crate
    pub crate_name: &'a str,
    /// Crate providing the builder API
    pub runtime_crate: &'a str,
}

impl<'a> GenerationContext<'a> {
    /// Look up a model by process id.
    pub fn model(&self, process_id: &str) -> Option<&'a ProcessModel> {
        self.models.iter().find(|m| m.id == process_id)
    }

    /// Runtime crate name as it appears in generated paths.
    pub fn runtime_ident(&self) -> String {
        EmitContext::sanitize_ident(self.runtime_crate)
    }
}

/// A producer of generated artifacts.
///
/// Generators are independent: they share no mutable state and may run
/// concurrently.
pub trait Generator: Send + Sync {
    /// Identity used in collision reports and logs.
    fn name(&self) -> String;

    /// Produce this generator's artifacts.
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>>;
}

/// Select the generators for a build, in a deterministic order.
///
/// Models are ordered by process id regardless of input order. Models sharing
/// an id keep one generator each, so [`generate`] reports their collision.
/// `generate_rest` is the switch returned by capability validation.
pub fn discover(
    models: &[ProcessModel],
    env: &EnvironmentDescriptor,
    generate_rest: bool,
) -> Vec<Box<dyn Generator>> {
    let mut ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    ids.sort_unstable();

    let mut generators: Vec<Box<dyn Generator>> = Vec::new();
    let mut modules = Vec::new();

    for id in &ids {
        let generator = ProcessGenerator::new(*id);
        modules.push(generator.artifact_path());
        generators.push(Box::new(generator));
    }
    for id in &ids {
        let generator = ProcessEventsGenerator::new(*id);
        modules.push(generator.artifact_path());
        generators.push(Box::new(generator));
    }
    if generate_rest {
        for id in &ids {
            let generator = RestResourceGenerator::new(*id);
            modules.push(generator.artifact_path());
            generators.push(Box::new(generator));
        }
    }
    if env.has_capability(capability::MESSAGING) {
        modules.push(messaging::ARTIFACT_PATH.to_string());
        generators.push(Box::new(MessagingInitializerGenerator));
    }
    if !env.live_reload {
        modules.push(hot_reload::ARTIFACT_PATH.to_string());
        generators.push(Box::new(HotReloadSupportGenerator));
    }

    let process_ids = ids.iter().map(|id| id.to_string()).collect();
    generators.push(Box::new(ApplicationGenerator::new(modules, process_ids)));
    generators.push(Box::new(ProcessManifestGenerator));

    debug!(
        generators = ?generators.iter().map(|g| g.name()).collect::<Vec<_>>(),
        "Discovered generators"
    );
    generators
}

/// Run every generator and collect the artifacts in discovery order.
///
/// # Errors
///
/// The first generator error in discovery order, or
/// [`BuildError::ArtifactCollision`] when two generators claim the same path.
pub fn generate(
    generators: &[Box<dyn Generator>],
    ctx: &GenerationContext<'_>,
) -> Result<Vec<GeneratedArtifact>> {
    let outputs: Vec<(String, Result<Vec<GeneratedArtifact>>)> = generators
        .par_iter()
        .map(|generator| (generator.name(), generator.generate(ctx)))
        .collect();

    // Barrier: all generators have finished
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    let mut artifacts = Vec::new();
    for (name, output) in outputs {
        for artifact in output? {
            if let Some(first) = owners.get(&artifact.path) {
                return Err(BuildError::ArtifactCollision {
                    path: artifact.path,
                    first: first.clone(),
                    second: name,
                });
            }
            debug!(generator = %name, path = %artifact.path, "Generated artifact");
            owners.insert(artifact.path.clone(), name.clone());
            artifacts.push(artifact);
        }
    }
    Ok(artifacts)
}

/// Module of the generated crate a source artifact becomes, `None` for the
/// crate root.
///
/// `processes/orders.rs` becomes `processes_orders`.
pub fn module_name(path: &str) -> Option<String> {
    let stem = path.strip_suffix(".rs").unwrap_or(path);
    if stem == application::CRATE_ROOT.trim_end_matches(".rs") {
        return None;
    }
    let name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    Some(name)
}

/// Fully-qualified module path of a source artifact inside the generated crate.
pub fn module_path(crate_name: &str, path: &str) -> String {
    match module_name(path) {
        Some(module) => format!("{}::{}", crate_name, module),
        None => crate_name.to_string(),
    }
}

/// Render a template against a serializable context.
pub(crate) fn render_template<S: Serialize>(
    generator: &str,
    name: &str,
    source: &str,
    context: S,
) -> Result<String> {
    let template_error = |source| BuildError::Template {
        generator: generator.to_string(),
        source,
    };

    let mut env = minijinja::Environment::new();
    env.add_filter("rust_str", rust_str);
    env.add_filter("doc_line", doc_line);
    env.add_template(name, source).map_err(template_error)?;
    let template = env.get_template(name).map_err(template_error)?;
    template.render(context).map_err(template_error)
}

/// Template filter: the value as a Rust string literal, quotes included.
fn rust_str(value: String) -> String {
    proc_macro2::Literal::string(&value).to_string()
}

/// Template filter: the value flattened to one line of comment text.
fn doc_line(value: String) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
