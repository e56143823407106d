// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compilation of generated sources.
//!
//! [`SyntaxCompiler`] parses every source artifact and records its declarations.
//! [`RustcCompiler`] additionally type-checks the generated crate with rustc
//! against the dependency closure. Any failure means a generator emitted
//! invalid code and is reported as [`BuildError::Compilation`].

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error, info};

use crate::error::{BuildError, Result};
use crate::generators::{ArtifactKind, GeneratedArtifact, application, module_path};
use crate::index::scan_declarations;
use flowcanon_model::{DependencyClosure, TypeIndex};

/// A successfully compiled source artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// Artifact path relative to the output root
    pub path: String,
    /// Module path inside the generated crate
    pub module_path: String,
    /// SHA-256 of the source, lowercase hex
    pub checksum: String,
    /// Types declared (or extended) by the unit
    pub declarations: TypeIndex,
}

/// Compiles generated artifacts against a dependency closure.
pub trait SourceCompiler {
    /// Compile every source artifact, skipping resources.
    ///
    /// # Errors
    ///
    /// [`BuildError::Compilation`] naming the first artifact that fails.
    fn compile(
        &self,
        artifacts: &[GeneratedArtifact],
        closure: &DependencyClosure,
    ) -> Result<Vec<CompiledUnit>>;
}

/// Parses generated sources with syn.
#[derive(Debug, Clone)]
pub struct SyntaxCompiler {
    crate_name: String,
}

impl SyntaxCompiler {
    /// Compiler for sources of the crate `crate_name`.
    pub fn new(crate_name: impl Into<String>) -> Self {
        Self {
            crate_name: crate_name.into(),
        }
    }

    /// Parse one artifact and collect its declarations.
    pub fn compile_unit(&self, artifact: &GeneratedArtifact) -> Result<CompiledUnit> {
        let file = syn::parse_file(&artifact.content).map_err(|e| {
            let start = e.span().start();
            BuildError::Compilation {
                path: artifact.path.clone(),
                diagnostic: format!("{}:{}: {}", start.line, start.column + 1, e),
            }
        })?;

        let module_path = module_path(&self.crate_name, &artifact.path);
        let declarations = scan_declarations(&file, &self.crate_name, &module_path);
        debug!(
            path = %artifact.path,
            module = %module_path,
            declarations = declarations.len(),
            "Compiled unit"
        );

        Ok(CompiledUnit {
            path: artifact.path.clone(),
            module_path,
            checksum: checksum(&artifact.content),
            declarations,
        })
    }
}

impl SourceCompiler for SyntaxCompiler {
    fn compile(
        &self,
        artifacts: &[GeneratedArtifact],
        _closure: &DependencyClosure,
    ) -> Result<Vec<CompiledUnit>> {
        artifacts
            .iter()
            .filter(|a| a.kind == ArtifactKind::Source)
            .map(|a| self.compile_unit(a))
            .collect()
    }
}

/// Lowercase hex SHA-256 of a source text.
pub fn checksum(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Syntax compilation followed by a rustc type-check of the generated crate.
///
/// The artifacts must already be written below `output_dir`.
#[derive(Debug, Clone)]
pub struct RustcCompiler {
    syntax: SyntaxCompiler,
    output_dir: PathBuf,
    rustc: PathBuf,
}

impl RustcCompiler {
    /// Type-check the crate written to `output_dir` with the `rustc` on `PATH`.
    pub fn new(crate_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            syntax: SyntaxCompiler::new(crate_name),
            output_dir: output_dir.into(),
            rustc: PathBuf::from("rustc"),
        }
    }

    /// Use a specific rustc binary.
    pub fn with_rustc(mut self, rustc: impl Into<PathBuf>) -> Self {
        self.rustc = rustc.into();
        self
    }

    /// The rustc invocation checking the generated crate.
    fn command(&self, closure: &DependencyClosure) -> Command {
        let mut cmd = Command::new(&self.rustc);
        cmd.current_dir(&self.output_dir);

        // Keep the check independent of global flags such as `-D warnings`
        cmd.env_remove("RUSTFLAGS");

        cmd.arg("--crate-type=lib")
            .arg("--edition=2024")
            .arg("--emit=metadata")
            .arg("--crate-name")
            .arg(&self.syntax.crate_name)
            .arg("--out-dir")
            .arg(self.output_dir.join("target"));

        for dir in &closure.library_dirs {
            cmd.arg("-L").arg(format!("dependency={}", dir.display()));
        }
        for (name, path) in &closure.externs {
            cmd.arg("--extern").arg(format!("{}={}", name, path.display()));
        }

        cmd.arg(self.output_dir.join(application::CRATE_ROOT));
        cmd
    }
}

impl SourceCompiler for RustcCompiler {
    fn compile(
        &self,
        artifacts: &[GeneratedArtifact],
        closure: &DependencyClosure,
    ) -> Result<Vec<CompiledUnit>> {
        let units = self.syntax.compile(artifacts, closure)?;
        if !artifacts.iter().any(|a| a.path == application::CRATE_ROOT) {
            return Ok(units);
        }

        let mut cmd = self.command(closure);
        info!(command = ?cmd, "Invoking rustc to check generated crate");
        let rustc_start = std::time::Instant::now();
        let output = cmd.output()?;
        info!(
            rustc_duration_ms = rustc_start.elapsed().as_millis() as u64,
            "Rustc check completed"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "Rustc check failed");
            let (path, diagnostic) = parse_rustc_error(&stderr, &self.output_dir);
            return Err(BuildError::Compilation { path, diagnostic });
        }
        Ok(units)
    }
}

// ============================================================================
// Rustc Error Parsing
// ============================================================================

/// Split rustc stderr into the artifact path it points at and a short
/// diagnostic.
///
/// The path is relative to `output_dir`; it falls back to the crate root
/// when the diagnostic carries no location.
pub fn parse_rustc_error(stderr: &str, output_dir: &Path) -> (String, String) {
    let path = extract_location(stderr)
        .map(|file| relative_path(file, output_dir))
        .unwrap_or_else(|| application::CRATE_ROOT.to_string());

    // Missing dependency
    if let Some(crate_name) = extract_pattern(stderr, "can't find crate for `", "`") {
        return (
            path,
            format!(
                "Cannot find crate '{}'. Add it to the dependency closure externs.",
                crate_name
            ),
        );
    }

    // Unresolved import
    if stderr.contains("error[E0432]")
        && let Some(import) = extract_pattern(stderr, "unresolved import `", "`")
    {
        return (path, format!("Unresolved import '{}'", import));
    }

    // Type errors
    if stderr.contains("error[E0308]") {
        return (path, "Type mismatch in generated code".to_string());
    }

    let diagnostic = extract_first_error(stderr)
        .unwrap_or_else(|| "rustc failed without an error message".to_string());
    (path, diagnostic)
}

/// Extract a pattern from text: prefix...suffix
fn extract_pattern<'a>(text: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let start = text.find(prefix)? + prefix.len();
    let rest = &text[start..];
    let end = rest.find(suffix)?;
    Some(&rest[..end])
}

/// Extract the first error message from rustc output.
fn extract_first_error(stderr: &str) -> Option<String> {
    for line in stderr.lines() {
        let line = line.trim();
        if line.starts_with("error[E") {
            if let Some(msg_start) = line.find("]: ") {
                return Some(line[msg_start + 3..].to_string());
            }
        } else if line.starts_with("error:") {
            let msg = line.trim_start_matches("error:").trim();
            if !msg.is_empty() {
                return Some(msg.to_string());
            }
        }
    }
    None
}

/// File of the first `--> file:line:col` location.
fn extract_location(stderr: &str) -> Option<&str> {
    stderr.lines().find_map(|line| {
        let location = line.trim().strip_prefix("--> ")?;
        let mut parts = location.rsplitn(3, ':');
        let _column = parts.next()?;
        let _line = parts.next()?;
        parts.next()
    })
}

fn relative_path(file: &str, output_dir: &Path) -> String {
    let file = Path::new(file);
    file.strip_prefix(output_dir)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}
