// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process build CLI
//!
//! Compiles process model JSON files into a generated crate and writes the
//! reflection allow-list next to it.
//!
//! Example:
//!
//! ```text
//! flowcanon-build --environment env.json --closure closure.json --output ./generated orders.json billing.json
//! ```

use clap::Parser;
use flowcanon_codegen::{BuildConfig, BuildPipeline, ReflectionTable};
use flowcanon_model::{DependencyClosure, EnvironmentDescriptor, ProcessModel};
use flowcanon_model::{parse_environment, parse_process_model};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "flowcanon-build")]
#[command(about = "Compile process models into builder code", long_about = None)]
struct Cli {
    /// Process model JSON files, or directories containing them
    #[arg(required = true)]
    models: Vec<PathBuf>,

    /// Environment descriptor JSON (capabilities, addons, REST switch)
    #[arg(long, env = "FLOWCANON_ENVIRONMENT")]
    environment: Option<PathBuf>,

    /// Dependency closure JSON (type index, library dirs, externs)
    #[arg(long, env = "FLOWCANON_CLOSURE")]
    closure: Option<PathBuf>,

    /// Reflection table JSON replacing the built-in one
    #[arg(long, env = "FLOWCANON_REFLECTION_TABLE")]
    reflection_table: Option<PathBuf>,

    /// Output directory (overrides FLOWCANON_OUTPUT_DIR)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Type-check generated code with rustc (overrides FLOWCANON_RUSTC_CHECK)
    #[arg(long, default_value_t = false)]
    rustc_check: bool,
}

fn main() -> ExitCode {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    // Initialize minimal logging (default to warn if RUST_LOG not set)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = BuildConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    config.rustc_check |= cli.rustc_check;

    let models = load_models(&cli.models)?;
    let env = match &cli.environment {
        Some(path) => parse_environment(&read_json(path)?)?,
        None => EnvironmentDescriptor::default(),
    };
    let closure: DependencyClosure = match &cli.closure {
        Some(path) => serde_json::from_value(read_json(path)?)
            .map_err(|e| format!("Error parsing dependency closure {:?}: {}", path, e))?,
        None => DependencyClosure::default(),
    };

    let mut pipeline = BuildPipeline::new(config);
    if let Some(path) = &cli.reflection_table {
        let table = ReflectionTable::load(path).map_err(|e| e.to_string())?;
        pipeline = pipeline.with_reflection_table(table);
    }

    eprintln!("Building {} process(es)", models.len());
    let output = pipeline
        .run(&models, &env, &closure)
        .map_err(|e| format!("Build failed: {}", e))?;

    if let Some(warning) = output.outcome.warning() {
        eprintln!("Warning: {}", warning);
    }
    eprintln!("Build successful:");
    eprintln!("  Artifacts: {}", output.artifacts.len());
    eprintln!("  Indexed types: {}", output.index.len());
    eprintln!("  Allow-list entries: {}", output.allow_list.len());

    // Print output directory to stdout for scripts to capture
    println!("{}", pipeline.config().output_dir.display());
    Ok(())
}

fn load_models(paths: &[PathBuf]) -> Result<Vec<ProcessModel>, String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .map_err(|e| format!("Error reading directory {:?}: {}", path, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| format!("Error reading directory {:?}: {}", path, e))?;
                let file = entry.path();
                if file.extension().is_some_and(|ext| ext == "json") {
                    files.push(file);
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();

    files
        .iter()
        .map(|file| parse_process_model(&read_json(file)?).map_err(|e| format!("{:?}: {}", file, e)))
        .collect()
}

fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("Error reading {:?}: {}", path, e))?;
    serde_json::from_str(&json).map_err(|e| format!("Error parsing JSON {:?}: {}", path, e))
}
