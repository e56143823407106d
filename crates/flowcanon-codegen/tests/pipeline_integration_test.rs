// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for the build pipeline.
//!
//! Every test builds the fixture processes under `tests/fixtures` into a
//! temporary output directory with syntax-only compilation.

use flowcanon_codegen::{
    BuildConfig, BuildError, BuildOutput, BuildPipeline, CapabilityOutcome, FaultReason,
    GeneratedArtifact, SourceCompiler, SyntaxCompiler, VisitorSet, index::index,
};
use flowcanon_model::{
    DependencyClosure, EnvironmentDescriptor, NodeType, ProcessModel, parse_environment,
    parse_process_model,
};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tempfile::TempDir;

// ============================================================================
// Fixture Helpers
// ============================================================================

fn fixture(name: &str) -> serde_json::Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let json = fs::read_to_string(&path).unwrap_or_else(|e| panic!("{:?}: {}", path, e));
    serde_json::from_str(&json).unwrap()
}

fn models() -> Vec<ProcessModel> {
    ["orders.json", "billing.json"]
        .iter()
        .map(|name| parse_process_model(&fixture(name)).unwrap())
        .collect()
}

fn environment(name: &str) -> EnvironmentDescriptor {
    parse_environment(&fixture(name)).unwrap()
}

fn closure() -> DependencyClosure {
    serde_json::from_value(fixture("closure.json")).unwrap()
}

fn pipeline(output_dir: &Path) -> BuildPipeline {
    BuildPipeline::new(BuildConfig {
        output_dir: output_dir.to_path_buf(),
        ..BuildConfig::default()
    })
}

fn build(output_dir: &Path, env: &EnvironmentDescriptor) -> BuildOutput {
    pipeline(output_dir).run(&models(), env, &closure()).unwrap()
}

fn artifact<'a>(output: &'a BuildOutput, path: &str) -> &'a GeneratedArtifact {
    output
        .artifacts
        .iter()
        .find(|a| a.path == path)
        .unwrap_or_else(|| panic!("missing artifact {}", path))
}

// ============================================================================
// Full Build
// ============================================================================

#[test]
fn test_full_build_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let output = build(dir.path(), &environment("environment_rest.json"));

    let paths: Vec<&str> = output.artifacts.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "processes/billing.rs",
            "processes/orders.rs",
            "events/billing_events.rs",
            "events/orders_events.rs",
            "rest/billing_resource.rs",
            "rest/orders_resource.rs",
            "messaging/initializer.rs",
            "hot_reload_support.rs",
            "lib.rs",
            "META-INF/processes.json",
        ]
    );
    for path in &paths {
        assert!(dir.path().join(path).exists(), "{} not written", path);
    }
    assert!(dir.path().join("reflection-config.json").exists());
    assert_eq!(output.units.len(), 9);
    assert_eq!(output.outcome, CapabilityOutcome::ProceedAsConfigured { generate_rest: true });
}

#[test]
fn test_process_source_follows_model() {
    let dir = TempDir::new().unwrap();
    let output = build(dir.path(), &environment("environment_rest.json"));
    let code = &artifact(&output, "processes/orders.rs").content;

    syn::parse_file(code).unwrap();
    assert!(code.contains("pub struct OrdersProcess ;"));
    assert!(code.contains("factory . metadata (\"maxAmount\" , 9000000000i64)"));
    assert!(code.contains("factory . metadata (\"slaMinutes\" , 30i32)"));
    assert!(!code.contains("ratio"));
    assert!(!code.contains("labels"));

    // First declaration of `order` wins
    assert_eq!(code.matches("factory . variable (\"order\"").count(), 1);
    assert!(code.contains("\"org.acme.Order\""));

    // Node order is preserved
    let start = code.find("factory . start_node (1u64)").unwrap();
    let task = code.find("factory . human_task_node (2u64)").unwrap();
    let boundary = code.find("factory . boundary_event_node (9u64)").unwrap();
    assert!(start < task && task < boundary);
}

#[test]
fn test_generated_events_are_allow_listed() {
    let dir = TempDir::new().unwrap();
    let output = build(dir.path(), &environment("environment_rest.json"));
    let names: Vec<&str> = output.allow_list.iter().map(|e| e.name.as_str()).collect();

    for generated in [
        "flowcanon_app::events_orders_events::OrdersProcessInstanceEvent",
        "flowcanon_app::events_orders_events::OrdersProcessUserTaskEvent",
        "flowcanon_app::events_orders_events::OrdersProcessVariableEvent",
        "flowcanon_app::events_billing_events::BillingProcessInstanceEvent",
    ] {
        assert!(names.contains(&generated), "{} not allow-listed", generated);
    }
    assert!(names.contains(&"hdrhistogram::Histogram"));
    assert!(!names.iter().any(|n| n.contains("explainability")));
    assert!(!names.contains(&"flowcanon_app::processes_orders::OrdersProcess"));
    assert_eq!(output.allow_list.len(), 12 + 2 + 4);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("reflection-config.json")).unwrap())
            .unwrap();
    assert_eq!(written.as_array().unwrap().len(), output.allow_list.len());
}

#[test]
fn test_index_merges_prior_closure() {
    let dir = TempDir::new().unwrap();
    let output = build(dir.path(), &environment("environment_rest.json"));

    assert!(output.index.contains("flowcanon_runtime::event::DataEvent"));
    let event = output
        .index
        .get("flowcanon_app::events_orders_events::OrdersProcessInstanceEvent")
        .unwrap();
    assert_eq!(
        event.supertype.as_deref(),
        Some("flowcanon_runtime::event::ProcessInstanceDataEvent")
    );
    let process = output.index.get("flowcanon_app::processes_orders::OrdersProcess").unwrap();
    assert!(process.interfaces.contains("flowcanon_runtime::prelude::ProcessScope"));
}

#[test]
fn test_repeated_builds_are_identical() {
    let env = environment("environment_rest.json");
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = build(first_dir.path(), &env);
    let second = build(second_dir.path(), &env);

    assert_eq!(first.artifacts, second.artifacts);
    assert_eq!(first.index, second.index);
    assert_eq!(first.allow_list, second.allow_list);
    assert_eq!(
        fs::read(first_dir.path().join("reflection-config.json")).unwrap(),
        fs::read(second_dir.path().join("reflection-config.json")).unwrap()
    );
}

// ============================================================================
// Capability Rules
// ============================================================================

#[test]
fn test_planner_environment_skips_rest() {
    let dir = TempDir::new().unwrap();
    let output = build(dir.path(), &environment("environment_planner.json"));

    assert!(!output.outcome.generate_rest());
    assert!(output.outcome.warning().is_some());
    assert!(!output.artifacts.iter().any(|a| a.path.starts_with("rest/")));
    assert!(!output.artifacts.iter().any(|a| a.path.starts_with("messaging/")));
}

#[test]
fn test_forced_rest_without_capability_aborts() {
    let dir = TempDir::new().unwrap();
    let mut env = environment("environment_planner.json");
    env.generate_rest = Some(true);

    let err = pipeline(dir.path()).run(&models(), &env, &closure()).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, BuildError::Capability(_)));
    assert!(message.contains("'rest'"));
    assert!(message.contains("flowcanon.generate.rest = false"));
    assert!(message.contains("flowcanon.generate.rest = true"));
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_unregistered_kind_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("out");
    let visitors =
        VisitorSet::with_kinds(NodeType::iter().filter(|kind| *kind != NodeType::BoundaryEvent));

    let err = pipeline(&output_dir)
        .with_visitors(visitors)
        .run(&models(), &environment("environment_rest.json"), &closure())
        .unwrap_err();

    match err {
        BuildError::Translation { process_id, source } => {
            assert_eq!(process_id, "orders");
            assert_eq!(source.node_id, "9");
            assert_eq!(source.node_type, Some(NodeType::BoundaryEvent));
            assert_eq!(source.reason, FaultReason::Unregistered);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!output_dir.exists());
}

#[test]
fn test_shared_process_id_is_a_collision() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("out");
    let first = parse_process_model(&fixture("orders.json")).unwrap();
    let mut second = first.clone();
    second.name = Some("Orders Again".to_string());

    let err = pipeline(&output_dir)
        .run(&[first, second], &environment("environment_rest.json"), &closure())
        .unwrap_err();

    match err {
        BuildError::ArtifactCollision { path, first, second } => {
            assert_eq!(path, "processes/orders.rs");
            assert_eq!(first, "process:orders");
            assert_eq!(second, "process:orders");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!output_dir.exists());
}

#[test]
fn test_process_id_cannot_inject_items() {
    let dir = TempDir::new().unwrap();
    let mut models = models();
    models[0].id = "say \"hi\"\npub struct Injected;\n//".to_string();

    let output = pipeline(dir.path())
        .run(&models, &environment("environment_rest.json"), &closure())
        .unwrap();

    assert!(!output.index.iter().any(|(name, _)| name.ends_with("::Injected")));
    assert!(!output.allow_list.iter().any(|e| e.name.ends_with("::Injected")));
    let events = output
        .artifacts
        .iter()
        .find(|a| a.path.starts_with("events/say_"))
        .unwrap();
    assert!(
        events
            .content
            .contains(r#"const PROCESS_ID: &'static str = "say \"hi\"\npub struct Injected;\n//";"#)
    );
}

#[test]
fn test_invalid_generated_source_names_artifact() {
    let artifacts = vec![
        GeneratedArtifact::source("processes/orders.rs", "pub struct OrdersProcess;"),
        GeneratedArtifact::source("events/orders_events.rs", "impl for {}"),
    ];
    let err = SyntaxCompiler::new("flowcanon_app")
        .compile(&artifacts, &DependencyClosure::default())
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("'events/orders_events.rs'"));
    assert!(message.contains("code generation bug"));
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn test_indexing_disjoint_builds_commutes() {
    let compiler = SyntaxCompiler::new("flowcanon_app");
    let closure = closure();
    let batch = |path: &str, code: &str| {
        compiler
            .compile(&[GeneratedArtifact::source(path, code)], &closure)
            .unwrap()
    };

    let a = batch(
        "events/a.rs",
        "use flowcanon_runtime::event::DataEvent; pub struct A; impl DataEvent for A {}",
    );
    let b = batch(
        "events/b.rs",
        "use flowcanon_runtime::event::ProcessDataEvent; pub enum B { X } impl ProcessDataEvent for B {}",
    );

    let ab = index(&b, &index(&a, &closure.index));
    let ba = index(&a, &index(&b, &closure.index));
    assert_eq!(ab, ba);
    assert!(ab.contains("flowcanon_app::events_a::A"));
    assert!(ab.contains("flowcanon_app::events_b::B"));
}
