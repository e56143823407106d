// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process Model Definitions
//!
//! This crate defines the input types consumed by the flowcanon compiler:
//! - The process model (nodes, connections, typed variables, free-form metadata)
//!   as handed over by a front-end parser
//! - The environment descriptor (capabilities, addon flags, REST generation switch)
//! - The type index used for dependency closures and reflection analysis
//!
//! All types deserialize from JSON; the JSON Schema of the process model is
//! available through [`model_schema`].

pub mod environment;
pub mod metadata;
pub mod process;
pub mod type_index;

pub use environment::{AddonsConfig, EnvironmentDescriptor, capability};
pub use metadata::{Metadata, MetadataValue};
pub use process::{
    ActionNode, BoundaryEventNode, Connection, Constraint, EndNode, EventNode, GatewayType,
    HumanTaskNode, JoinNode, Node, NodeId, NodeKind, NodeType, ProcessModel, SplitNode,
    StartNode, SubProcessNode, TimerNode, Variable, VariableScope, WorkItemNode,
};
pub use type_index::{DependencyClosure, TypeIndex, TypeInfo, TypeKind};

/// Metadata key under which variable tags are attached in emitted code.
pub const VARIABLE_TAGS: &str = "customTags";

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a process model from a JSON value.
///
/// The process id must not be blank.
pub fn parse_process_model(json: &serde_json::Value) -> Result<ProcessModel, String> {
    let model: ProcessModel = serde_json::from_value(json.clone())
        .map_err(|e| format!("Failed to parse process model: {}", e))?;
    if model.id.trim().is_empty() {
        return Err("Failed to parse process model: process id must not be empty".to_string());
    }
    Ok(model)
}

/// Parse an environment descriptor from a JSON value.
pub fn parse_environment(json: &serde_json::Value) -> Result<EnvironmentDescriptor, String> {
    serde_json::from_value(json.clone())
        .map_err(|e| format!("Failed to parse environment descriptor: {}", e))
}

/// JSON Schema of the process model accepted by the compiler.
pub fn model_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ProcessModel)
}
