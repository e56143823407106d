// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! AST-based code generation for process compilation.
//!
//! This module generates Rust source code using proc-macro2/quote for
//! type-safe token construction instead of string templating. The emitted
//! code is a sequence of builder calls against the runtime's process factory.

pub mod context;
pub mod emitter;
pub mod nodes;
pub mod program;

use thiserror::Error;

use context::EmitContext;
use flowcanon_model::{NodeId, NodeType, ProcessModel};
use nodes::VisitorSet;

// ============================================================================
// Codegen Error Types
// ============================================================================

/// A node the visitor set cannot translate.
///
/// Fatal for the process being compiled: no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot translate node '{node_id}' (kind: {kind}): {reason}", kind = kind_label(.node_type))]
pub struct TranslationFault {
    /// Unique node id including enclosing sub-processes (e.g. `5:2`)
    pub node_id: String,
    /// Node kind, `None` when the node does not exist in its container
    pub node_type: Option<NodeType>,
    /// What made the node untranslatable
    pub reason: FaultReason,
}

/// Cause of a [`TranslationFault`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultReason {
    /// The visitor set has no visitor for the node's kind.
    #[error("no visitor registered for this node kind")]
    Unregistered,
    /// A work item without a handler name.
    #[error("work item has an empty work name")]
    EmptyWorkName,
    /// A human task without a task name.
    #[error("human task has an empty task name")]
    EmptyTaskName,
    /// An event or boundary event without an event type.
    #[error("event has an empty event type")]
    EmptyEventType,
    /// A split constraint guards a branch to a node outside the container.
    #[error("constraint targets unknown node {0}")]
    UnknownConstraintTarget(NodeId),
    /// A connection references a node outside the container.
    #[error("connection '{0}' references a node that does not exist")]
    UnknownConnectionEndpoint(String),
}

fn kind_label(node_type: &Option<NodeType>) -> String {
    node_type.map_or_else(|| "unknown".to_string(), |t| t.to_string())
}

impl TranslationFault {
    /// Fault for an existing node of a known kind.
    pub fn new(node_id: impl Into<String>, node_type: NodeType, reason: FaultReason) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: Some(node_type),
            reason,
        }
    }
}

/// Compile a process model to Rust source code.
///
/// This is the main entry point for AST-based code generation. One
/// [`EmitContext`] is created per call and consumed by the traversal.
///
/// # Errors
///
/// Returns [`TranslationFault`] for the first node `visitors` cannot translate.
pub fn compile_process(
    model: &ProcessModel,
    visitors: &VisitorSet,
    runtime_crate: &str,
) -> Result<String, TranslationFault> {
    let mut ctx = EmitContext::new(process_type_name(&model.id));
    let tokens = program::emit_program(model, visitors, &mut ctx, runtime_crate)?;
    Ok(tokens.to_string())
}

/// Name of the generated process type: UpperCamelCase id plus `Process`.
pub fn process_type_name(process_id: &str) -> String {
    let mut name: String = process_id
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 'P');
    }
    name.push_str("Process");
    name
}

/// File stem for the generated process source, snake_case.
pub fn process_file_stem(process_id: &str) -> String {
    EmitContext::sanitize_ident(&process_id.to_ascii_lowercase())
}
