// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process data-event types, rendered from a template.
//!
//! Every generated event wraps (and derefs to) one of the runtime's event
//! envelopes, so the reflection closure over the envelope types picks it up.

use serde::Serialize;

use super::{GeneratedArtifact, GenerationContext, Generator, render_template};
use crate::codegen::ast::{process_file_stem, process_type_name};
use crate::error::Result;
use flowcanon_model::{Node, NodeKind, ProcessModel};

const TEMPLATE: &str = include_str!("../../templates/process_events.rs.jinja");

/// Generates the data-event types of one process.
#[derive(Debug, Clone)]
pub struct ProcessEventsGenerator {
    process_id: String,
}

#[derive(Serialize)]
struct EventsContext<'a> {
    runtime: String,
    process_id: &'a str,
    type_name: String,
    has_user_tasks: bool,
    has_variables: bool,
}

impl ProcessEventsGenerator {
    /// Generator for the process with the given id.
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
        }
    }

    /// Relative path of the generated source.
    pub fn artifact_path(&self) -> String {
        format!("events/{}_events.rs", process_file_stem(&self.process_id))
    }
}

impl Generator for ProcessEventsGenerator {
    fn name(&self) -> String {
        format!("events:{}", self.process_id)
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let Some(model) = ctx.model(&self.process_id) else {
            return Ok(Vec::new());
        };
        let context = EventsContext {
            runtime: ctx.runtime_ident(),
            process_id: &model.id,
            type_name: process_type_name(&model.id),
            has_user_tasks: any_node(&model.nodes, &|n| matches!(n.kind, NodeKind::HumanTask(_))),
            has_variables: has_variables(model),
        };
        let content = render_template(&self.name(), "process_events.rs", TEMPLATE, context)?;
        Ok(vec![GeneratedArtifact::source(self.artifact_path(), content)])
    }
}

/// Whether any node, including nodes nested in sub-processes, matches.
pub(crate) fn any_node(nodes: &[Node], predicate: &dyn Fn(&Node) -> bool) -> bool {
    nodes.iter().any(|node| {
        predicate(node)
            || matches!(&node.kind, NodeKind::SubProcess(sub) if any_node(&sub.nodes, predicate))
    })
}

fn has_variables(model: &ProcessModel) -> bool {
    !model.variables.is_empty()
        || any_node(&model.nodes, &|n| n.variables.as_ref().is_some_and(|v| !v.is_empty()))
}
