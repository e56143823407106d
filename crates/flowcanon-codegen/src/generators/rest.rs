// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! REST resource generator.
//!
//! Only discovered when capability validation leaves REST generation on.

use serde::Serialize;

use super::events::any_node;
use super::{GeneratedArtifact, GenerationContext, Generator, module_name, process, render_template};
use crate::codegen::ast::{process_file_stem, process_type_name};
use crate::error::Result;
use flowcanon_model::NodeKind;

const TEMPLATE: &str = include_str!("../../templates/rest_resource.rs.jinja");

/// Generates the REST resource of one process.
#[derive(Debug, Clone)]
pub struct RestResourceGenerator {
    process_id: String,
}

#[derive(Serialize)]
struct RestContext<'a> {
    runtime: String,
    process_id: &'a str,
    base_path: String,
    process_module: String,
    type_name: String,
    has_user_tasks: bool,
}

impl RestResourceGenerator {
    /// Generator for the process with the given id.
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
        }
    }

    /// Relative path of the generated source.
    pub fn artifact_path(&self) -> String {
        format!("rest/{}_resource.rs", process_file_stem(&self.process_id))
    }
}

impl Generator for RestResourceGenerator {
    fn name(&self) -> String {
        format!("rest:{}", self.process_id)
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let Some(model) = ctx.model(&self.process_id) else {
            return Ok(Vec::new());
        };
        let process_path = process::artifact_path(&model.id);
        let context = RestContext {
            runtime: ctx.runtime_ident(),
            process_id: &model.id,
            base_path: format!("/{}", model.id),
            process_module: module_name(&process_path).unwrap_or_default(),
            type_name: process_type_name(&model.id),
            has_user_tasks: any_node(&model.nodes, &|n| matches!(n.kind, NodeKind::HumanTask(_))),
        };
        let content = render_template(&self.name(), "rest_resource.rs", TEMPLATE, context)?;
        Ok(vec![GeneratedArtifact::source(self.artifact_path(), content)])
    }
}
