// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process source generator: one builder-code file per process model.

use super::{GeneratedArtifact, GenerationContext, Generator};
use crate::codegen::ast::{compile_process, process_file_stem};
use crate::error::{BuildError, Result};

/// Translates one process model into its builder-code source file.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    process_id: String,
}

impl ProcessGenerator {
    /// Generator for the process with the given id.
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
        }
    }

    /// Relative path of the generated source.
    pub fn artifact_path(&self) -> String {
        artifact_path(&self.process_id)
    }
}

/// Relative path of the builder-code source for a process.
pub fn artifact_path(process_id: &str) -> String {
    format!("processes/{}.rs", process_file_stem(process_id))
}

impl Generator for ProcessGenerator {
    fn name(&self) -> String {
        format!("process:{}", self.process_id)
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let Some(model) = ctx.model(&self.process_id) else {
            return Ok(Vec::new());
        };
        let code = compile_process(model, ctx.visitors, ctx.runtime_crate)
            .map_err(|fault| BuildError::translation(&self.process_id, fault))?;
        Ok(vec![GeneratedArtifact::source(self.artifact_path(), code)])
    }
}
