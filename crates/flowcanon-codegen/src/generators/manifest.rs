// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process manifest resource listing every generated process.

use serde::Serialize;

use super::{GeneratedArtifact, GenerationContext, Generator, module_path, process};
use crate::codegen::ast::process_type_name;
use crate::error::Result;

/// Relative path of the manifest.
pub const ARTIFACT_PATH: &str = "META-INF/processes.json";

/// Generates `META-INF/processes.json`.
#[derive(Debug, Clone, Copy)]
pub struct ProcessManifestGenerator;

/// One manifest entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(rename = "type")]
    type_path: String,
    source: String,
}

impl Generator for ProcessManifestGenerator {
    fn name(&self) -> String {
        "manifest".to_string()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let mut entries: Vec<ManifestEntry<'_>> = ctx
            .models
            .iter()
            .map(|model| {
                let source = process::artifact_path(&model.id);
                ManifestEntry {
                    id: &model.id,
                    name: model.name.as_deref(),
                    package_name: model.package_name.as_deref(),
                    version: model.version.as_deref(),
                    type_path: format!(
                        "{}::{}",
                        module_path(ctx.crate_name, &source),
                        process_type_name(&model.id)
                    ),
                    source,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(b.id));

        let content = serde_json::to_string_pretty(&entries)?;
        Ok(vec![GeneratedArtifact::resource(ARTIFACT_PATH, content)])
    }
}
