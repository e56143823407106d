// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cloud-event extension initializer, generated when messaging is available.

use serde::Serialize;

use super::{GeneratedArtifact, GenerationContext, Generator, render_template};
use crate::error::Result;

const TEMPLATE: &str = include_str!("../../templates/messaging_initializer.rs.jinja");

/// Relative path of the generated initializer.
pub const ARTIFACT_PATH: &str = "messaging/initializer.rs";

/// Extension types registered at startup, in registration order.
pub const EXTENSIONS: [&str; 4] = [
    "BaseExtension",
    "PredictionsExtension",
    "ProcessExtension",
    "RulesExtension",
];

/// Generates the startup hook registering cloud-event extensions.
#[derive(Debug, Clone, Copy)]
pub struct MessagingInitializerGenerator;

#[derive(Serialize)]
struct InitializerContext<'a> {
    runtime: String,
    extensions: &'a [&'a str],
}

impl Generator for MessagingInitializerGenerator {
    fn name(&self) -> String {
        "messaging".to_string()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let context = InitializerContext {
            runtime: ctx.runtime_ident(),
            extensions: &EXTENSIONS,
        };
        let content = render_template(&self.name(), "messaging_initializer.rs", TEMPLATE, context)?;
        Ok(vec![GeneratedArtifact::source(ARTIFACT_PATH, content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::nodes::VisitorSet;

    #[test]
    fn test_registers_every_extension() {
        let visitors = VisitorSet::full();
        let ctx = GenerationContext {
            models: &[],
            visitors: &visitors,
            crate_name: "app",
            runtime_crate: "flowcanon_runtime",
        };
        let artifacts = MessagingInitializerGenerator.generate(&ctx).unwrap();
        let code = &artifacts[0].content;

        syn::parse_file(code).unwrap();
        assert!(code.contains(
            "use flowcanon_runtime::cloudevents::{self, BaseExtension, PredictionsExtension, ProcessExtension, RulesExtension};"
        ));
        for extension in EXTENSIONS {
            assert!(code.contains(&format!("cloudevents::register::<{}>();", extension)));
        }
    }
}
