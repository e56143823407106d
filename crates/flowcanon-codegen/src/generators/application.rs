// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Crate root of the generated application.
//!
//! Declares one module per source artifact planned at discovery time and an
//! entry point building every process.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::{GeneratedArtifact, GenerationContext, Generator, module_name, process};
use crate::codegen::ast::process_type_name;
use crate::error::Result;

/// Relative path of the crate root.
pub const CRATE_ROOT: &str = "lib.rs";

/// Generates `lib.rs` wiring all generated modules together.
#[derive(Debug, Clone)]
pub struct ApplicationGenerator {
    sources: Vec<String>,
    process_ids: Vec<String>,
}

impl ApplicationGenerator {
    /// Crate root for the given source artifact paths and process ids.
    pub fn new(sources: Vec<String>, process_ids: Vec<String>) -> Self {
        Self {
            sources,
            process_ids,
        }
    }
}

impl Generator for ApplicationGenerator {
    fn name(&self) -> String {
        "application".to_string()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<GeneratedArtifact>> {
        let modules: Vec<TokenStream> = self
            .sources
            .iter()
            .filter_map(|path| {
                let module = Ident::new(&module_name(path)?, Span::call_site());
                Some(quote! {
                    #[path = #path]
                    pub mod #module;
                })
            })
            .collect();

        let builds: Vec<TokenStream> = self
            .process_ids
            .iter()
            .filter_map(|id| {
                let module = module_name(&process::artifact_path(id))?;
                let module = Ident::new(&module, Span::call_site());
                let type_ident = Ident::new(&process_type_name(id), Span::call_site());
                Some(quote! { #module::#type_ident::build() })
            })
            .collect();

        let runtime = Ident::new(&ctx.runtime_ident(), Span::call_site());
        let process_ids = &self.process_ids;
        let tokens = quote! {
            #![doc = " Generated process application."]

            #(#modules)*

            /// Identifiers of every process in this application.
            pub const PROCESS_IDS: &[&str] = &[#(#process_ids),*];

            /// Build every process definition of this application.
            pub fn processes() -> Vec<#runtime::prelude::Process> {
                vec![#(#builds),*]
            }
        };
        Ok(vec![GeneratedArtifact::source(CRATE_ROOT, tokens.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::nodes::VisitorSet;

    #[test]
    fn test_crate_root_declares_modules() {
        let generator = ApplicationGenerator::new(
            vec![
                "processes/orders.rs".to_string(),
                "events/orders_events.rs".to_string(),
                "hot_reload_support.rs".to_string(),
            ],
            vec!["orders".to_string()],
        );
        let visitors = VisitorSet::full();
        let ctx = GenerationContext {
            models: &[],
            visitors: &visitors,
            crate_name: "app",
            runtime_crate: "flowcanon_runtime",
        };

        let artifacts = generator.generate(&ctx).unwrap();
        assert_eq!(artifacts[0].path, "lib.rs");
        let code = &artifacts[0].content;
        let file = syn::parse_file(code).unwrap();

        // three modules, the id list and the entry point
        assert_eq!(file.items.len(), 5);
        assert!(code.contains("# [path = \"processes/orders.rs\"] pub mod processes_orders ;"));
        assert!(code.contains("pub mod hot_reload_support ;"));
        assert!(code.contains("processes_orders :: OrdersProcess :: build ()"));
        assert!(code.contains("& [\"orders\"]"));
    }

    #[test]
    fn test_runtime_crate_name_is_sanitized() {
        let generator = ApplicationGenerator::new(Vec::new(), Vec::new());
        let visitors = VisitorSet::full();
        let ctx = GenerationContext {
            models: &[],
            visitors: &visitors,
            crate_name: "app",
            runtime_crate: "my-runtime",
        };

        let code = generator.generate(&ctx).unwrap().remove(0).content;
        syn::parse_file(&code).unwrap();
        assert!(code.contains("Vec < my_runtime :: prelude :: Process >"));
    }
}
