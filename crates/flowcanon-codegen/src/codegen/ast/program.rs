// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Program assembly for AST-based code generation.
//!
//! Generates the complete source file for one process: the runtime prelude
//! import, the process scope type, and its `build()` function holding the
//! builder-call sequence.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::TranslationFault;
use super::context::EmitContext;
use super::emitter::{emit_metadata, emit_variables};
use super::nodes::VisitorSet;
use flowcanon_model::ProcessModel;

/// Emit the complete process source file.
///
/// The context's scope class names the generated type; class-loader
/// references in variable declarations resolve against it.
pub fn emit_program(
    model: &ProcessModel,
    visitors: &VisitorSet,
    ctx: &mut EmitContext,
    runtime_crate: &str,
) -> Result<TokenStream, TranslationFault> {
    let runtime = Ident::new(&EmitContext::sanitize_ident(runtime_crate), Span::call_site());
    let type_ident = Ident::new(&EmitContext::sanitize_ident(ctx.scope_class()), Span::call_site());
    let process_id = &model.id;
    let factory = ctx.target().clone();

    let header = emit_header(model, &factory);
    let metadata = emit_metadata(&model.metadata, &factory);
    let scope_class = ctx.scope_class_path();
    let variables = emit_variables(
        Some(&model.variables),
        &factory,
        ctx.visited_variables_mut(),
        &scope_class,
    );
    let nodes = visitors.emit_nodes(&model.nodes, &model.connections, ctx)?;

    let doc = format!(" Builder for the `{}` process.", process_id);

    Ok(quote! {
        use #runtime::prelude::*;

        #[doc = #doc]
        pub struct #type_ident;

        impl ProcessScope for #type_ident {
            const PROCESS_ID: &'static str = #process_id;
        }

        impl #type_ident {
            /// Build the executable process definition.
            pub fn build() -> Process {
                let #factory = ProcessFactory::create_process(#process_id);
                #(#header)*
                #(#metadata)*
                #(#variables)*
                #nodes
                #factory.validate();
                #factory.get_process()
            }
        }
    })
}

/// Name, package and version calls for the factory.
fn emit_header(model: &ProcessModel, factory: &Ident) -> Vec<TokenStream> {
    let mut calls = Vec::new();
    if let Some(name) = &model.name {
        calls.push(quote! { #factory.name(#name); });
    }
    if let Some(package) = &model.package_name {
        calls.push(quote! { #factory.package_name(#package); });
    }
    if let Some(version) = &model.version {
        calls.push(quote! { #factory.version(#version); });
    }
    calls
}
