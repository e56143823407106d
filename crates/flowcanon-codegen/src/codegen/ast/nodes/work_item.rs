// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Work item node emitter.
//!
//! Parameters follow the metadata policy: unsupported value kinds are dropped.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::super::context::EmitContext;
use super::super::emitter::emit_entries;
use super::super::{FaultReason, TranslationFault};
use flowcanon_model::{Node, WorkItemNode};

/// Builder method attaching one handler parameter.
pub const METHOD_WORK_PARAMETER: &str = "work_parameter";

/// Emit the handler name and its static parameters.
pub fn emit(
    work: &WorkItemNode,
    node: &Node,
    var: &Ident,
    ctx: &EmitContext,
) -> Result<TokenStream, TranslationFault> {
    if work.work_name.trim().is_empty() {
        return Err(TranslationFault::new(
            ctx.unique_id(node.id),
            node.node_type(),
            FaultReason::EmptyWorkName,
        ));
    }

    let work_name = &work.work_name;
    let parameters = emit_entries(&work.parameters, var, METHOD_WORK_PARAMETER);
    Ok(quote! {
        #var.work_name(#work_name);
        #(#parameters)*
    })
}
