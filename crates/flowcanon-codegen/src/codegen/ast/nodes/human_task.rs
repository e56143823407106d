// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Human task node emitter.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::super::context::EmitContext;
use super::super::{FaultReason, TranslationFault};
use flowcanon_model::{HumanTaskNode, Node};

/// Emit the task name and optional assignment.
pub fn emit(
    task: &HumanTaskNode,
    node: &Node,
    var: &Ident,
    ctx: &EmitContext,
) -> Result<TokenStream, TranslationFault> {
    if task.task_name.trim().is_empty() {
        return Err(TranslationFault::new(
            ctx.unique_id(node.id),
            node.node_type(),
            FaultReason::EmptyTaskName,
        ));
    }

    let task_name = &task.task_name;
    let actor = task.actor_id.as_ref().map(|actor| quote! { #var.actor_id(#actor); });
    let group = task.group_id.as_ref().map(|group| quote! { #var.group_id(#group); });
    Ok(quote! {
        #var.task_name(#task_name);
        #actor
        #group
    })
}
