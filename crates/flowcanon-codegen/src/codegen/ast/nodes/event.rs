// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Catch event, timer and boundary event emitters.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::super::context::EmitContext;
use super::super::{FaultReason, TranslationFault};
use flowcanon_model::{BoundaryEventNode, EventNode, Node, TimerNode};

fn require_event_type(
    event_type: &str,
    node: &Node,
    ctx: &EmitContext,
) -> Result<(), TranslationFault> {
    if event_type.trim().is_empty() {
        return Err(TranslationFault::new(
            ctx.unique_id(node.id),
            node.node_type(),
            FaultReason::EmptyEventType,
        ));
    }
    Ok(())
}

/// Emit the event type and the variable receiving the payload.
pub fn emit_event(
    event: &EventNode,
    node: &Node,
    var: &Ident,
    ctx: &EmitContext,
) -> Result<TokenStream, TranslationFault> {
    require_event_type(&event.event_type, node, ctx)?;
    let event_type = &event.event_type;
    let variable = event
        .variable_name
        .as_ref()
        .map(|name| quote! { #var.variable_name(#name); });
    Ok(quote! {
        #var.event_type(#event_type);
        #variable
    })
}

/// Emit the timer delay and period, when set.
pub fn emit_timer(timer: &TimerNode, var: &Ident) -> TokenStream {
    let delay = timer.delay.as_ref().map(|delay| quote! { #var.delay(#delay); });
    let period = timer.period.as_ref().map(|period| quote! { #var.period(#period); });
    quote! {
        #delay
        #period
    }
}

/// Emit a boundary event and its attachment.
pub fn emit_boundary(
    event: &BoundaryEventNode,
    node: &Node,
    var: &Ident,
    ctx: &EmitContext,
) -> Result<TokenStream, TranslationFault> {
    require_event_type(&event.event_type, node, ctx)?;
    let event_type = &event.event_type;
    let attached_to = &event.attached_to;
    let cancel = event.cancel_activity;
    Ok(quote! {
        #var.event_type(#event_type);
        #var.attached_to(#attached_to);
        #var.cancel_activity(#cancel);
    })
}
