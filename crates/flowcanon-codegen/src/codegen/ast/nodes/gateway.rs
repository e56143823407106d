// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Split and join gateway emitters.
//!
//! Constraints are validated against the nodes of the enclosing container,
//! so a split can only guard branches to its siblings.

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;

use super::super::context::EmitContext;
use super::super::{FaultReason, TranslationFault};
use flowcanon_model::{GatewayType, JoinNode, Node, SplitNode};

/// Tokens for the runtime gateway variant.
fn gateway_tokens(gateway: GatewayType) -> TokenStream {
    let variant = match gateway {
        GatewayType::Xor => "Xor",
        GatewayType::And => "And",
        GatewayType::Or => "Or",
    };
    let variant = Ident::new(variant, Span::call_site());
    quote! { GatewayType::#variant }
}

/// Emit the split type and one `constraint(..)` call per guarded branch.
pub fn emit_split(
    split: &SplitNode,
    node: &Node,
    var: &Ident,
    ctx: &EmitContext,
) -> Result<TokenStream, TranslationFault> {
    let gateway = gateway_tokens(split.gateway);
    let mut constraints = Vec::with_capacity(split.constraints.len());
    for constraint in &split.constraints {
        if !ctx.is_sibling(constraint.to_node) {
            return Err(TranslationFault::new(
                ctx.unique_id(node.id),
                node.node_type(),
                FaultReason::UnknownConstraintTarget(constraint.to_node),
            ));
        }
        let to = Literal::u64_suffixed(constraint.to_node);
        let name = match &constraint.name {
            Some(name) => quote! { Some(#name) },
            None => quote! { None },
        };
        let dialect = &constraint.dialect;
        let expression = &constraint.expression;
        let priority = Literal::i32_suffixed(constraint.priority);
        constraints.push(quote! {
            #var.constraint(#to, #name, #dialect, #expression, #priority);
        });
    }

    Ok(quote! {
        #var.split_type(#gateway);
        #(#constraints)*
    })
}

/// Emit the join type.
pub fn emit_join(join: &JoinNode, var: &Ident) -> TokenStream {
    let gateway = gateway_tokens(join.gateway);
    quote! { #var.join_type(#gateway); }
}
