// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Start and end node emitters.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use flowcanon_model::{EndNode, StartNode};

/// Emit the kind-specific calls for a start node.
pub fn emit_start(node: &StartNode, var: &Ident) -> TokenStream {
    match &node.trigger {
        Some(trigger) => quote! { #var.trigger(#trigger); },
        None => TokenStream::new(),
    }
}

/// Emit the kind-specific calls for an end node.
pub fn emit_end(node: &EndNode, var: &Ident) -> TokenStream {
    let terminate = node.terminate;
    quote! { #var.terminate(#terminate); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;

    fn var(name: &str) -> Ident {
        Ident::new(name, Span::call_site())
    }

    #[test]
    fn test_start_without_trigger_emits_nothing() {
        assert!(emit_start(&StartNode::default(), &var("start_node_1")).is_empty());
    }

    #[test]
    fn test_start_with_trigger() {
        let node = StartNode {
            trigger: Some("orderPlaced".to_string()),
        };
        let code = emit_start(&node, &var("start_node_1")).to_string();
        assert_eq!(code, "start_node_1 . trigger (\"orderPlaced\") ;");
    }

    #[test]
    fn test_end_terminate_flag() {
        let code = emit_end(&EndNode { terminate: true }, &var("end_node_2")).to_string();
        assert_eq!(code, "end_node_2 . terminate (true) ;");
    }
}
