// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Emission context for AST-based code generation.
//!
//! One context exists per top-level process translation. Nested node visits
//! borrow it mutably; it is never cloned.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use std::collections::{BTreeSet, HashSet};

use flowcanon_model::NodeId;

/// Builder variable the process-level calls target.
pub const FACTORY_VAR: &str = "factory";

/// Context for code emission, tracking declared variables and the current
/// builder target.
pub struct EmitContext {
    /// Variable names already declared in this translation pass
    visited_variables: HashSet<String>,

    /// Builder variable the current block emits calls against
    target: Ident,

    /// Type whose class loader resolves declared variable types
    scope_class: String,

    /// Enclosing sub-process ids, outermost first
    container_path: Vec<NodeId>,

    /// Node ids declared in each enclosing container, innermost last
    container_nodes: Vec<BTreeSet<NodeId>>,
}

impl EmitContext {
    /// Create a new emission context targeting the process factory.
    pub fn new(scope_class: impl Into<String>) -> Self {
        Self {
            visited_variables: HashSet::new(),
            target: Ident::new(FACTORY_VAR, Span::call_site()),
            scope_class: scope_class.into(),
            container_path: Vec::new(),
            container_nodes: Vec::new(),
        }
    }

    /// The builder variable calls are currently emitted against.
    pub fn target(&self) -> &Ident {
        &self.target
    }

    /// Mutable access to the visited-variable set.
    pub fn visited_variables_mut(&mut self) -> &mut HashSet<String> {
        &mut self.visited_variables
    }

    /// Variable names declared so far.
    pub fn visited_variables(&self) -> &HashSet<String> {
        &self.visited_variables
    }

    /// Name of the scope class.
    pub fn scope_class(&self) -> &str {
        &self.scope_class
    }

    /// Tokens for the scope class path. Accepts `::` or `.` separators.
    pub fn scope_class_path(&self) -> TokenStream {
        let segments = self
            .scope_class
            .split("::")
            .flat_map(|s| s.split('.'))
            .filter(|s| !s.is_empty())
            .map(|s| Ident::new(&Self::sanitize_ident(s), Span::call_site()));
        quote! { #(#segments)::* }
    }

    /// Run `f` with `target` as the builder target inside container `container`.
    /// The previous target and container are restored afterwards.
    pub fn within_container<R>(
        &mut self,
        container: NodeId,
        target: Ident,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let previous = std::mem::replace(&mut self.target, target);
        self.container_path.push(container);
        let result = f(self);
        self.container_path.pop();
        self.target = previous;
        result
    }

    /// Register the node ids of the container currently being emitted.
    pub fn enter_nodes(&mut self, ids: BTreeSet<NodeId>) {
        self.container_nodes.push(ids);
    }

    /// Drop the innermost registered node id set.
    pub fn exit_nodes(&mut self) {
        self.container_nodes.pop();
    }

    /// Whether `id` is declared in the innermost container.
    pub fn is_sibling(&self, id: NodeId) -> bool {
        self.container_nodes
            .last()
            .is_some_and(|ids| ids.contains(&id))
    }

    /// Unique node id including enclosing containers (e.g. `5:2`).
    pub fn unique_id(&self, id: NodeId) -> String {
        self.container_path
            .iter()
            .chain(std::iter::once(&id))
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Builder variable for a node, e.g. `human_task_5_2`.
    pub fn node_ident(&self, prefix: &str, id: NodeId) -> Ident {
        let name = format!("{}_{}", prefix, self.unique_id(id).replace(':', "_"));
        Ident::new(&Self::sanitize_ident(&name), Span::call_site())
    }

    /// Sanitize a string to be a valid Rust identifier.
    /// Replaces invalid characters with underscores.
    pub fn sanitize_ident(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            if c.is_ascii_alphanumeric() || c == '_' {
                // First character cannot be a digit
                if i == 0 && c.is_ascii_digit() {
                    result.push('_');
                }
                result.push(c);
            } else {
                result.push('_');
            }
        }
        if result.is_empty() {
            result.push_str("_empty");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(EmitContext::sanitize_ident("hello"), "hello");
        assert_eq!(EmitContext::sanitize_ident("hello-world"), "hello_world");
        assert_eq!(EmitContext::sanitize_ident("123abc"), "_123abc");
        assert_eq!(EmitContext::sanitize_ident(""), "_empty");
    }

    #[test]
    fn test_scope_class_path_separators() {
        let ctx = EmitContext::new("org.acme.OrdersProcess");
        assert_eq!(ctx.scope_class_path().to_string(), "org :: acme :: OrdersProcess");

        let ctx = EmitContext::new("OrdersProcess");
        assert_eq!(ctx.scope_class_path().to_string(), "OrdersProcess");
    }

    #[test]
    fn test_within_container_restores_target() {
        let mut ctx = EmitContext::new("P");
        assert_eq!(ctx.target().to_string(), "factory");

        let inner = Ident::new("sub_process_5", Span::call_site());
        let seen = ctx.within_container(5, inner, |ctx| {
            (ctx.target().to_string(), ctx.unique_id(2), ctx.node_ident("start", 2))
        });

        assert_eq!(seen.0, "sub_process_5");
        assert_eq!(seen.1, "5:2");
        assert_eq!(seen.2.to_string(), "start_5_2");
        assert_eq!(ctx.target().to_string(), "factory");
        assert_eq!(ctx.unique_id(2), "2");
    }

    #[test]
    fn test_siblings_follow_innermost_container() {
        let mut ctx = EmitContext::new("P");
        assert!(!ctx.is_sibling(1));
        ctx.enter_nodes([1, 2].into());
        ctx.enter_nodes([7].into());
        assert!(ctx.is_sibling(7));
        assert!(!ctx.is_sibling(1));
        ctx.exit_nodes();
        assert!(ctx.is_sibling(1));
    }
}
