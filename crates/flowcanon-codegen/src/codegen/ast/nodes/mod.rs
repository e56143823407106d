// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node visitors for AST-based code generation.
//!
//! Each node kind has its own emitter producing the kind-specific builder
//! calls. The shared prelude (node declaration, name, metadata, variables)
//! and epilogue (`done()`) are emitted here.

pub mod action;
pub mod event;
pub mod gateway;
pub mod human_task;
pub mod start_end;
pub mod sub_process;
pub mod work_item;

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

use super::context::EmitContext;
use super::emitter::{emit_metadata, emit_variables};
use super::{FaultReason, TranslationFault};
use flowcanon_model::{Connection, Node, NodeKind, NodeType};

/// The set of node kinds a compilation can translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorSet {
    kinds: BTreeSet<NodeType>,
}

impl Default for VisitorSet {
    fn default() -> Self {
        Self::full()
    }
}

impl VisitorSet {
    /// Visitors for every node kind.
    pub fn full() -> Self {
        Self {
            kinds: NodeType::iter().collect(),
        }
    }

    /// Visitors for the given kinds only.
    pub fn with_kinds(kinds: impl IntoIterator<Item = NodeType>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Whether nodes of `node_type` can be translated.
    pub fn is_registered(&self, node_type: NodeType) -> bool {
        self.kinds.contains(&node_type)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = NodeType> + '_ {
        self.kinds.iter().copied()
    }

    /// Emit the builder calls for one node.
    pub fn visit(&self, node: &Node, ctx: &mut EmitContext) -> Result<TokenStream, TranslationFault> {
        let node_type = node.node_type();
        if !self.is_registered(node_type) {
            return Err(TranslationFault::new(
                ctx.unique_id(node.id),
                node_type,
                FaultReason::Unregistered,
            ));
        }

        let method = builder_method(node_type);
        let var = ctx.node_ident(method, node.id);

        let target = ctx.target().clone();
        let method = Ident::new(method, Span::call_site());
        let id = Literal::u64_suffixed(node.id);
        let name = node.name.as_ref().map(|name| quote! { #var.name(#name); });
        let metadata = emit_metadata(&node.metadata, &var);
        let scope_class = ctx.scope_class_path();
        let variables = emit_variables(
            node.variables.as_ref(),
            &var,
            ctx.visited_variables_mut(),
            &scope_class,
        );

        // Nested declarations come after the node's own variables
        let body = match &node.kind {
            NodeKind::Start(start) => start_end::emit_start(start, &var),
            NodeKind::End(end) => start_end::emit_end(end, &var),
            NodeKind::Action(action) => action::emit(action, &var),
            NodeKind::WorkItem(work) => work_item::emit(work, node, &var, ctx)?,
            NodeKind::HumanTask(task) => human_task::emit(task, node, &var, ctx)?,
            NodeKind::Split(split) => gateway::emit_split(split, node, &var, ctx)?,
            NodeKind::Join(join) => gateway::emit_join(join, &var),
            NodeKind::Event(event) => event::emit_event(event, node, &var, ctx)?,
            NodeKind::Timer(timer) => event::emit_timer(timer, &var),
            NodeKind::BoundaryEvent(event) => event::emit_boundary(event, node, &var, ctx)?,
            NodeKind::SubProcess(sub) => sub_process::emit(sub, node, &var, self, ctx)?,
        };

        Ok(quote! {
            let #var = #target.#method(#id);
            #name
            #(#metadata)*
            #(#variables)*
            #body
            #var.done();
        })
    }

    /// Emit a container's nodes in declaration order followed by its connections.
    ///
    /// The container is whatever the context currently targets: the process
    /// factory or a sub-process builder.
    pub fn emit_nodes(
        &self,
        nodes: &[Node],
        connections: &[Connection],
        ctx: &mut EmitContext,
    ) -> Result<TokenStream, TranslationFault> {
        ctx.enter_nodes(nodes.iter().map(|n| n.id).collect());
        let result = self.emit_container(nodes, connections, ctx);
        ctx.exit_nodes();
        result
    }

    fn emit_container(
        &self,
        nodes: &[Node],
        connections: &[Connection],
        ctx: &mut EmitContext,
    ) -> Result<TokenStream, TranslationFault> {
        let mut emitted = Vec::with_capacity(nodes.len());
        for node in nodes {
            emitted.push(self.visit(node, ctx)?);
        }
        let connections = emit_connections(connections, ctx)?;
        Ok(quote! {
            #(#emitted)*
            #(#connections)*
        })
    }
}

/// Emit `target.connection(from, to, id)` for each connection of the current
/// container. Both endpoints must be declared in that container.
fn emit_connections(
    connections: &[Connection],
    ctx: &EmitContext,
) -> Result<Vec<TokenStream>, TranslationFault> {
    let target = ctx.target();
    connections
        .iter()
        .map(|connection| {
            let unique_id = connection.unique_id();
            if let Some(missing) = [connection.from, connection.to]
                .into_iter()
                .find(|id| !ctx.is_sibling(*id))
            {
                return Err(TranslationFault {
                    node_id: ctx.unique_id(missing),
                    node_type: None,
                    reason: FaultReason::UnknownConnectionEndpoint(unique_id),
                });
            }
            let from = Literal::u64_suffixed(connection.from);
            let to = Literal::u64_suffixed(connection.to);
            Ok(quote! { #target.connection(#from, #to, #unique_id); })
        })
        .collect()
}

/// Factory method declaring a node of the given kind.
pub fn builder_method(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Start => "start_node",
        NodeType::End => "end_node",
        NodeType::Action => "action_node",
        NodeType::WorkItem => "work_item_node",
        NodeType::HumanTask => "human_task_node",
        NodeType::Split => "split_node",
        NodeType::Join => "join_node",
        NodeType::Event => "event_node",
        NodeType::Timer => "timer_node",
        NodeType::BoundaryEvent => "boundary_event_node",
        NodeType::SubProcess => "sub_process_node",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanon_model::{EndNode, StartNode, Variable, VariableScope};

    fn start(id: u64) -> Node {
        Node::new(id, NodeKind::Start(StartNode::default()))
    }

    fn end(id: u64) -> Node {
        Node::new(id, NodeKind::End(EndNode::default()))
    }

    fn connect(from: u64, to: u64) -> Connection {
        Connection { from, to, id: None }
    }

    #[test]
    fn test_visit_emits_prelude_and_done() {
        let mut ctx = EmitContext::new("OrdersProcess");
        let mut node = start(1).named("Start");
        node.metadata.insert("UniqueId".into(), "_1".into());

        let code = VisitorSet::full().visit(&node, &mut ctx).unwrap().to_string();
        assert!(code.starts_with("let start_node_1 = factory . start_node (1u64) ;"));
        assert!(code.contains("start_node_1 . name (\"Start\")"));
        assert!(code.contains("start_node_1 . metadata (\"UniqueId\" , \"_1\")"));
        assert!(code.ends_with("start_node_1 . done () ;"));
    }

    #[test]
    fn test_unregistered_kind_is_fault() {
        let visitors = VisitorSet::with_kinds([NodeType::Start]);
        let mut ctx = EmitContext::new("P");

        assert!(visitors.visit(&start(1), &mut ctx).is_ok());
        let fault = visitors.visit(&end(2), &mut ctx).unwrap_err();
        assert_eq!(fault.node_id, "2");
        assert_eq!(fault.node_type, Some(NodeType::End));
        assert_eq!(fault.reason, FaultReason::Unregistered);
    }

    #[test]
    fn test_emit_nodes_preserves_declaration_order() {
        let mut ctx = EmitContext::new("P");
        let nodes = vec![end(9), start(3), end(4)];
        let code = VisitorSet::full()
            .emit_nodes(&nodes, &[connect(3, 9)], &mut ctx)
            .unwrap()
            .to_string();

        let first = code.find("end_node (9u64)").unwrap();
        let second = code.find("start_node (3u64)").unwrap();
        let third = code.find("end_node (4u64)").unwrap();
        assert!(first < second && second < third);
        assert!(code.ends_with("factory . connection (3u64 , 9u64 , \"3-9\") ;"));
    }

    #[test]
    fn test_connection_to_unknown_node_is_fault() {
        let mut ctx = EmitContext::new("P");
        let fault = VisitorSet::full()
            .emit_nodes(&[start(1)], &[connect(1, 7)], &mut ctx)
            .unwrap_err();
        assert_eq!(fault.node_id, "7");
        assert_eq!(fault.node_type, None);
        assert_eq!(
            fault.reason,
            FaultReason::UnknownConnectionEndpoint("1-7".to_string())
        );
        // Container registration is unwound on failure
        assert!(!ctx.is_sibling(1));
    }

    #[test]
    fn test_node_variables_share_visited_set() {
        let mut ctx = EmitContext::new("P");
        ctx.visited_variables_mut().insert("order".to_string());

        let mut node = start(1);
        node.variables = Some(VariableScope::new(vec![
            Variable::new("order", "Order"),
            Variable::new("trace", "String"),
        ]));
        let code = VisitorSet::full().visit(&node, &mut ctx).unwrap().to_string();

        assert!(code.contains("start_node_1 . variable (\"trace\""));
        assert!(!code.contains("\"order\""));
        assert!(ctx.visited_variables().contains("trace"));
    }

    #[test]
    fn test_every_kind_has_a_builder_method() {
        let methods: BTreeSet<_> = NodeType::iter().map(builder_method).collect();
        assert_eq!(methods.len(), NodeType::iter().count());
    }
}
