// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sub-process node emitter.
//!
//! Nested nodes are emitted against the sub-process builder, which becomes the
//! context target for the nested block. The visited-variable set is shared with
//! the enclosing process, so a nested re-declaration is skipped.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::super::context::EmitContext;
use super::super::TranslationFault;
use super::VisitorSet;
use flowcanon_model::{Node, SubProcessNode};

/// Emit the nested nodes and connections of a sub-process.
pub fn emit(
    sub: &SubProcessNode,
    node: &Node,
    var: &Ident,
    visitors: &VisitorSet,
    ctx: &mut EmitContext,
) -> Result<TokenStream, TranslationFault> {
    let auto_complete = sub.auto_complete;
    let nested = ctx.within_container(node.id, var.clone(), |ctx| {
        visitors.emit_nodes(&sub.nodes, &sub.connections, ctx)
    })?;
    Ok(quote! {
        #var.auto_complete(#auto_complete);
        #nested
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanon_model::{
        Connection, EndNode, HumanTaskNode, NodeKind, NodeType, StartNode, Variable, VariableScope,
    };

    fn review(task_name: &str) -> Node {
        let mut sub = Node::new(
            5,
            NodeKind::SubProcess(SubProcessNode {
                nodes: vec![
                    Node::new(1, NodeKind::Start(StartNode::default())),
                    Node::new(
                        2,
                        NodeKind::HumanTask(HumanTaskNode {
                            task_name: task_name.to_string(),
                            ..HumanTaskNode::default()
                        }),
                    ),
                    Node::new(3, NodeKind::End(EndNode::default())),
                ],
                connections: vec![
                    Connection { from: 1, to: 2, id: None },
                    Connection { from: 2, to: 3, id: None },
                ],
                auto_complete: true,
            }),
        )
        .named("Review");
        sub.variables = Some(VariableScope::new(vec![Variable::new("approved", "Boolean")]));
        sub
    }

    #[test]
    fn test_nested_nodes_target_sub_process_builder() {
        let mut ctx = EmitContext::new("OrdersProcess");
        ctx.enter_nodes([5].into());
        let code = VisitorSet::full().visit(&review("Approve"), &mut ctx).unwrap().to_string();

        assert!(code.starts_with("let sub_process_node_5 = factory . sub_process_node (5u64) ;"));
        assert!(code.contains("sub_process_node_5 . auto_complete (true) ;"));
        assert!(code.contains("let start_node_5_1 = sub_process_node_5 . start_node (1u64) ;"));
        assert!(code.contains("let human_task_node_5_2 = sub_process_node_5 . human_task_node (2u64) ;"));
        assert!(code.contains("sub_process_node_5 . connection (2u64 , 3u64 , \"2-3\") ;"));
        assert!(code.ends_with("sub_process_node_5 . done () ;"));

        // Target and container are restored
        assert_eq!(ctx.target().to_string(), "factory");
        assert_eq!(ctx.unique_id(1), "1");
        assert!(ctx.is_sibling(5));
    }

    #[test]
    fn test_sub_process_variables_precede_nested_ones() {
        let mut ctx = EmitContext::new("P");
        let mut node = review("Approve");
        if let NodeKind::SubProcess(sub) = &mut node.kind {
            sub.nodes[1].variables = Some(VariableScope::new(vec![Variable::new("approved", "String")]));
        }
        let code = VisitorSet::full().visit(&node, &mut ctx).unwrap().to_string();
        assert!(code.contains("sub_process_node_5 . variable (\"approved\" , ObjectDataType :: new (\"Boolean\""));
        assert!(!code.contains("\"String\""));
    }

    #[test]
    fn test_nested_fault_reports_unique_id() {
        let mut ctx = EmitContext::new("P");
        let fault = VisitorSet::full().visit(&review(""), &mut ctx).unwrap_err();
        assert_eq!(fault.node_id, "5:2");
        assert_eq!(fault.node_type, Some(NodeType::HumanTask));
        assert_eq!(ctx.target().to_string(), "factory");
    }
}
