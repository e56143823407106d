// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process model types.
//!
//! A process is an ordered list of nodes wired together by connections, with a
//! process-level variable scope and metadata. Node order is significant: the
//! compiler emits builder calls in exactly this order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter, EnumString};

use crate::metadata::Metadata;

/// Node identifier, unique within its container (process or sub-process).
pub type NodeId = u64;

// ============================================================================
// Root Types
// ============================================================================

/// Complete process definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModel {
    /// Process identifier, used for the generated type and file names
    pub id: String,

    /// Human-readable process name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Logical package the process belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// Process version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Nodes in declaration order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Control flow between nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,

    /// Process-level variables
    #[serde(default)]
    pub variables: VariableScope,

    /// Free-form process metadata
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// A typed variable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Variable {
    /// Variable name, unique within the scope
    pub name: String,

    /// Declared type descriptor (e.g. `String`, `org.acme.Order`)
    #[serde(rename = "type")]
    pub type_name: String,

    /// Comma-separated variable tags (e.g. `input,required`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Variable {
    /// Create an untagged variable.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            tags: None,
        }
    }

    /// Attach tags to the variable.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

/// Ordered collection of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VariableScope {
    /// Variables in declaration order
    pub variables: Vec<Variable>,
}

impl VariableScope {
    /// Build a scope from a list of variables.
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Whether the scope declares no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A control-flow edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Connection {
    /// Source node
    pub from: NodeId,

    /// Target node
    pub to: NodeId,

    /// Connection identifier (defaults to `{from}-{to}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Connection {
    /// The connection identifier, falling back to `{from}-{to}`.
    pub fn unique_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.from, self.to))
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A process node: common fields plus the kind-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    /// Node identifier
    pub id: NodeId,

    /// Human-readable node name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Node-owned metadata
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,

    /// Node-owned variable scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableScope>,

    /// Kind-specific payload, discriminated by the `type` field
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with no name, metadata or variables.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            metadata: Metadata::new(),
            variables: None,
            kind,
        }
    }

    /// Set the node name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The field-less kind of this node.
    pub fn node_type(&self) -> NodeType {
        NodeType::from(&self.kind)
    }
}

/// Union of all node kinds, discriminated by the `type` field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", rename_all = "camelCase")]
#[strum_discriminants(name(NodeType))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, Display, EnumString, EnumIter))]
#[strum_discriminants(strum(serialize_all = "camelCase"))]
pub enum NodeKind {
    /// Process entry point
    Start(StartNode),
    /// Process exit point
    End(EndNode),
    /// Inline script action
    Action(ActionNode),
    /// Service task delegated to a work item handler
    WorkItem(WorkItemNode),
    /// Task assigned to a human actor or group
    HumanTask(HumanTaskNode),
    /// Diverging gateway
    Split(SplitNode),
    /// Converging gateway
    Join(JoinNode),
    /// Intermediate catch event
    Event(EventNode),
    /// Intermediate timer
    Timer(TimerNode),
    /// Event attached to the boundary of another node
    BoundaryEvent(BoundaryEventNode),
    /// Embedded sub-process with its own nodes and connections
    SubProcess(SubProcessNode),
}

/// Process entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartNode {
    /// Message or signal that triggers the process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

/// Process exit point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndNode {
    /// Terminate the whole process instead of the current path
    #[serde(default)]
    pub terminate: bool,
}

/// Inline script action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionNode {
    /// Script dialect (e.g. `rhai`, `jq`)
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Script body
    pub script: String,
}

/// Service task delegated to a work item handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemNode {
    /// Name of the work item handler
    pub work_name: String,

    /// Static handler parameters
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub parameters: Metadata,
}

/// Task assigned to a human actor or group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanTaskNode {
    /// Task name shown to the assignee
    pub task_name: String,

    /// Assigned actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    /// Assigned group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Gateway semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum GatewayType {
    /// Exclusive
    #[default]
    Xor,
    /// Parallel
    And,
    /// Inclusive
    Or,
}

/// Diverging gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitNode {
    /// Gateway semantics
    #[serde(default)]
    pub gateway: GatewayType,

    /// Outgoing constraints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// Condition guarding an outgoing branch of a split.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Target node of the guarded branch
    pub to_node: NodeId,

    /// Constraint name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expression dialect
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Guard expression
    pub expression: String,

    /// Evaluation priority (lower first)
    #[serde(default)]
    pub priority: i32,
}

/// Converging gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinNode {
    /// Gateway semantics
    #[serde(default)]
    pub gateway: GatewayType,
}

/// Intermediate catch event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    /// Event type to wait for
    pub event_type: String,

    /// Variable receiving the event payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
}

/// Intermediate timer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerNode {
    /// Initial delay (ISO-8601 duration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    /// Repeat period (ISO-8601 duration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Event attached to the boundary of another node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryEventNode {
    /// Event type to wait for
    pub event_type: String,

    /// Unique id of the node this event is attached to
    pub attached_to: String,

    /// Whether triggering the event cancels the attached activity
    #[serde(default = "default_true")]
    pub cancel_activity: bool,
}

/// Embedded sub-process.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubProcessNode {
    /// Nested nodes in declaration order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Nested control flow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,

    /// Complete automatically once no nested node is active
    #[serde(default)]
    pub auto_complete: bool,
}

fn default_dialect() -> String {
    "rhai".to_string()
}

fn default_true() -> bool {
    true
}
