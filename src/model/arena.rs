use std::sync::Arc;

use crate::schema::{CompositeSchema, GroupSchema, PrimitiveSchema, SegmentSchema};

/// Handle to a node inside its owning [`Message`](crate::model::Message).
/// Ids are arena indices: parent links are stored as indices rather than
/// owning references, so the tree has O(1) parent lookup without reference
/// cycles. An id is only meaningful within the message that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The four runtime node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Segment,
    Composite,
    Primitive,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NodeKind::Group => "group",
            NodeKind::Segment => "segment",
            NodeKind::Composite => "composite",
            NodeKind::Primitive => "primitive",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub(crate) struct GroupNode {
    pub schema: Arc<GroupSchema>,
    /// Repetition lists, parallel to `schema.slots`.
    pub slots: Vec<Vec<NodeId>>,
}

#[derive(Debug)]
pub(crate) struct SegmentNode {
    pub schema: Arc<SegmentSchema>,
    /// Repetition lists, parallel to `schema.fields`.
    pub fields: Vec<Vec<NodeId>>,
}

#[derive(Debug)]
pub(crate) struct CompositeNode {
    pub schema: Arc<CompositeSchema>,
    /// One node per schema component, materialized eagerly.
    pub components: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct PrimitiveNode {
    pub schema: Arc<PrimitiveSchema>,
    pub value: String,
    /// Coded-table id and max length bound at the use site.
    pub table: Option<u16>,
    pub max_length: usize,
}

#[derive(Debug)]
pub(crate) enum Payload {
    Group(GroupNode),
    Segment(SegmentNode),
    Composite(CompositeNode),
    Primitive(PrimitiveNode),
}

impl Payload {
    pub fn kind(&self) -> NodeKind {
        match self {
            Payload::Group(_) => NodeKind::Group,
            Payload::Segment(_) => NodeKind::Segment,
            Payload::Composite(_) => NodeKind::Composite,
            Payload::Primitive(_) => NodeKind::Primitive,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Payload::Group(node) => &node.schema.name,
            Payload::Segment(node) => &node.schema.name,
            Payload::Composite(node) => &node.schema.name,
            Payload::Primitive(node) => &node.schema.name,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    /// Set exactly once at construction, never reassigned.
    pub parent: Option<NodeId>,
    pub payload: Payload,
}

/// Flat storage for every node of one message. Nodes are destroyed only by
/// discarding the owning message; a removed repetition stays readable in
/// the arena but is unreachable from the tree.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn alloc(&mut self, parent: Option<NodeId>, payload: Payload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { parent, payload });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
