use super::Message;
use super::arena::{NodeId, NodeKind, Payload};

impl Message {
    /// Existing children of a node in schema order, flattened across
    /// slots. Never constructs.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.payload(node) {
            Payload::Group(group) => group.slots.iter().flatten().copied().collect(),
            Payload::Segment(segment) => segment.fields.iter().flatten().copied().collect(),
            Payload::Composite(composite) => composite.components.clone(),
            Payload::Primitive(_) => Vec::new(),
        }
    }

    /// Pre-order traversal of every existing node in schema order, the
    /// read-only walk an encoder regenerates wire bytes from.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            message: self,
            stack: vec![self.root()],
        }
    }

    /// Existing segments in document order.
    pub fn segments(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.walk()
            .filter(|&node| self.kind(node) == NodeKind::Segment)
    }

    /// The nth existing segment with the given schema name, in document
    /// order. Never constructs.
    pub fn find_segment(&self, name: &str, rep: usize) -> Option<NodeId> {
        self.segments()
            .filter(|&node| self.type_name(node) == name)
            .nth(rep)
    }
}

/// Depth-first iterator over a message's existing nodes.
#[derive(Debug)]
pub struct Walk<'a> {
    message: &'a Message,
    stack: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = self.message.children(node);
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}
