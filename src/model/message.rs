use std::sync::Arc;

use crate::engine::builder::Builder;
use crate::error::{Hl7ModelError, Result};
use crate::schema::{MessageSchema, SchemaRegistry, TypeDef};

use super::arena::{Arena, NodeId, NodeKind, Payload};

/// The root of one parsed or constructed HL7 document. Owns the node arena
/// and handles to its schema; content is mutable, schema is not. The whole
/// tree is torn down when the message is dropped.
///
/// A message is a single-writer structure: no internal synchronization,
/// one logical task mutates it at a time (one message per unit of work).
#[derive(Debug)]
pub struct Message {
    registry: Arc<SchemaRegistry>,
    schema: Arc<MessageSchema>,
    pub(crate) arena: Arena,
    root: NodeId,
}

impl Message {
    /// Constructs an empty message of the given structure, materializing
    /// the root group and, recursively, every required slot beneath it.
    pub fn new(registry: Arc<SchemaRegistry>, message_type: &str) -> Result<Self> {
        let schema = registry.message(message_type).ok_or_else(|| {
            Hl7ModelError::construction(format!(
                "Message structure {message_type} is not defined in the registry"
            ))
        })?;

        let root_group = match registry.resolve(&schema.root) {
            Some(TypeDef::Group(group)) => group.clone(),
            Some(other) => {
                return Err(Hl7ModelError::construction(format!(
                    "Message {} root {} is a {}, expected a group",
                    schema.name,
                    schema.root,
                    other.kind_name()
                )));
            }
            None => {
                return Err(Hl7ModelError::construction(format!(
                    "Message {} root {} is not defined",
                    schema.name, schema.root
                )));
            }
        };

        let mut arena = Arena::default();
        let root = Builder::new(&registry, &mut arena).build_group(&root_group, None)?;

        tracing::debug!(
            message_type = %schema.name,
            version = %schema.version,
            nodes = arena.len(),
            "constructed message"
        );

        Ok(Self {
            registry,
            schema,
            arena,
            root,
        })
    }

    /// The root group node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Message structure name, e.g. "ORU_R01".
    pub fn message_type(&self) -> &str {
        &self.schema.name
    }

    /// HL7 version of this message's schema, e.g. "2.5.1".
    pub fn version(&self) -> &str {
        &self.schema.version
    }

    pub fn schema(&self) -> &MessageSchema {
        &self.schema
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.arena.node(node).payload.kind()
    }

    /// Schema type name of a node (e.g. "PID", "CX", "ST").
    pub fn type_name(&self, node: NodeId) -> &str {
        self.arena.node(node).payload.type_name()
    }

    /// Parent of a node; `None` for the root and for removed repetitions'
    /// former children only at the root itself.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.node(node).parent
    }

    /// Number of nodes materialized so far, removed repetitions included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn payload(&self, node: NodeId) -> &Payload {
        &self.arena.node(node).payload
    }

    pub(crate) fn payload_mut(&mut self, node: NodeId) -> &mut Payload {
        &mut self.arena.node_mut(node).payload
    }
}
