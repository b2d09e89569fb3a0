//! The runtime tree: message root, arena-allocated nodes, parent links as
//! indices, and the read-only traversal the encoder walks.

pub(crate) mod arena;
pub mod message;
pub mod walk;

pub use arena::{NodeId, NodeKind};
pub use message::Message;
pub use walk::Walk;
