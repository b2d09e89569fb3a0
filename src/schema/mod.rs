//! Static schema descriptors: the per-node metadata the engine is driven
//! by. Descriptors are plain serde data, so whole message catalogs load
//! from JSON instead of being generated code.

pub mod datatype;
pub mod group;
pub mod message;
pub mod registry;
pub mod segment;

pub use datatype::{ComponentDescriptor, CompositeSchema, PrimitiveSchema};
pub use group::{GroupSchema, SlotDescriptor};
pub use message::MessageSchema;
pub use registry::{SchemaRegistry, TypeDef};
pub use segment::{FieldDescriptor, SegmentSchema};
