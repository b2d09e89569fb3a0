//! # OctoFHIR HL7v2
//!
//! A high-performance Rust library for the HL7 v2.x message object model:
//! a schema-driven message tree with uniform navigation and mutation,
//! replacing generated per-message-type classes with catalogs of plain
//! schema data.
//!
//! ## Features
//!
//! - **Schema as data**: message structures, segments and datatypes are
//!   serde-loadable descriptors consumed by one generic engine
//! - **Deep default construction**: touching a deep field materializes the
//!   required subtree on demand, no manual scaffolding
//! - **Uniform repetition protocol**: get-or-create, count, list, insert
//!   and remove behave identically for group slots and segment fields
//! - **Path addressing**: `PID-3-1` style field specs for reads and
//!   creating writes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_hl7v2::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let mut registry = SchemaRegistry::new("2.5.1");
//! registry.register_primitive(PrimitiveSchema::new("ST"));
//! registry.register_segment(
//!     SegmentSchema::new("NTE")
//!         .with_field(FieldDescriptor::new("Set ID - NTE", "ST").required())
//!         .with_field(FieldDescriptor::new("Comment", "ST").repeating()),
//! );
//! registry.register_group(
//!     GroupSchema::new("NTE_ONLY").with_slot(SlotDescriptor::of("NTE").required().repeating()),
//! );
//! registry.register_message(MessageSchema::new("NTE_ONLY", "2.5.1", "NTE_ONLY"));
//! registry.validate()?;
//!
//! let mut message = Message::new(Arc::new(registry), "NTE_ONLY")?;
//! message.set_path("NTE-2", "a comment")?;
//! assert_eq!(message.get_path("NTE-2")?, Some("a comment".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod path;
pub mod schema;

mod engine;
mod validation;

pub use error::Result; // Our Result type takes precedence
pub use error::Hl7ModelError;
pub use model::{Message, NodeId, NodeKind, Walk};
pub use path::FieldSpec;
pub use schema::{
    ComponentDescriptor, CompositeSchema, FieldDescriptor, GroupSchema, MessageSchema,
    PrimitiveSchema, SchemaRegistry, SegmentSchema, SlotDescriptor, TypeDef,
};
