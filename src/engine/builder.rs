use std::sync::Arc;

use crate::error::{Hl7ModelError, Result};
use crate::model::arena::{
    Arena, CompositeNode, GroupNode, NodeId, Payload, PrimitiveNode, SegmentNode,
};
use crate::schema::{CompositeSchema, GroupSchema, SchemaRegistry, SegmentSchema, TypeDef};

/// Hard bound on schema-driven recursion, for catalogs that were never
/// run through `SchemaRegistry::validate`.
const MAX_DEPTH: usize = 64;

/// Per-site construction parameters for a datatype child. HL7 binds the
/// coded table and max length at the field or component, not on the type.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ValueSite {
    pub table: Option<u16>,
    pub max_length: usize,
}

/// The single recursive default-construction engine, dispatched on the
/// [`TypeDef`] tag. Constructing a node materializes its required slots
/// all the way down, so touching a deep field never needs manual
/// scaffolding.
pub(crate) struct Builder<'a> {
    registry: &'a SchemaRegistry,
    arena: &'a mut Arena,
}

impl<'a> Builder<'a> {
    pub fn new(registry: &'a SchemaRegistry, arena: &'a mut Arena) -> Self {
        Self { registry, arena }
    }

    /// Builds a group subtree from an already-resolved schema (the message
    /// root path).
    pub fn build_group(
        &mut self,
        schema: &Arc<GroupSchema>,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        self.group(schema, parent, 0)
    }

    /// Builds a group or segment child for a group slot.
    pub fn build_structure(&mut self, type_name: &str, parent: NodeId) -> Result<NodeId> {
        self.structure(type_name, parent, 0)
    }

    /// Builds a composite or primitive child for a field or component site.
    pub fn build_value(
        &mut self,
        type_name: &str,
        site: ValueSite,
        parent: NodeId,
    ) -> Result<NodeId> {
        self.value(type_name, site, parent, 0)
    }

    fn structure(&mut self, type_name: &str, parent: NodeId, depth: usize) -> Result<NodeId> {
        let def = self.registry.resolve(type_name).cloned();
        match def {
            Some(TypeDef::Group(schema)) => self.group(&schema, Some(parent), depth),
            Some(TypeDef::Segment(schema)) => self.segment(&schema, parent, depth),
            Some(other) => Err(Hl7ModelError::construction(format!(
                "Can't construct {type_name}: defined as a {}, expected a group or segment",
                other.kind_name()
            ))),
            None => Err(Hl7ModelError::construction(format!(
                "Can't construct {type_name}: not defined in the registry"
            ))),
        }
    }

    fn value(
        &mut self,
        type_name: &str,
        site: ValueSite,
        parent: NodeId,
        depth: usize,
    ) -> Result<NodeId> {
        let def = self.registry.resolve(type_name).cloned();
        match def {
            Some(TypeDef::Primitive(schema)) => Ok(self.arena.alloc(
                Some(parent),
                Payload::Primitive(PrimitiveNode {
                    schema,
                    value: String::new(),
                    table: site.table,
                    max_length: site.max_length,
                }),
            )),
            Some(TypeDef::Composite(schema)) => self.composite(&schema, parent, depth),
            Some(other) => Err(Hl7ModelError::construction(format!(
                "Can't construct {type_name}: defined as a {}, expected a datatype",
                other.kind_name()
            ))),
            None => Err(Hl7ModelError::construction(format!(
                "Can't construct {type_name}: not defined in the registry"
            ))),
        }
    }

    fn group(
        &mut self,
        schema: &Arc<GroupSchema>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId> {
        self.check_depth(depth, &schema.name)?;
        let id = self.arena.alloc(
            parent,
            Payload::Group(GroupNode {
                schema: schema.clone(),
                slots: vec![Vec::new(); schema.slots.len()],
            }),
        );
        for (index, slot) in schema.slots.iter().enumerate() {
            if !slot.required {
                continue;
            }
            let child = self.structure(&slot.type_name, id, depth + 1)?;
            match &mut self.arena.node_mut(id).payload {
                Payload::Group(group) => group.slots[index].push(child),
                _ => unreachable!("freshly allocated group node"),
            }
        }
        Ok(id)
    }

    fn segment(
        &mut self,
        schema: &Arc<SegmentSchema>,
        parent: NodeId,
        depth: usize,
    ) -> Result<NodeId> {
        self.check_depth(depth, &schema.name)?;
        let id = self.arena.alloc(
            Some(parent),
            Payload::Segment(SegmentNode {
                schema: schema.clone(),
                fields: vec![Vec::new(); schema.fields.len()],
            }),
        );
        for (index, field) in schema.fields.iter().enumerate() {
            if !field.required {
                continue;
            }
            let site = ValueSite {
                table: field.table,
                max_length: field.max_length,
            };
            let child = self.value(&field.type_name, site, id, depth + 1)?;
            match &mut self.arena.node_mut(id).payload {
                Payload::Segment(segment) => segment.fields[index].push(child),
                _ => unreachable!("freshly allocated segment node"),
            }
        }
        Ok(id)
    }

    fn composite(
        &mut self,
        schema: &Arc<CompositeSchema>,
        parent: NodeId,
        depth: usize,
    ) -> Result<NodeId> {
        self.check_depth(depth, &schema.name)?;
        let id = self.arena.alloc(
            Some(parent),
            Payload::Composite(CompositeNode {
                schema: schema.clone(),
                components: Vec::with_capacity(schema.components.len()),
            }),
        );
        // All components materialize with the composite, so component
        // access never constructs.
        for component in &schema.components {
            let site = ValueSite {
                table: component.table,
                max_length: 0,
            };
            let child = self.value(&component.type_name, site, id, depth + 1)?;
            match &mut self.arena.node_mut(id).payload {
                Payload::Composite(composite) => composite.components.push(child),
                _ => unreachable!("freshly allocated composite node"),
            }
        }
        Ok(id)
    }

    fn check_depth(&self, depth: usize, type_name: &str) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Err(Hl7ModelError::construction(format!(
                "Construction of {type_name} exceeded nesting depth {MAX_DEPTH}; the schema likely contains a cycle"
            )));
        }
        Ok(())
    }
}
