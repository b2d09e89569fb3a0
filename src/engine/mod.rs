//! The navigation & mutation engine. One repetition protocol (get or
//! create, count existing, list existing, insert at, remove at) backs
//! every address form: group slots are addressed by name, segment fields
//! by 1-based number, and both reduce to the same engine; only slot
//! resolution differs.

pub(crate) mod builder;

use std::sync::Arc;

use crate::error::{Hl7ModelError, Result};
use crate::model::Message;
use crate::model::arena::{NodeId, Payload};
use crate::validation;

use builder::{Builder, ValueSite};

/// How a child slot is addressed.
#[derive(Debug, Clone, Copy)]
enum SlotAddr<'a> {
    Named { parent: NodeId, name: &'a str },
    Field { segment: NodeId, number: usize },
}

impl SlotAddr<'_> {
    fn parent(&self) -> NodeId {
        match *self {
            SlotAddr::Named { parent, .. } => parent,
            SlotAddr::Field { segment, .. } => segment,
        }
    }
}

/// What the builder needs to construct one child for a slot.
#[derive(Debug)]
enum ChildSpec {
    Structure { type_name: String },
    Value { type_name: String, site: ValueSite },
}

#[derive(Debug)]
struct ResolvedSlot {
    index: usize,
    repeating: bool,
    label: String,
    child: ChildSpec,
}

impl Message {
    // ---- group slots, addressed by name -------------------------------

    /// Returns the single instance of a non-repeating slot, or the first
    /// repetition of a repeating one, constructing the default subtree if
    /// absent. Never fails for a schema-valid slot; idempotent.
    pub fn get_or_create(&mut self, parent: NodeId, slot: &str) -> Result<NodeId> {
        self.slot_get_or_create(SlotAddr::Named { parent, name: slot }, 0)
    }

    /// Returns repetition `rep`, constructing it iff `rep` equals the
    /// current count (append-only growth).
    pub fn get_or_create_rep(&mut self, parent: NodeId, slot: &str, rep: usize) -> Result<NodeId> {
        self.slot_get_or_create(SlotAddr::Named { parent, name: slot }, rep)
    }

    /// Current repetition count; constructs nothing. 0 is a valid result.
    pub fn count_existing(&self, parent: NodeId, slot: &str) -> Result<usize> {
        self.slot_count(SlotAddr::Named { parent, name: slot })
    }

    /// Ordered snapshot of the current repetitions, possibly empty. Never
    /// mutates the tree.
    pub fn list_existing(&self, parent: NodeId, slot: &str) -> Result<Vec<NodeId>> {
        self.slot_list(SlotAddr::Named { parent, name: slot })
    }

    /// Constructs a default instance at `rep`, shifting subsequent
    /// repetitions up by one.
    pub fn insert_at(&mut self, parent: NodeId, slot: &str, rep: usize) -> Result<NodeId> {
        self.slot_insert(SlotAddr::Named { parent, name: slot }, rep)
    }

    /// Removes and returns the repetition at `rep`, shifting subsequent
    /// repetitions down by one. The removed subtree stays readable until
    /// the message is dropped.
    pub fn remove_at(&mut self, parent: NodeId, slot: &str, rep: usize) -> Result<NodeId> {
        self.slot_remove(SlotAddr::Named { parent, name: slot }, rep)
    }

    // ---- segment fields, addressed by 1-based number ------------------

    /// First repetition of a field, creating it if necessary.
    pub fn field(&mut self, segment: NodeId, number: usize) -> Result<NodeId> {
        self.slot_get_or_create(SlotAddr::Field { segment, number }, 0)
    }

    /// Repetition `rep` of a field, with the same append-only contract as
    /// [`Message::get_or_create_rep`].
    pub fn field_rep(&mut self, segment: NodeId, number: usize, rep: usize) -> Result<NodeId> {
        self.slot_get_or_create(SlotAddr::Field { segment, number }, rep)
    }

    /// Number of existing repetitions of a field.
    pub fn field_reps(&self, segment: NodeId, number: usize) -> Result<usize> {
        self.slot_count(SlotAddr::Field { segment, number })
    }

    /// Ordered snapshot of a field's existing repetitions; never creates.
    pub fn field_all(&self, segment: NodeId, number: usize) -> Result<Vec<NodeId>> {
        self.slot_list(SlotAddr::Field { segment, number })
    }

    pub fn insert_field_rep(&mut self, segment: NodeId, number: usize, rep: usize) -> Result<NodeId> {
        self.slot_insert(SlotAddr::Field { segment, number }, rep)
    }

    pub fn remove_field_rep(&mut self, segment: NodeId, number: usize, rep: usize) -> Result<NodeId> {
        self.slot_remove(SlotAddr::Field { segment, number }, rep)
    }

    // ---- composite components, addressed by 0-based index -------------

    /// Component at a 0-based index. Components materialize with their
    /// composite, so this never constructs; an index beyond the schema is
    /// a schema violation regardless of content state.
    pub fn component(&self, composite: NodeId, index: usize) -> Result<NodeId> {
        match self.payload(composite) {
            Payload::Composite(node) => {
                validation::check_component_index(
                    &node.schema.name,
                    node.schema.components.len(),
                    index,
                )?;
                Ok(node.components[index])
            }
            other => Err(Hl7ModelError::schema_violation(format!(
                "{} is a {} node, components only exist on composites",
                other.type_name(),
                other.kind()
            ))),
        }
    }

    /// Schema-declared component count of a composite.
    pub fn component_count(&self, composite: NodeId) -> Result<usize> {
        match self.payload(composite) {
            Payload::Composite(node) => Ok(node.schema.components.len()),
            other => Err(Hl7ModelError::schema_violation(format!(
                "{} is a {} node, components only exist on composites",
                other.type_name(),
                other.kind()
            ))),
        }
    }

    // ---- primitive values ---------------------------------------------

    pub fn value(&self, node: NodeId) -> Result<&str> {
        match self.payload(node) {
            Payload::Primitive(primitive) => Ok(&primitive.value),
            other => Err(Hl7ModelError::schema_violation(format!(
                "Can't read a scalar value from {} ({} node)",
                other.type_name(),
                other.kind()
            ))),
        }
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match self.payload_mut(node) {
            Payload::Primitive(primitive) => {
                primitive.value = value;
                Ok(())
            }
            other => Err(Hl7ModelError::schema_violation(format!(
                "Can't write a scalar value to {} ({} node)",
                other.type_name(),
                other.kind()
            ))),
        }
    }

    /// Sets a value, truncating it to the max length bound at this node's
    /// field site. A max length of 0 means unbounded.
    pub fn set_value_truncating(&mut self, node: NodeId, value: &str) -> Result<()> {
        let max = match self.payload(node) {
            Payload::Primitive(primitive) => primitive.max_length,
            other => {
                return Err(Hl7ModelError::schema_violation(format!(
                    "Can't write a scalar value to {} ({} node)",
                    other.type_name(),
                    other.kind()
                )));
            }
        };
        if max > 0 && value.chars().count() > max {
            let truncated: String = value.chars().take(max).collect();
            tracing::debug!(max, "truncated value on write");
            self.set_value(node, truncated)
        } else {
            self.set_value(node, value)
        }
    }

    /// Coded-table id bound at this primitive's use site, if any.
    pub fn coded_table(&self, node: NodeId) -> Option<u16> {
        match self.payload(node) {
            Payload::Primitive(primitive) => primitive.table,
            _ => None,
        }
    }

    /// Max length bound at this primitive's use site; 0 means unbounded.
    pub fn max_length(&self, node: NodeId) -> usize {
        match self.payload(node) {
            Payload::Primitive(primitive) => primitive.max_length,
            _ => 0,
        }
    }

    // ---- the shared repetition engine ---------------------------------

    fn slot_get_or_create(&mut self, addr: SlotAddr<'_>, rep: usize) -> Result<NodeId> {
        let resolved = self.resolve_slot(addr)?;
        let parent = addr.parent();
        let existing = self.rep_list(parent, resolved.index);
        if let Some(&id) = existing.get(rep) {
            return Ok(id);
        }
        let count = existing.len();
        validation::check_append_index(&resolved.label, count, rep)?;
        validation::check_repeatable(&resolved.label, resolved.repeating, rep)?;
        let child = self.build_child(parent, &resolved.child)?;
        self.rep_list_mut(parent, resolved.index).push(child);
        Ok(child)
    }

    fn slot_count(&self, addr: SlotAddr<'_>) -> Result<usize> {
        let resolved = self.resolve_slot(addr)?;
        Ok(self.rep_list(addr.parent(), resolved.index).len())
    }

    fn slot_list(&self, addr: SlotAddr<'_>) -> Result<Vec<NodeId>> {
        let resolved = self.resolve_slot(addr)?;
        Ok(self.rep_list(addr.parent(), resolved.index).to_vec())
    }

    fn slot_insert(&mut self, addr: SlotAddr<'_>, rep: usize) -> Result<NodeId> {
        let resolved = self.resolve_slot(addr)?;
        let parent = addr.parent();
        let count = self.rep_list(parent, resolved.index).len();
        validation::check_append_index(&resolved.label, count, rep)?;
        validation::check_repeatable(&resolved.label, resolved.repeating, count)?;
        let child = self.build_child(parent, &resolved.child)?;
        self.rep_list_mut(parent, resolved.index).insert(rep, child);
        tracing::debug!(slot = %resolved.label, rep, "inserted repetition");
        Ok(child)
    }

    fn slot_remove(&mut self, addr: SlotAddr<'_>, rep: usize) -> Result<NodeId> {
        let resolved = self.resolve_slot(addr)?;
        let parent = addr.parent();
        let count = self.rep_list(parent, resolved.index).len();
        validation::check_existing_index(&resolved.label, count, rep)?;
        let removed = self.rep_list_mut(parent, resolved.index).remove(rep);
        tracing::debug!(slot = %resolved.label, rep, "removed repetition");
        Ok(removed)
    }

    fn resolve_slot(&self, addr: SlotAddr<'_>) -> Result<ResolvedSlot> {
        match addr {
            SlotAddr::Named { parent, name } => match self.payload(parent) {
                Payload::Group(group) => {
                    let (index, slot) = group.schema.slot(name).ok_or_else(|| {
                        Hl7ModelError::schema_violation(format!(
                            "The slot {name} does not exist in group {}",
                            group.schema.name
                        ))
                    })?;
                    Ok(ResolvedSlot {
                        index,
                        repeating: slot.repeating,
                        label: format!("{name} in group {}", group.schema.name),
                        child: ChildSpec::Structure {
                            type_name: slot.type_name.clone(),
                        },
                    })
                }
                other => Err(Hl7ModelError::schema_violation(format!(
                    "{} is a {} node, named slots only exist on groups",
                    other.type_name(),
                    other.kind()
                ))),
            },
            SlotAddr::Field { segment, number } => match self.payload(segment) {
                Payload::Segment(node) => {
                    validation::check_field_number(
                        &node.schema.name,
                        node.schema.fields.len(),
                        number,
                    )?;
                    let field = &node.schema.fields[number - 1];
                    Ok(ResolvedSlot {
                        index: number - 1,
                        repeating: field.repeating,
                        label: format!("field {number} ({}) of {}", field.name, node.schema.name),
                        child: ChildSpec::Value {
                            type_name: field.type_name.clone(),
                            site: ValueSite {
                                table: field.table,
                                max_length: field.max_length,
                            },
                        },
                    })
                }
                other => Err(Hl7ModelError::schema_violation(format!(
                    "{} is a {} node, numbered fields only exist on segments",
                    other.type_name(),
                    other.kind()
                ))),
            },
        }
    }

    fn rep_list(&self, parent: NodeId, index: usize) -> &[NodeId] {
        match self.payload(parent) {
            Payload::Group(group) => &group.slots[index],
            Payload::Segment(segment) => &segment.fields[index],
            _ => unreachable!("resolved slot on a non-container node"),
        }
    }

    fn rep_list_mut(&mut self, parent: NodeId, index: usize) -> &mut Vec<NodeId> {
        match self.payload_mut(parent) {
            Payload::Group(group) => &mut group.slots[index],
            Payload::Segment(segment) => &mut segment.fields[index],
            _ => unreachable!("resolved slot on a non-container node"),
        }
    }

    fn build_child(&mut self, parent: NodeId, child: &ChildSpec) -> Result<NodeId> {
        let registry = Arc::clone(self.registry());
        let mut builder = Builder::new(&registry, &mut self.arena);
        match child {
            ChildSpec::Structure { type_name } => builder.build_structure(type_name, parent),
            ChildSpec::Value { type_name, site } => builder.build_value(type_name, *site, parent),
        }
    }
}
