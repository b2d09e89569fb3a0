//! Textual field addressing in HL7 notation: `PID-3-1`, `PID-3(1)-4-2`,
//! `OBX(2)-5`. Reads are non-creating; writes locate the segment through
//! the message schema and materialize the chain on demand.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Hl7ModelError, Result};
use crate::model::Message;
use crate::model::arena::{NodeId, Payload};
use crate::schema::{GroupSchema, SchemaRegistry, TypeDef};

/// A parsed field address. Segment and field repetitions are 0-based (as
/// in the repetition protocol); field, component and subcomponent numbers
/// are 1-based (as in HL7 notation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub segment: String,
    pub segment_rep: usize,
    pub field: usize,
    pub field_rep: usize,
    pub component: Option<usize>,
    pub subcomponent: Option<usize>,
}

impl FromStr for FieldSpec {
    type Err = Hl7ModelError;

    fn from_str(spec: &str) -> Result<Self> {
        let mut parts = spec.split('-');
        let segment_token = parts
            .next()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Hl7ModelError::path(format!("{spec}: a segment name is required")))?;
        let (segment, segment_rep) = split_rep(spec, segment_token)?;
        if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Hl7ModelError::path(format!(
                "{spec}: {segment} is not a valid segment name"
            )));
        }

        let field_token = parts
            .next()
            .ok_or_else(|| Hl7ModelError::path(format!("{spec}: a field number is required")))?;
        let (field_digits, field_rep) = split_rep(spec, field_token)?;
        let field = parse_position(spec, "field", field_digits)?;

        let component = parts
            .next()
            .map(|token| parse_position(spec, "component", token))
            .transpose()?;
        let subcomponent = parts
            .next()
            .map(|token| parse_position(spec, "subcomponent", token))
            .transpose()?;
        if parts.next().is_some() {
            return Err(Hl7ModelError::path(format!(
                "{spec}: at most segment-field-component-subcomponent levels are addressable"
            )));
        }

        Ok(Self {
            segment: segment.to_string(),
            segment_rep,
            field,
            field_rep,
            component,
            subcomponent,
        })
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment)?;
        if self.segment_rep > 0 {
            write!(f, "({})", self.segment_rep)?;
        }
        write!(f, "-{}", self.field)?;
        if self.field_rep > 0 {
            write!(f, "({})", self.field_rep)?;
        }
        if let Some(component) = self.component {
            write!(f, "-{component}")?;
        }
        if let Some(subcomponent) = self.subcomponent {
            write!(f, "-{subcomponent}")?;
        }
        Ok(())
    }
}

fn split_rep<'a>(spec: &str, token: &'a str) -> Result<(&'a str, usize)> {
    match token.find('(') {
        Some(open) => {
            let Some(inner) = token[open + 1..].strip_suffix(')') else {
                return Err(Hl7ModelError::path(format!(
                    "{spec}: unterminated repetition in {token}"
                )));
            };
            let rep = inner.parse().map_err(|_| {
                Hl7ModelError::path(format!("{spec}: {inner} is not a repetition index"))
            })?;
            Ok((&token[..open], rep))
        }
        None => Ok((token, 0)),
    }
}

fn parse_position(spec: &str, level: &str, token: &str) -> Result<usize> {
    let position: usize = token
        .parse()
        .map_err(|_| Hl7ModelError::path(format!("{spec}: {token} is not a {level} number")))?;
    if position == 0 {
        return Err(Hl7ModelError::path(format!(
            "{spec}: {level} numbers are 1-based"
        )));
    }
    Ok(position)
}

impl Message {
    /// Reads the value a spec addresses. Non-creating: `Ok(None)` when the
    /// segment, field repetition, or trailing component is absent. An
    /// out-of-schema field or component number is still a schema
    /// violation.
    pub fn get_path(&self, spec: &str) -> Result<Option<String>> {
        let spec: FieldSpec = spec.parse()?;
        let Some(segment) = self.find_segment(&spec.segment, spec.segment_rep) else {
            return Ok(None);
        };
        let reps = self.field_all(segment, spec.field)?;
        let Some(&field_node) = reps.get(spec.field_rep) else {
            return Ok(None);
        };
        self.read_at(field_node, spec.component, spec.subcomponent)
    }

    /// Writes the value a spec addresses, materializing the segment chain
    /// and field repetition on demand. Repetition growth follows the
    /// append-only contract of [`Message::get_or_create_rep`].
    pub fn set_path(&mut self, spec: &str, value: &str) -> Result<()> {
        self.write_path(spec, value, false)
    }

    /// As [`Message::set_path`], truncating the value to the target
    /// field's max length.
    pub fn set_path_truncating(&mut self, spec: &str, value: &str) -> Result<()> {
        self.write_path(spec, value, true)
    }

    fn write_path(&mut self, spec: &str, value: &str, truncate: bool) -> Result<()> {
        let spec: FieldSpec = spec.parse()?;
        let segment = match self.find_segment(&spec.segment, spec.segment_rep) {
            Some(node) => node,
            None => self.materialize_segment(&spec)?,
        };
        let field_node = self.field_rep(segment, spec.field, spec.field_rep)?;
        let target = self.write_target(field_node, spec.component, spec.subcomponent)?;
        if truncate {
            self.set_value_truncating(target, value)
        } else {
            self.set_value(target, value)
        }
    }

    fn read_at(
        &self,
        node: NodeId,
        component: Option<usize>,
        subcomponent: Option<usize>,
    ) -> Result<Option<String>> {
        match self.payload(node) {
            // A primitive field has one implicit component; anything past
            // it reads as absent.
            Payload::Primitive(primitive) => {
                if component.unwrap_or(1) > 1 || subcomponent.unwrap_or(1) > 1 {
                    return Ok(None);
                }
                Ok(Some(primitive.value.clone()))
            }
            Payload::Composite(_) => {
                let inner = self.component(node, component.unwrap_or(1) - 1)?;
                match subcomponent {
                    None => self.first_value(inner),
                    Some(sub) => match self.payload(inner) {
                        Payload::Composite(_) => {
                            let leaf = self.component(inner, sub - 1)?;
                            self.first_value(leaf)
                        }
                        Payload::Primitive(primitive) => {
                            if sub > 1 {
                                return Ok(None);
                            }
                            Ok(Some(primitive.value.clone()))
                        }
                        other => Err(Hl7ModelError::schema_violation(format!(
                            "Can't address a subcomponent inside {} ({} node)",
                            other.type_name(),
                            other.kind()
                        ))),
                    },
                }
            }
            other => Err(Hl7ModelError::schema_violation(format!(
                "Field specs address datatypes, not {} nodes",
                other.kind()
            ))),
        }
    }

    fn write_target(
        &self,
        node: NodeId,
        component: Option<usize>,
        subcomponent: Option<usize>,
    ) -> Result<NodeId> {
        match self.payload(node) {
            Payload::Primitive(primitive) => {
                if component.unwrap_or(1) > 1 || subcomponent.unwrap_or(1) > 1 {
                    return Err(Hl7ModelError::schema_violation(format!(
                        "{} is a primitive, it has only one component",
                        primitive.schema.name
                    )));
                }
                Ok(node)
            }
            Payload::Composite(_) => {
                let inner = self.component(node, component.unwrap_or(1) - 1)?;
                let leaf = match subcomponent {
                    None => inner,
                    Some(sub) => match self.payload(inner) {
                        Payload::Composite(_) => self.component(inner, sub - 1)?,
                        Payload::Primitive(primitive) => {
                            if sub > 1 {
                                return Err(Hl7ModelError::schema_violation(format!(
                                    "{} is a primitive, it has only one subcomponent",
                                    primitive.schema.name
                                )));
                            }
                            inner
                        }
                        other => {
                            return Err(Hl7ModelError::schema_violation(format!(
                                "Can't address a subcomponent inside {} ({} node)",
                                other.type_name(),
                                other.kind()
                            )));
                        }
                    },
                };
                self.first_primitive(leaf)
            }
            other => Err(Hl7ModelError::schema_violation(format!(
                "Field specs address datatypes, not {} nodes",
                other.kind()
            ))),
        }
    }

    /// Leading primitive of a datatype node: the node itself, or the first
    /// component followed all the way down.
    fn first_primitive(&self, node: NodeId) -> Result<NodeId> {
        let mut current = node;
        loop {
            match self.payload(current) {
                Payload::Primitive(_) => return Ok(current),
                Payload::Composite(_) => current = self.component(current, 0)?,
                other => {
                    return Err(Hl7ModelError::schema_violation(format!(
                        "{} ({} node) has no primitive value",
                        other.type_name(),
                        other.kind()
                    )));
                }
            }
        }
    }

    fn first_value(&self, node: NodeId) -> Result<Option<String>> {
        let leaf = self.first_primitive(node)?;
        Ok(Some(self.value(leaf)?.to_string()))
    }

    fn materialize_segment(&mut self, spec: &FieldSpec) -> Result<NodeId> {
        let registry = Arc::clone(self.registry());
        let root_group = match registry.resolve(&self.schema().root) {
            Some(TypeDef::Group(group)) => group.clone(),
            _ => {
                return Err(Hl7ModelError::construction(format!(
                    "Message {} root {} is not a defined group",
                    self.message_type(),
                    self.schema().root
                )));
            }
        };
        let mut visited = HashSet::new();
        let Some(path) = locate_slot_path(&registry, &root_group, &spec.segment, &mut visited)
        else {
            return Err(Hl7ModelError::schema_violation(format!(
                "Segment {} is not reachable in message {}",
                spec.segment,
                self.message_type()
            )));
        };

        let mut node = self.root();
        for name in &path[..path.len() - 1] {
            node = self.get_or_create(node, name)?;
        }
        let segment = self.get_or_create_rep(node, &path[path.len() - 1], spec.segment_rep)?;
        tracing::debug!(segment = %spec.segment, path = path.join("/"), "materialized segment for path write");
        Ok(segment)
    }
}

/// Depth-first search for the first slot chain leading to a segment type,
/// the way a segment finder locates an unqualified segment name.
fn locate_slot_path(
    registry: &SchemaRegistry,
    group: &GroupSchema,
    segment: &str,
    visited: &mut HashSet<String>,
) -> Option<Vec<String>> {
    if !visited.insert(group.name.clone()) {
        return None;
    }
    for slot in &group.slots {
        match registry.resolve(&slot.type_name) {
            Some(TypeDef::Segment(schema)) if schema.name == segment => {
                return Some(vec![slot.name.clone()]);
            }
            Some(TypeDef::Group(schema)) => {
                if let Some(mut rest) = locate_slot_path(registry, schema, segment, visited) {
                    let mut path = vec![slot.name.clone()];
                    path.append(&mut rest);
                    return Some(path);
                }
            }
            _ => {}
        }
    }
    None
}
