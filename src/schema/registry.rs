use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Hl7ModelError, Result};

use super::{CompositeSchema, GroupSchema, MessageSchema, PrimitiveSchema, SegmentSchema};

/// A named type definition: the dispatch tag the generic construction
/// engine is keyed on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDef {
    Primitive(Arc<PrimitiveSchema>),
    Composite(Arc<CompositeSchema>),
    Segment(Arc<SegmentSchema>),
    Group(Arc<GroupSchema>),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Primitive(schema) => &schema.name,
            TypeDef::Composite(schema) => &schema.name,
            TypeDef::Segment(schema) => &schema.name,
            TypeDef::Group(schema) => &schema.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDef::Primitive(_) => "primitive",
            TypeDef::Composite(_) => "composite",
            TypeDef::Segment(_) => "segment",
            TypeDef::Group(_) => "group",
        }
    }
}

/// A catalog of type definitions and message structures for one HL7
/// version. Schemas are configuration data: a registry round-trips through
/// JSON, so per-message-type catalogs ship as files rather than generated
/// code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaRegistry {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    types: HashMap<String, TypeDef>,

    #[serde(default)]
    messages: HashMap<String, Arc<MessageSchema>>,
}

impl SchemaRegistry {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            types: HashMap::new(),
            messages: HashMap::new(),
        }
    }

    pub fn register_primitive(&mut self, schema: PrimitiveSchema) -> &mut Self {
        self.types
            .insert(schema.name.clone(), TypeDef::Primitive(Arc::new(schema)));
        self
    }

    pub fn register_composite(&mut self, schema: CompositeSchema) -> &mut Self {
        self.types
            .insert(schema.name.clone(), TypeDef::Composite(Arc::new(schema)));
        self
    }

    pub fn register_segment(&mut self, schema: SegmentSchema) -> &mut Self {
        self.types
            .insert(schema.name.clone(), TypeDef::Segment(Arc::new(schema)));
        self
    }

    pub fn register_group(&mut self, schema: GroupSchema) -> &mut Self {
        self.types
            .insert(schema.name.clone(), TypeDef::Group(Arc::new(schema)));
        self
    }

    pub fn register_message(&mut self, schema: MessageSchema) -> &mut Self {
        self.messages
            .insert(schema.name.clone(), Arc::new(schema));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn message(&self, name: &str) -> Option<Arc<MessageSchema>> {
        self.messages.get(name).cloned()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(json)?;
        tracing::debug!(
            version = %registry.version,
            types = registry.types.len(),
            messages = registry.messages.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pre-flight structural check: every referenced type name resolves to
    /// a definition of the right kind, slot names within a group are
    /// unique, and group/composite nesting is acyclic. Running this once
    /// per catalog means construction can only fail on catalogs that were
    /// never validated.
    pub fn validate(&self) -> Result<()> {
        for def in self.types.values() {
            match def {
                TypeDef::Primitive(_) => {}
                TypeDef::Composite(schema) => {
                    for component in &schema.components {
                        self.expect_value_type(&schema.name, &component.type_name)?;
                    }
                }
                TypeDef::Segment(schema) => {
                    for field in &schema.fields {
                        self.expect_value_type(&schema.name, &field.type_name)?;
                    }
                }
                TypeDef::Group(schema) => {
                    let mut seen = HashSet::new();
                    for slot in &schema.slots {
                        if !seen.insert(slot.name.as_str()) {
                            return Err(Hl7ModelError::construction(format!(
                                "Group {} declares slot {} more than once",
                                schema.name, slot.name
                            )));
                        }
                        self.expect_structure_type(&schema.name, &slot.type_name)?;
                    }
                }
            }
        }

        for message in self.messages.values() {
            match self.resolve(&message.root) {
                Some(TypeDef::Group(_)) => {}
                Some(other) => {
                    return Err(Hl7ModelError::construction(format!(
                        "Message {} root {} is a {}, expected a group",
                        message.name,
                        message.root,
                        other.kind_name()
                    )));
                }
                None => {
                    return Err(Hl7ModelError::construction(format!(
                        "Message {} root {} is not defined",
                        message.name, message.root
                    )));
                }
            }
        }

        self.check_acyclic()
    }

    fn expect_value_type(&self, owner: &str, type_name: &str) -> Result<()> {
        match self.resolve(type_name) {
            Some(TypeDef::Primitive(_)) | Some(TypeDef::Composite(_)) => Ok(()),
            Some(other) => Err(Hl7ModelError::construction(format!(
                "{owner} references {type_name} which is a {}, expected a datatype",
                other.kind_name()
            ))),
            None => Err(Hl7ModelError::construction(format!(
                "{owner} references undefined type {type_name}"
            ))),
        }
    }

    fn expect_structure_type(&self, owner: &str, type_name: &str) -> Result<()> {
        match self.resolve(type_name) {
            Some(TypeDef::Group(_)) | Some(TypeDef::Segment(_)) => Ok(()),
            Some(other) => Err(Hl7ModelError::construction(format!(
                "{owner} references {type_name} which is a {}, expected a group or segment",
                other.kind_name()
            ))),
            None => Err(Hl7ModelError::construction(format!(
                "{owner} references undefined type {type_name}"
            ))),
        }
    }

    // The tree is strictly hierarchical: a group or composite reaching
    // itself through its children would make default construction diverge.
    fn check_acyclic(&self) -> Result<()> {
        let mut done: HashSet<&str> = HashSet::new();
        for name in self.types.keys() {
            let mut visiting = HashSet::new();
            self.visit_nesting(name, &mut visiting, &mut done)?;
        }
        Ok(())
    }

    fn visit_nesting<'a>(
        &'a self,
        name: &'a str,
        visiting: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(Hl7ModelError::construction(format!(
                "Type {name} is part of a nesting cycle"
            )));
        }
        match self.resolve(name) {
            Some(TypeDef::Composite(schema)) => {
                for component in &schema.components {
                    self.visit_nesting(&component.type_name, visiting, done)?;
                }
            }
            Some(TypeDef::Group(schema)) => {
                for slot in &schema.slots {
                    self.visit_nesting(&slot.type_name, visiting, done)?;
                }
            }
            Some(TypeDef::Segment(schema)) => {
                for field in &schema.fields {
                    self.visit_nesting(&field.type_name, visiting, done)?;
                }
            }
            Some(TypeDef::Primitive(_)) | None => {}
        }
        visiting.remove(name);
        done.insert(name);
        Ok(())
    }
}
