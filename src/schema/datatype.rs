use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive HL7 datatype (ST, ID, NM, SI, DT, ...): a scalar textual
/// value. Max length and coded-table identity are bound at the use site
/// (field or component), not on the type itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimitiveSchema {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl PrimitiveSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One component slot of a composite datatype.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    /// HL7 coded-table id bound to this component (e.g. table 0203 for
    /// identifier type codes). Used by validation layers outside this crate.
    #[serde(default)]
    pub table: Option<u16>,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            table: None,
        }
    }

    pub fn with_table(mut self, table: u16) -> Self {
        self.table = Some(table);
        self
    }
}

/// A composite HL7 datatype (CX, XPN, CWE, ...): an ordered list of
/// components addressed by 0-based index. Component indices are fixed by
/// the schema and never renumbered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompositeSchema {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub components: Vec<ComponentDescriptor>,
}

impl CompositeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            components: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_component(mut self, component: ComponentDescriptor) -> Self {
        self.components.push(component);
        self
    }
}

impl fmt::Display for CompositeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} components)", self.name, self.components.len())
    }
}
