use serde::{Deserialize, Serialize};
use std::fmt;

/// One field slot of a segment, addressed by 1-based position within the
/// segment. Mirrors the per-field row of an HL7 v2 segment table: datatype,
/// usage, repeatability, max length and coded table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub repeating: bool,

    /// Maximum value length in characters; 0 means unbounded.
    #[serde(default)]
    pub max_length: usize,

    #[serde(default)]
    pub table: Option<u16>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            repeating: false,
            max_length: 0,
            table: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_table(mut self, table: u16) -> Self {
        self.table = Some(table);
        self
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = match (self.required, self.repeating) {
            (true, true) => "[1..*]",
            (true, false) => "[1..1]",
            (false, true) => "[0..*]",
            (false, false) => "[0..1]",
        };
        write!(f, "{} ({}) {card}", self.name, self.type_name)
    }
}

/// A segment schema: a named, flat record of ordered fields (e.g. PID,
/// OBX). Field numbers are 1-based as in HL7 notation; a number outside
/// `1..=fields.len()` is a static schema violation regardless of content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentSchema {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub fields: Vec<FieldDescriptor>,
}

impl SegmentSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Descriptor for a 1-based field number, if the schema declares it.
    pub fn field(&self, number: usize) -> Option<&FieldDescriptor> {
        if number == 0 {
            return None;
        }
        self.fields.get(number - 1)
    }
}

impl fmt::Display for SegmentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} fields)", self.name, self.fields.len())?;
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}
