use serde::{Deserialize, Serialize};
use std::fmt;

/// One child slot of a group: a named position holding either a segment or
/// a nested group, with its cardinality. Children of a slot are stored as
/// an ordered repetition list; a non-repeating slot holds at most one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Slot name within the enclosing group (e.g. "PATIENT", "NTE"). For
    /// segment slots this usually matches the segment name.
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub repeating: bool,
}

impl SlotDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            repeating: false,
        }
    }

    /// Slot whose name is the type name itself, the common case for
    /// segment children.
    pub fn of(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(type_name.clone(), type_name)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }
}

impl fmt::Display for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = match (self.required, self.repeating) {
            (true, true) => "[1..*]",
            (true, false) => "[1..1]",
            (false, true) => "[0..*]",
            (false, false) => "[0..1]",
        };
        write!(f, "{}: {} {card}", self.name, self.type_name)
    }
}

/// A group schema: a named, ordered collection of slots that travel
/// together in a message. Groups nest to arbitrary schema-bounded depth;
/// an HL7 message structure is itself the root group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSchema {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub slots: Vec<SlotDescriptor>,
}

impl GroupSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            slots: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_slot(mut self, slot: SlotDescriptor) -> Self {
        self.slots.push(slot);
        self
    }

    /// Position and descriptor of a named slot.
    pub fn slot(&self, name: &str) -> Option<(usize, &SlotDescriptor)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.name == name)
    }
}

impl fmt::Display for GroupSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} slots)", self.name, self.slots.len())?;
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}
