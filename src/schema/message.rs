use serde::{Deserialize, Serialize};
use std::fmt;

/// A message schema: the entry point for one message structure (e.g.
/// ORU_R01). An HL7 message is itself a group, so the schema names a
/// registered group type as its root rather than repeating the slot list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageSchema {
    /// Message structure name, e.g. "ORU_R01".
    pub name: String,

    /// HL7 version this structure belongs to, e.g. "2.5.1".
    pub version: String,

    /// Name of the root group type in the registry.
    pub root: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl MessageSchema {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root: root.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for MessageSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.name, self.version)
    }
}
