use thiserror::Error;

#[derive(Error, Debug)]
pub enum Hl7ModelError {
    #[error("Schema violation: {message}")]
    SchemaViolation { message: String },

    #[error("Repetition out of bounds: {message}")]
    RepetitionBounds { message: String },

    #[error("Construction error: {message}")]
    Construction { message: String },

    #[error("Path error: {message}")]
    Path { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Hl7ModelError {
    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }

    pub fn repetition_bounds(message: impl Into<String>) -> Self {
        Self::RepetitionBounds {
            message: message.into(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    pub fn path(message: impl Into<String>) -> Self {
        Self::Path {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Hl7ModelError>;
