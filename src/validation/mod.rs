//! Mutation-time bounds enforcement. Two independent checks, never
//! conflated: repetition bounds range over *dynamic* content lists, schema
//! bounds over the *static* definition of a node type. A schema-valid slot
//! with zero repetitions is not an error; an out-of-schema index always is.

use crate::error::{Hl7ModelError, Result};

/// Access/append rule for `get_or_create` and `insert_at`: an index may
/// land inside the existing range or extend it by exactly one.
pub(crate) fn check_append_index(label: &str, count: usize, rep: usize) -> Result<()> {
    if rep > count {
        return Err(Hl7ModelError::repetition_bounds(format!(
            "Can't reach repetition {rep} of {label} - there are currently {count} repetitions and they grow by exactly one"
        )));
    }
    Ok(())
}

/// Removal rule for `remove_at`: the index must address an existing
/// repetition.
pub(crate) fn check_existing_index(label: &str, count: usize, rep: usize) -> Result<()> {
    if rep >= count {
        return Err(Hl7ModelError::repetition_bounds(format!(
            "Can't remove repetition {rep} of {label} - there are only {count} repetitions"
        )));
    }
    Ok(())
}

/// A non-repeating slot never holds more than one child; asking for a
/// second repetition violates the static schema, not dynamic content
/// bounds.
pub(crate) fn check_repeatable(label: &str, repeating: bool, rep: usize) -> Result<()> {
    if rep >= 1 && !repeating {
        return Err(Hl7ModelError::schema_violation(format!(
            "Can't reach repetition {rep} of {label} - the slot does not repeat"
        )));
    }
    Ok(())
}

/// Field numbers are 1-based and fixed by the segment schema.
pub(crate) fn check_field_number(segment: &str, declared: usize, number: usize) -> Result<()> {
    if number == 0 || number > declared {
        return Err(Hl7ModelError::schema_violation(format!(
            "Field {number} doesn't exist (segment {segment} declares {declared} fields)"
        )));
    }
    Ok(())
}

/// Component indices are 0-based and fixed by the composite schema.
pub(crate) fn check_component_index(type_name: &str, declared: usize, index: usize) -> Result<()> {
    if index >= declared {
        return Err(Hl7ModelError::schema_violation(format!(
            "Component {index} doesn't exist (type {type_name} has only {declared} components)"
        )));
    }
    Ok(())
}
