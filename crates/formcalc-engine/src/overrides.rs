//! Override manager: pure record transformations driven by the
//! presentation layer.
//!
//! `allow_override` is enforced here, centrally, so every caller gets the
//! same rejection instead of relying on form-level guards.

use serde_json::Value;
use thiserror::Error;

use crate::record::{OverrideState, Record};
use crate::schema::Schema;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OverrideError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' does not allow manual override")]
    NotOverridable(String),
}

/// Toggle a field's override.
///
/// Enabling seeds the stored override value from the field's current
/// effective value when none was stored yet, so the user starts editing
/// from what they see. Disabling keeps the stored value around (for
/// re-enabling); the effective value reverts to computed/raw on the next
/// resolve pass.
pub fn set_override_enabled(
    schema: &Schema,
    record: &Record,
    name: &str,
    enabled: bool,
) -> Result<Record, OverrideError> {
    let spec = guard(schema, name)?;

    let mut out = record.clone();
    let state = match out.override_for(name) {
        Some(mut state) => {
            state.enabled = enabled;
            state
        }
        None => OverrideState {
            enabled,
            value: out.effective_value(spec).unwrap_or(Value::Null),
        },
    };
    out.set_override(name, state);
    Ok(out)
}

/// Force a field to `value`: stores an enabled override and mirrors the
/// value into the field immediately, so the UI shows it without waiting
/// for a resolve pass.
pub fn set_override_value(
    schema: &Schema,
    record: &Record,
    name: &str,
    value: Value,
) -> Result<Record, OverrideError> {
    guard(schema, name)?;

    let mut out = record.clone();
    out.set_override(
        name,
        OverrideState {
            enabled: true,
            value: value.clone(),
        },
    );
    out.set(name, value);
    Ok(out)
}

fn guard<'a>(schema: &'a Schema, name: &str) -> Result<&'a crate::schema::FieldSpec, OverrideError> {
    let spec = schema
        .field(name)
        .ok_or_else(|| OverrideError::UnknownField(name.to_string()))?;
    if !spec.allow_override {
        return Err(OverrideError::NotOverridable(name.to_string()));
    }
    Ok(spec)
}
