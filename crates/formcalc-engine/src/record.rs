//! Record representation: a JSON object of field values plus the reserved
//! `meta.overrides` mapping.
//!
//! Engine operations never mutate a caller's record in place; they clone,
//! transform and return (copy-on-write), so callers can diff old vs. new
//! snapshots across a resolve pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{FieldSpec, Schema};

pub(crate) type JsonMap = serde_json::Map<String, Value>;

/// Reserved record key holding engine-facing metadata.
pub const META_KEY: &str = "meta";
/// Key under `meta` holding the per-field override states.
pub const OVERRIDES_KEY: &str = "overrides";

/// A manually forced value for one field of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideState {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub value: Value,
}

/// One record of a module: field name → JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: JsonMap,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: JsonMap) -> Self {
        Self { values }
    }

    /// Build a fresh record from the schema's field defaults.
    pub fn from_defaults(schema: &Schema) -> Self {
        let mut values = JsonMap::new();
        for field in &schema.fields {
            if let Some(default) = &field.default_value {
                values.insert(field.name.clone(), default.clone());
            }
        }
        Self { values }
    }

    pub fn as_map(&self) -> &JsonMap {
        &self.values
    }

    pub fn into_map(self) -> JsonMap {
        self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set<S: Into<String>>(&mut self, name: S, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Resolve a dot-separated path (`"cliente.id"`) through nested
    /// objects. A single-segment path is a plain field lookup.
    pub fn value_at_path(&self, path: &str) -> Option<&Value> {
        map_path(&self.values, path)
    }

    /// The stored override state for a field, if any.
    pub fn override_for(&self, name: &str) -> Option<OverrideState> {
        let state = self
            .values
            .get(META_KEY)?
            .get(OVERRIDES_KEY)?
            .get(name)?
            .clone();
        serde_json::from_value(state).ok()
    }

    /// Store an override state under `meta.overrides`, creating the
    /// intermediate objects as needed.
    pub(crate) fn set_override(&mut self, name: &str, state: OverrideState) {
        let meta = self
            .values
            .entry(META_KEY.to_string())
            .or_insert_with(|| Value::Object(JsonMap::new()));
        if !meta.is_object() {
            *meta = Value::Object(JsonMap::new());
        }
        let meta = meta.as_object_mut().expect("meta is an object");

        let overrides = meta
            .entry(OVERRIDES_KEY.to_string())
            .or_insert_with(|| Value::Object(JsonMap::new()));
        if !overrides.is_object() {
            *overrides = Value::Object(JsonMap::new());
        }
        let overrides = overrides.as_object_mut().expect("overrides is an object");

        overrides.insert(
            name.to_string(),
            serde_json::to_value(state).expect("override state serializes"),
        );
    }

    /// The value a reader should see for `spec`: the override value iff the
    /// field allows overriding and its override is enabled, otherwise the
    /// raw (possibly computed) value.
    pub fn effective_value(&self, spec: &FieldSpec) -> Option<Value> {
        if spec.allow_override {
            if let Some(state) = self.override_for(&spec.name) {
                if state.enabled {
                    return Some(state.value);
                }
            }
        }
        self.get(&spec.name).cloned()
    }
}

pub(crate) fn map_path<'a>(map: &'a JsonMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current)
}
