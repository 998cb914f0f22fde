//! Module schema data model.
//!
//! These types mirror the external JSON contract one-to-one (camelCase
//! keys, internally tagged compute union). The engine treats a schema as
//! immutable for the duration of a form session; structural validation
//! (unique names, known types) happens upstream, but deserialization is
//! lenient enough that an unknown field type never crashes a resolve pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered field list plus storage and UI metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub db: DbMeta,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<Value>,
}

impl Schema {
    /// Look up a field spec by name. Names are unique within a schema
    /// (pre-validated upstream); the first match wins regardless.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Storage metadata for the module's backing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbMeta {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub soft_delete: bool,
}

/// Static descriptor for one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub allow_override: bool,
    #[serde(default)]
    pub compute: ComputeSpec,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub read_only: bool,
}

fn default_true() -> bool {
    true
}

/// Enumerated field kind. `Other` absorbs kinds this engine does not know
/// about so that schema evolution never breaks deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Select,
    Multiselect,
    #[serde(rename = "selectorTabla")]
    TableSelector,
    Formula,
    Other,
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => Self::Text,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "select" => Self::Select,
            "multiselect" => Self::Multiselect,
            "selectorTabla" => Self::TableSelector,
            "formula" => Self::Formula,
            _ => Self::Other,
        }
    }
}

// Hand-written so unknown kinds fold into `Other` instead of failing the
// whole schema (serde's `other` attribute is unavailable for plain string
// enums).
impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&s))
    }
}

/// Declarative definition of how a field's value is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComputeSpec {
    /// No computed value.
    #[default]
    None,
    /// Bounded arithmetic over named dependencies.
    Formula {
        expr: String,
        #[serde(default)]
        deps: Vec<String>,
        #[serde(default)]
        persist: PersistMode,
    },
    /// Scalar aggregate over a related data set, computed by the port.
    #[serde(rename_all = "camelCase")]
    Aggregate {
        source_table: String,
        field: String,
        op: AggregateOp,
        #[serde(default, rename = "where")]
        conditions: Vec<Condition>,
        #[serde(default)]
        persist: PersistMode,
    },
}

/// Whether a computed value is written back to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistMode {
    /// Never persisted; recomputed on every read.
    #[default]
    None,
    /// Written back when the record is saved.
    OnSave,
    /// Written back on every resolve pass.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

/// One filter clause of an aggregate's `where` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field: String,
    pub op: ConditionOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<ValueSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

/// Where a condition's comparison value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// The current record, at `path`.
    This,
    /// The caller-supplied context mapping, at `path`.
    Context,
}
