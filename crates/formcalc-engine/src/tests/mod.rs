//! Engine-level tests: resolver passes, override handling, scheduling.

mod scheduler;

use serde_json::{Value, json};

use crate::record::Record;
use crate::schema::Schema;

/// A works-administration style schema: plain fields, two chained
/// formulas and one aggregate counting related rows.
pub(crate) fn obra_schema() -> Schema {
    serde_json::from_value(json!({
        "db": { "table": "obras", "primaryKey": "id" },
        "fields": [
            { "name": "id", "type": "text" },
            { "name": "nombre", "type": "text", "required": true },
            { "name": "precio", "type": "number" },
            { "name": "cantidad", "type": "number" },
            {
                "name": "subtotal",
                "type": "number",
                "compute": {
                    "type": "formula",
                    "expr": "precio * cantidad",
                    "deps": ["precio", "cantidad"],
                    "persist": "onSave"
                }
            },
            {
                "name": "total",
                "type": "number",
                "allowOverride": true,
                "compute": {
                    "type": "formula",
                    "expr": "subtotal * 1.21",
                    "deps": ["subtotal"]
                }
            },
            {
                "name": "pedidos",
                "type": "number",
                "compute": {
                    "type": "aggregate",
                    "sourceTable": "pedidos",
                    "field": "id",
                    "op": "count",
                    "where": [
                        { "field": "obraId", "op": "=", "valueFrom": "this", "path": "id" }
                    ],
                    "persist": "always"
                }
            }
        ]
    }))
    .expect("fixture schema deserializes")
}

pub(crate) fn record(value: Value) -> Record {
    serde_json::from_value(value).expect("fixture record deserializes")
}
