//! Compute resolver: one full pass over a schema/record pair.

use serde_json::Value;

use formcalc_common::{finite_or_zero, number_value};

use crate::interpreter::{Scope, evaluate};
use crate::record::{Record, map_path};
use crate::schema::{ComputeSpec, Condition, PersistMode, Schema, ValueSource};
use crate::traits::{AggregateRequest, AggregationPort, ResolvedCondition};

/// Caller-supplied ambient values for `valueFrom: "context"` conditions.
pub type Context = serde_json::Map<String, Value>;

/// A computed field whose value the caller must write back to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub field: String,
    pub persist: PersistMode,
}

/// Result of one resolve pass.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// The updated record snapshot. The input record is never mutated.
    pub record: Record,
    /// Aggregate fields whose port call failed this pass; their previous
    /// values were kept. Transient: not written into the record.
    pub stale_aggregates: Vec<String>,
    /// Freshly computed fields with `persist: onSave | always`.
    pub pending_writes: Vec<PendingWrite>,
}

/// Run one resolve pass: for every field in schema-declaration order, copy
/// the override value, evaluate the formula, or await the aggregate.
///
/// Fields are processed in a single forward pass, so a formula whose deps
/// include an earlier field of the same schema observes that field's
/// freshly computed value, while a dep on a *later* computed field reads
/// its pre-pass value. There is no cycle detection; circular dep chains
/// settle on stale values instead of erroring.
pub async fn resolve(
    schema: &Schema,
    record: &Record,
    port: &dyn AggregationPort,
    context: &Context,
) -> ResolveOutcome {
    let mut out = record.clone();
    let mut stale_aggregates = Vec::new();
    let mut pending_writes = Vec::new();

    for spec in &schema.fields {
        if spec.allow_override {
            if let Some(state) = out.override_for(&spec.name) {
                if state.enabled {
                    out.set(&spec.name, state.value);
                    continue;
                }
            }
        }

        match &spec.compute {
            ComputeSpec::None => {}
            ComputeSpec::Formula {
                expr,
                deps,
                persist,
            } => {
                let mut scope = Scope::default();
                for dep in deps {
                    scope.insert(
                        dep.clone(),
                        out.get(dep).cloned().unwrap_or(Value::Null),
                    );
                }
                let result = evaluate(expr, &scope);
                tracing::debug!(field = %spec.name, result, "formula recomputed");
                out.set(&spec.name, number_value(result));
                push_pending(&mut pending_writes, &spec.name, *persist);
            }
            ComputeSpec::Aggregate {
                source_table,
                field,
                op,
                conditions,
                persist,
            } => {
                let request = AggregateRequest {
                    source_table: source_table.clone(),
                    field: field.clone(),
                    op: *op,
                    conditions: conditions
                        .iter()
                        .map(|c| resolve_condition(c, &out, context))
                        .collect(),
                };
                match port.aggregate(&request).await {
                    Ok(n) => {
                        tracing::debug!(field = %spec.name, value = n, "aggregate resolved");
                        out.set(&spec.name, number_value(finite_or_zero(n)));
                        push_pending(&mut pending_writes, &spec.name, *persist);
                    }
                    Err(err) => {
                        tracing::warn!(
                            field = %spec.name,
                            table = %source_table,
                            %err,
                            "aggregate failed; keeping previous value"
                        );
                        stale_aggregates.push(spec.name.clone());
                    }
                }
            }
        }
    }

    ResolveOutcome {
        record: out,
        stale_aggregates,
        pending_writes,
    }
}

fn push_pending(writes: &mut Vec<PendingWrite>, field: &str, persist: PersistMode) {
    if persist != PersistMode::None {
        writes.push(PendingWrite {
            field: field.to_string(),
            persist,
        });
    }
}

/// Resolve a condition's comparison value: from the in-progress record for
/// `this`, from the caller context for `context`, otherwise the literal.
/// An unresolvable path yields JSON null (matches "no value" semantics in
/// the backing store's filter language).
fn resolve_condition(cond: &Condition, record: &Record, context: &Context) -> ResolvedCondition {
    let value = match cond.value_from {
        Some(ValueSource::This) => cond
            .path
            .as_deref()
            .and_then(|p| record.value_at_path(p))
            .cloned()
            .unwrap_or(Value::Null),
        Some(ValueSource::Context) => cond
            .path
            .as_deref()
            .and_then(|p| map_path(context, p))
            .cloned()
            .unwrap_or(Value::Null),
        None => cond.value.clone().unwrap_or(Value::Null),
    };
    ResolvedCondition {
        field: cond.field.clone(),
        op: cond.op,
        value,
    }
}
