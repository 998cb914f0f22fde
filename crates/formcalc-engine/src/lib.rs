//! Schema-driven compute engine.
//!
//! Given a module [`Schema`] (field definitions, some carrying a
//! [`ComputeSpec`]) and a [`Record`], the engine produces the current value
//! for every computed field: formulas are evaluated against dependency
//! values from the record, aggregates are delegated to an injected
//! [`AggregationPort`], and per-record manual overrides take precedence
//! over both. A debounced [`RecomputeScheduler`] coalesces bursts of edits
//! into single resolve passes.
//!
//! The engine owns no persistent state: apart from the aggregation port
//! call, a resolve pass is a pure `(schema, record, context) -> record'`
//! transformation on a fresh copy of the record.

pub mod interpreter;
pub mod overrides;
pub mod record;
pub mod resolver;
pub mod scheduler;
pub mod schema;
pub mod traits;

pub mod test_port;

pub use interpreter::{Scope, evaluate, evaluate_checked};
pub use overrides::{OverrideError, set_override_enabled, set_override_value};
pub use record::{OverrideState, Record};
pub use resolver::{Context, PendingWrite, ResolveOutcome, resolve};
pub use scheduler::{DEFAULT_QUIET_INTERVAL, RecomputeScheduler};
pub use schema::{
    AggregateOp, ComputeSpec, Condition, ConditionOp, DbMeta, FieldSpec, FieldType, PersistMode,
    Schema, ValueSource,
};
pub use traits::{AggregateError, AggregateRequest, AggregationPort, ResolvedCondition};

#[cfg(test)]
mod tests;
