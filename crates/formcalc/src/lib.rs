//! Meta crate that re-exports the formcalc building blocks. Downstream
//! users can depend on this crate alone while keeping access to the
//! underlying layers when deeper integration is required.

pub use formcalc_common as common;
pub use formcalc_engine as engine;
pub use formcalc_parse as parse;

pub use formcalc_engine::{
    AggregateError, AggregateOp, AggregateRequest, AggregationPort, ComputeSpec, Condition,
    ConditionOp, Context, DEFAULT_QUIET_INTERVAL, DbMeta, FieldSpec, FieldType, OverrideError,
    OverrideState, PendingWrite, PersistMode, Record, RecomputeScheduler, ResolveOutcome,
    ResolvedCondition, Schema, ValueSource, evaluate, resolve, set_override_enabled,
    set_override_value,
};
