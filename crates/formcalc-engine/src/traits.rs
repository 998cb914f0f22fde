//! The aggregation port: the engine's single I/O boundary.
//!
//! Computing `sum/avg/min/max/count` over a related data set is the
//! backing store's job; the engine only defines the request shape and the
//! contract. The resolver resolves every `valueFrom` indirection before
//! calling the port, so a request is self-contained: implementations see
//! literal comparison values only and never touch the record or context.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{AggregateOp, ConditionOp};

/// A backing-store failure. Distinct from "zero matching rows", which must
/// come back as a finite number per the port contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AggregateError {
    #[error("aggregation backend failure: {0}")]
    Backend(String),
    #[error("unknown aggregation source '{0}'")]
    UnknownSource(String),
}

/// A `where` clause with its comparison value fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCondition {
    pub field: String,
    pub op: ConditionOp,
    pub value: Value,
}

/// One scalar-aggregate request.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    pub source_table: String,
    pub field: String,
    pub op: AggregateOp,
    pub conditions: Vec<ResolvedCondition>,
}

/// External capability computing a scalar summary over related records.
///
/// Contract: `count` is ≥ 0; `sum`/`avg`/`min`/`max` over zero matching
/// rows must be a finite number (implementation's choice), not an error —
/// errors are reserved for backend failures. The port must be safe for
/// concurrent calls across records; the resolver never issues two
/// concurrent calls for the same record within one pass.
#[async_trait]
pub trait AggregationPort: Send + Sync {
    async fn aggregate(&self, request: &AggregateRequest) -> Result<f64, AggregateError>;
}
