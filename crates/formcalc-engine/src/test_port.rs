//! Lightweight in-memory aggregation port for tests and examples.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{AggregateError, AggregateRequest, AggregationPort};

/// Programmable port: fixed results keyed by `(sourceTable, field)`,
/// injectable failures per table, and a log of every request received.
#[derive(Default)]
pub struct TestPort {
    results: HashMap<(String, String), f64>,
    failing_tables: HashSet<String>,
    calls: Mutex<Vec<AggregateRequest>>,
}

impl TestPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result<T, F>(mut self, table: T, field: F, value: f64) -> Self
    where
        T: Into<String>,
        F: Into<String>,
    {
        self.results.insert((table.into(), field.into()), value);
        self
    }

    pub fn with_failure<T: Into<String>>(mut self, table: T) -> Self {
        self.failing_tables.insert(table.into());
        self
    }

    /// Every request the port has received, in order.
    pub fn calls(&self) -> Vec<AggregateRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AggregationPort for TestPort {
    async fn aggregate(&self, request: &AggregateRequest) -> Result<f64, AggregateError> {
        self.calls.lock().unwrap().push(request.clone());

        if self.failing_tables.contains(&request.source_table) {
            return Err(AggregateError::Backend(format!(
                "injected failure for '{}'",
                request.source_table
            )));
        }
        self.results
            .get(&(request.source_table.clone(), request.field.clone()))
            .copied()
            .ok_or_else(|| AggregateError::UnknownSource(request.source_table.clone()))
    }
}
