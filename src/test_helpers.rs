//! Recording executor for unit tests.

use crate::error::Result;
use crate::executor::{QueryExecutor, Record};
use sea_query::{Value, Values};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CapturedQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

/// Captures every statement and replays queued result sets in order.
///
/// Once the queue is empty, queries return no rows.
#[derive(Default)]
pub struct RecordingExecutor {
    captured: Mutex<Vec<CapturedQuery>>,
    responses: Mutex<VecDeque<Vec<Record>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_records(&self, records: Vec<Record>) {
        self.responses.lock().unwrap().push_back(records);
    }

    pub fn captured(&self) -> Vec<CapturedQuery> {
        self.captured.lock().unwrap().clone()
    }
}

impl QueryExecutor for RecordingExecutor {
    fn query_records(&self, sql: &str, values: &Values) -> Result<Vec<Record>> {
        self.captured.lock().unwrap().push(CapturedQuery {
            sql: sql.to_string(),
            values: values.iter().cloned().collect(),
        });
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Build a record from a JSON object literal.
pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("record() expects a JSON object, got {other}"),
    }
}
