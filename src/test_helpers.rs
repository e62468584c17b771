//! Test doubles for unit tests.

use crate::executor::{LifeError, LifeExecutor};
use may_postgres::types::ToSql;
use may_postgres::Row;
use std::cell::RefCell;

/// Executor that records every statement and returns no rows.
///
/// `failing_on(prefix)` makes statements starting with `prefix` fail with
/// `LifeError::QueryError`, after recording them. `execute` reports zero
/// affected rows unless built with `affecting(rows)`.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    statements: RefCell<Vec<String>>,
    fail_prefix: Option<&'static str>,
    rows_affected: u64,
}

impl RecordingExecutor {
    pub(crate) fn failing_on(prefix: &'static str) -> Self {
        Self {
            fail_prefix: Some(prefix),
            ..Self::default()
        }
    }

    pub(crate) fn affecting(rows: u64) -> Self {
        Self {
            rows_affected: rows,
            ..Self::default()
        }
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    fn record(&self, query: &str) -> Result<(), LifeError> {
        self.statements.borrow_mut().push(query.to_string());
        match self.fail_prefix {
            Some(prefix) if query.starts_with(prefix) => {
                Err(LifeError::QueryError(format!("refused: {query}")))
            }
            _ => Ok(()),
        }
    }
}

impl LifeExecutor for RecordingExecutor {
    fn execute(&self, query: &str, _params: &[&dyn ToSql]) -> Result<u64, LifeError> {
        self.record(query)?;
        Ok(self.rows_affected)
    }

    fn query_one(&self, query: &str, _params: &[&dyn ToSql]) -> Result<Row, LifeError> {
        self.record(query)?;
        Err(LifeError::QueryError("no rows returned".to_string()))
    }

    fn query_all(&self, query: &str, _params: &[&dyn ToSql]) -> Result<Vec<Row>, LifeError> {
        self.record(query)?;
        Ok(Vec::new())
    }
}
