//! The boundary to whatever actually talks to the database.

use sqlcriteria_core::{Result, Row, Value};
use sqlcriteria_query::PreparedSql;

/// Result of executing an INSERT.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsertOutcome {
    /// Rows inserted (or, for upserts, inserted or updated)
    pub rows_affected: u64,
    /// Key the database generated, when one was requested
    pub generated_key: Option<Value>,
}

impl InsertOutcome {
    /// Outcome without a generated key.
    pub fn rows(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            generated_key: None,
        }
    }

    /// Outcome carrying a generated key.
    pub fn with_key(rows_affected: u64, key: impl Into<Value>) -> Self {
        Self {
            rows_affected,
            generated_key: Some(key.into()),
        }
    }
}

/// Executes prepared statements.
///
/// Implementations own connections, transactions, timeouts and cancellation.
/// The session calls exactly one method per statement and never retries.
pub trait Executor {
    /// Execute an UPDATE or DELETE and return the affected row count.
    fn execute(&mut self, sql: &PreparedSql) -> Result<u64>;

    /// Execute a SELECT and return its rows.
    fn query(&mut self, sql: &PreparedSql) -> Result<Vec<Row>>;

    /// Execute an INSERT or upsert.
    ///
    /// `generated_key_column` names the column whose generated value should be
    /// reported back in [`InsertOutcome::generated_key`].
    fn insert(&mut self, sql: &PreparedSql, generated_key_column: Option<&str>)
    -> Result<InsertOutcome>;
}

impl<X: Executor + ?Sized> Executor for &mut X {
    fn execute(&mut self, sql: &PreparedSql) -> Result<u64> {
        (**self).execute(sql)
    }

    fn query(&mut self, sql: &PreparedSql) -> Result<Vec<Row>> {
        (**self).query(sql)
    }

    fn insert(
        &mut self,
        sql: &PreparedSql,
        generated_key_column: Option<&str>,
    ) -> Result<InsertOutcome> {
        (**self).insert(sql, generated_key_column)
    }
}
