//! Prepared SQL: statement text with placeholders plus its ordered parameters.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};
use sqlcriteria_core::Value;

/// Statement kind of a [`PreparedSql`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlKind {
    /// SELECT
    Select,
    /// INSERT
    Insert,
    /// UPDATE
    Update,
    /// DELETE
    Delete,
    /// INSERT with conflict handling
    Upsert,
}

impl SqlKind {
    /// Lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            SqlKind::Select => "select",
            SqlKind::Insert => "insert",
            SqlKind::Update => "update",
            SqlKind::Delete => "delete",
            SqlKind::Upsert => "upsert",
        }
    }
}

/// Which form of a statement is written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlLogType {
    /// Text with placeholders
    Raw,
    /// Text with parameters inlined as literals
    #[default]
    Formatted,
    /// Nothing
    None,
}

/// Decorates finished SQL text, e.g. by prefixing a tracing comment.
pub type Commenter = dyn Fn(&str) -> String + Send + Sync;

/// Commenter that leaves SQL unchanged.
pub fn no_comment(sql: &str) -> String {
    sql.to_string()
}

/// A finished statement, ready for parameterized execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSql {
    kind: SqlKind,
    raw_sql: String,
    formatted_sql: String,
    params: Vec<Value>,
    log_type: SqlLogType,
}

impl PreparedSql {
    /// Statement kind.
    pub fn kind(&self) -> SqlKind {
        self.kind
    }

    /// SQL text with placeholders.
    pub fn raw_sql(&self) -> &str {
        &self.raw_sql
    }

    /// SQL text with parameters inlined. For logging only.
    pub fn formatted_sql(&self) -> &str {
        &self.formatted_sql
    }

    /// Bound parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Log form chosen at build time.
    pub fn log_type(&self) -> SqlLogType {
        self.log_type
    }

    /// The text the log type selects, if any.
    pub fn log_text(&self) -> Option<&str> {
        match self.log_type {
            SqlLogType::Raw => Some(&self.raw_sql),
            SqlLogType::Formatted => Some(&self.formatted_sql),
            SqlLogType::None => None,
        }
    }
}

/// Accumulates one statement's text and parameters.
///
/// Text and placeholder are always appended together with their value, so the
/// placeholder count equals the parameter count at every point.
#[derive(Debug)]
pub struct PreparedSqlBuilder {
    kind: SqlKind,
    dialect: Dialect,
    log_type: SqlLogType,
    raw: String,
    formatted: String,
    params: Vec<Value>,
}

impl PreparedSqlBuilder {
    /// Start an empty statement.
    pub fn new(kind: SqlKind, dialect: Dialect, log_type: SqlLogType) -> Self {
        Self {
            kind,
            dialect,
            log_type,
            raw: String::with_capacity(200),
            formatted: String::with_capacity(200),
            params: Vec::new(),
        }
    }

    /// Append literal SQL text.
    pub fn append_sql(&mut self, sql: &str) -> &mut Self {
        self.raw.push_str(sql);
        self.formatted.push_str(sql);
        self
    }

    /// Append a placeholder bound to `value`.
    pub fn append_param(&mut self, value: Value) -> &mut Self {
        let placeholder = self.dialect.placeholder(self.params.len() + 1);
        self.raw.push_str(&placeholder);
        self.formatted.push_str(&value.to_sql_literal());
        self.params.push(value);
        self
    }

    /// Drop the last `len` bytes, typically a trailing `", "` or `" and "`.
    pub fn cut_back_sql(&mut self, len: usize) -> &mut Self {
        self.raw.truncate(self.raw.len().saturating_sub(len));
        self.formatted
            .truncate(self.formatted.len().saturating_sub(len));
        self
    }

    #[cfg(test)]
    pub(crate) fn sql(&self) -> &str {
        &self.raw
    }

    /// Finish the statement, running `commenter` over the text once.
    pub fn build(self, commenter: &Commenter) -> PreparedSql {
        let prepared = PreparedSql {
            kind: self.kind,
            raw_sql: commenter(&self.raw),
            formatted_sql: commenter(&self.formatted),
            params: self.params,
            log_type: self.log_type,
        };
        if let Some(text) = prepared.log_text() {
            tracing::debug!(
                kind = prepared.kind.as_str(),
                params = prepared.params.len(),
                sql = %text,
                "Prepared SQL"
            );
        }
        prepared
    }
}
