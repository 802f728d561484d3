//! Per-database rendering rules.

use crate::upsert::UpsertRenderer;
use serde::{Deserialize, Serialize};
use sqlcriteria_core::{Error, Result};

/// SQL dialect for generating database-specific SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Plain SQL with `?` placeholders and no vendor extensions.
    #[default]
    Standard,
    /// PostgreSQL (uses $1, $2, ... placeholders)
    Postgres,
    /// SQLite (uses ?1, ?2, ... placeholders)
    Sqlite,
    /// MySQL (uses ? placeholders)
    Mysql,
    /// Oracle (uses :1, :2, ... placeholders)
    Oracle,
    /// SQL Server (uses @P1, @P2, ... placeholders)
    Mssql,
}

/// How a dialect renders LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStyle {
    /// `limit n offset m`
    LimitOffset,
    /// `offset m rows fetch first n rows only`
    OffsetFetch,
}

impl Dialect {
    /// Dialect name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Standard => "standard",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::Mssql => "mssql",
        }
    }

    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Standard | Dialect::Mysql => "?".to_string(),
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
            Dialect::Oracle => format!(":{}", index),
            Dialect::Mssql => format!("@P{}", index),
        }
    }

    /// Paging syntax.
    pub const fn paging_style(self) -> PagingStyle {
        match self {
            Dialect::Oracle | Dialect::Mssql => PagingStyle::OffsetFetch,
            _ => PagingStyle::LimitOffset,
        }
    }

    /// LIMIT value rendered when only an offset is requested, for dialects
    /// that reject OFFSET without LIMIT.
    pub const fn unbounded_limit(self) -> Option<&'static str> {
        match self {
            Dialect::Mysql => Some("18446744073709551615"),
            Dialect::Sqlite => Some("-1"),
            _ => None,
        }
    }

    /// Whether OFFSET/FETCH requires an ORDER BY clause.
    pub const fn paging_requires_order_by(self) -> bool {
        matches!(self, Dialect::Mssql)
    }

    /// Whether criteria DELETE names its target by alias (`delete t0_ from T t0_`).
    pub const fn deletes_by_alias(self) -> bool {
        matches!(self, Dialect::Mysql | Dialect::Mssql)
    }

    /// Whether criteria UPDATE names its target by alias and adds a FROM clause
    /// (`update t0_ set ... from T t0_`).
    pub const fn updates_by_alias(self) -> bool {
        matches!(self, Dialect::Mssql)
    }

    /// Whether the target of a criteria UPDATE or DELETE needs `as` before its
    /// alias (`delete from T as t0_`).
    pub const fn dml_alias_needs_as(self) -> bool {
        matches!(self, Dialect::Sqlite)
    }

    /// Whether inserted rows can report database-generated keys.
    pub const fn supports_generated_keys(self) -> bool {
        !matches!(self, Dialect::Standard | Dialect::Oracle)
    }

    /// Whether SELECT ... FOR UPDATE is available.
    pub const fn supports_for_update(self) -> bool {
        !matches!(self, Dialect::Sqlite | Dialect::Mssql)
    }

    /// Whether FOR UPDATE may follow a paged SELECT.
    pub const fn supports_for_update_with_paging(self) -> bool {
        !matches!(self, Dialect::Oracle)
    }

    /// Whether the dialect has a native upsert statement.
    pub const fn supports_upsert(self) -> bool {
        !matches!(self, Dialect::Standard)
    }

    /// The renderer that knows this dialect's conflict-handling syntax.
    pub fn upsert_strategy(self) -> Result<UpsertRenderer> {
        match self {
            Dialect::Postgres | Dialect::Sqlite => Ok(UpsertRenderer::OnConflict),
            Dialect::Mysql => Ok(UpsertRenderer::OnDuplicateKey),
            Dialect::Oracle => Ok(UpsertRenderer::OracleMerge),
            Dialect::Mssql => Ok(UpsertRenderer::MssqlMerge),
            Dialect::Standard => Err(self.unsupported("upsert")),
        }
    }

    /// Capability error for `feature`.
    pub fn unsupported(self, feature: &'static str) -> Error {
        Error::Unsupported {
            dialect: self.name(),
            feature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Standard.placeholder(3), "?");
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Sqlite.placeholder(2), "?2");
        assert_eq!(Dialect::Mysql.placeholder(2), "?");
        assert_eq!(Dialect::Oracle.placeholder(4), ":4");
        assert_eq!(Dialect::Mssql.placeholder(5), "@P5");
    }

    #[test]
    fn test_capabilities() {
        assert!(!Dialect::Standard.supports_generated_keys());
        assert!(!Dialect::Oracle.supports_generated_keys());
        assert!(Dialect::Postgres.supports_generated_keys());
        assert!(!Dialect::Sqlite.supports_for_update());
        assert!(Dialect::Oracle.supports_for_update());
        assert_eq!(Dialect::Mssql.paging_style(), PagingStyle::OffsetFetch);
        assert_eq!(Dialect::Mysql.paging_style(), PagingStyle::LimitOffset);
    }

    #[test]
    fn test_upsert_strategy_lookup() {
        assert_eq!(
            Dialect::Sqlite.upsert_strategy().unwrap(),
            UpsertRenderer::OnConflict
        );
        assert_eq!(
            Dialect::Mssql.upsert_strategy().unwrap(),
            UpsertRenderer::MssqlMerge
        );
        let err = Dialect::Standard.upsert_strategy().unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "dialect `standard` does not support upsert");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Dialect::Postgres).unwrap();
        assert_eq!(json, "\"postgres\"");
        let parsed: Dialect = serde_json::from_str("\"mssql\"").unwrap();
        assert_eq!(parsed, Dialect::Mssql);
    }
}
