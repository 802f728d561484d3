//! Criteria-to-SQL compilation for sqlcriteria.
//!
//! `sqlcriteria-query` turns declarative statement descriptions into
//! dialect-specific SQL text plus ordered bound parameters.
//!
//! # Role In The Architecture
//!
//! - **Declaration**: `EntityDef`/`PropertyDef` name statement participants;
//!   `Criterion` trees and the `*Context` types describe one statement each.
//! - **Rendering**: the `*Builder` types walk a fixed phase sequence, resolve
//!   table aliases through `AliasManager` and accumulate text and parameters
//!   in a `PreparedSqlBuilder`.
//! - **Dialects**: `Dialect` supplies placeholders, paging, locking and the
//!   upsert renderer for each supported database.
//!
//! Nothing in this crate performs I/O; a `PreparedSql` is handed to an
//! executor elsewhere.

pub mod alias;
pub mod builder;
pub mod config;
pub mod context;
pub mod criterion;
pub mod def;
pub mod delete;
pub mod dialect;
pub mod insert;
pub mod phase;
pub mod prepared;
pub mod select;
mod support;
pub mod update;
pub mod upsert;

#[cfg(test)]
mod testing;

pub use alias::AliasManager;
pub use builder::{EntityDeleteBuilder, EntityInsertBuilder, EntityUpdateBuilder};
pub use config::{Config, ConfigBuilder};
pub use context::{
    DeleteContext, ForUpdate, InsertContext, Join, JoinKind, OrderSpec, Projection,
    SelectContext, SortOrder, UpdateContext,
};
pub use criterion::{
    AggregateFunction, ComparisonOp, Criterion, Expression, LikeOption, Operand,
};
pub use def::{EntityDef, PropertyDef};
pub use delete::DeleteBuilder;
pub use dialect::{Dialect, PagingStyle};
pub use insert::InsertBuilder;
pub use phase::{DeletePhase, InsertPhase, SelectPhase, UpdatePhase};
pub use prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind, SqlLogType, no_comment};
pub use select::SelectBuilder;
pub use update::UpdateBuilder;
pub use upsert::{DuplicateKeyType, UpsertBuilder, UpsertContext, UpsertRenderer};
