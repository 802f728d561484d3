//! sqlcriteria: type-checked query criteria compiled to dialect-specific SQL.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`sqlcriteria_core`]: values, rows, errors, entity metadata, naming
//! - [`sqlcriteria_query`]: criteria, contexts, builders, dialects
//! - [`sqlcriteria_session`]: lifecycle hooks and the executing session
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlcriteria::prelude::*;
//!
//! let config = Config::new(Dialect::Postgres, Naming::SnakeLowerCase);
//! let e = EntityDef::of::<Employee>();
//! let context = SelectContext::new(e)
//!     .filter(e.property("salary")?.gt(1000))
//!     .order_by(e.property("name")?.asc());
//!
//! let sql = SelectBuilder::new(&config, &context).build(&no_comment)?;
//! assert_eq!(sql.params().len(), 1);
//! ```

pub use sqlcriteria_core as core;
pub use sqlcriteria_query as query;
pub use sqlcriteria_session as session;

pub use sqlcriteria_core::{Entity, EntityMeta, Error, Naming, PropertyInfo, Result, Row, Value};
pub use sqlcriteria_query::{
    Config, ConfigBuilder, Criterion, Dialect, DuplicateKeyType, EntityDef, Expression,
    LikeOption, PreparedSql, PropertyDef, SelectContext, SqlKind, SqlLogType,
};
pub use sqlcriteria_session::{
    EntityListener, Executor, InsertOutcome, Persisted, Replacement, Session,
};

/// Everything needed to declare entities, build statements and run them.
pub mod prelude {
    pub use sqlcriteria_core::{Entity, EntityMeta, Error, Naming, PropertyInfo, Result, Row, Value};
    pub use sqlcriteria_query::{
        AggregateFunction, Commenter, Config, ConfigBuilder, Criterion, DeleteBuilder,
        DeleteContext, Dialect, DuplicateKeyType, EntityDeleteBuilder, EntityDef,
        EntityInsertBuilder, EntityUpdateBuilder, Expression, InsertBuilder, InsertContext,
        JoinKind, LikeOption, OrderSpec, PreparedSql, PropertyDef, SelectBuilder, SelectContext,
        SortOrder, SqlKind, SqlLogType, UpdateBuilder, UpdateContext, UpsertBuilder,
        UpsertContext, no_comment,
    };
    pub use sqlcriteria_session::{
        EntityListener, Executor, InsertOutcome, ListenerRegistry, Persisted, PostDeleteContext,
        PostInsertContext, PostUpdateContext, PreDeleteContext, PreInsertContext,
        PreUpdateContext, Replacement, Session,
    };
}
