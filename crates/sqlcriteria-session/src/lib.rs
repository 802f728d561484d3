//! Lifecycle-aware statement execution for sqlcriteria.
//!
//! The [`Session`] ties the compilation engine to an [`Executor`] and runs
//! registered [`EntityListener`]s around every entity insert, update, delete
//! and upsert.
//!
//! # Pipeline
//!
//! For each entity operation, strictly in this order:
//!
//! 1. pre-hook (listeners may replace the snapshot)
//! 2. SQL is built from the current snapshot
//! 3. the executor runs it
//! 4. a generated key is written into the current snapshot
//! 5. post-hook (listeners may replace the snapshot again)
//!
//! Any error aborts the remaining steps and is returned unchanged.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(executor, Config::new(Dialect::Postgres, Naming::SnakeLowerCase));
//! session.register_listener::<Department, _>(AuditListener);
//!
//! let saved = session.insert(dept)?;
//! println!("id = {:?}, rows = {}", saved.entity.id, saved.count);
//! ```

pub mod executor;
pub mod lifecycle;

pub use executor::{Executor, InsertOutcome};
pub use lifecycle::{
    EntityListener, ListenerRegistry, PostContext, PostDeleteContext, PostInsertContext,
    PostUpdateContext, PreContext, PreDeleteContext, PreInsertContext, PreUpdateContext,
    Replacement,
};

use lifecycle::{PostContext as Post, PreContext as Pre};
use sqlcriteria_core::{Entity, Result, Row};
use sqlcriteria_query::{
    Commenter, Config, DeleteBuilder, DeleteContext, DuplicateKeyType, EntityDeleteBuilder,
    EntityInsertBuilder, EntityUpdateBuilder, InsertBuilder, InsertContext, PreparedSql,
    PropertyDef, SelectBuilder, SelectContext, UpdateBuilder, UpdateContext, UpsertBuilder,
    UpsertContext, no_comment,
};

/// An entity snapshot after a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<E> {
    /// Final snapshot, after generated-key population and post-hooks
    pub entity: E,
    /// Rows affected; zero when execution was skipped
    pub count: u64,
}

impl<E> Persisted<E> {
    /// Take the snapshot.
    pub fn into_entity(self) -> E {
        self.entity
    }
}

/// Runs statements through an executor with entity lifecycle hooks.
pub struct Session<X: Executor> {
    executor: X,
    config: Config,
    listeners: ListenerRegistry,
    commenter: Box<Commenter>,
}

impl<X: Executor> Session<X> {
    /// Create a session without listeners.
    pub fn new(executor: X, config: Config) -> Self {
        Self {
            executor,
            config,
            listeners: ListenerRegistry::new(),
            commenter: Box::new(no_comment),
        }
    }

    /// Register a listener for entity type `E`.
    pub fn register_listener<E, L>(&mut self, listener: L) -> &mut Self
    where
        E: Entity,
        L: EntityListener<E> + 'static,
    {
        self.listeners.register::<E, L>(listener);
        self
    }

    /// Decorate every statement's text, e.g. with a tracing comment.
    pub fn set_commenter<F>(&mut self, commenter: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.commenter = Box::new(commenter);
        self
    }

    /// Statement configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registered listeners.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Get a reference to the executor.
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Get a mutable reference to the executor.
    pub fn executor_mut(&mut self) -> &mut X {
        &mut self.executor
    }

    /// Consume the session and return the executor.
    pub fn into_executor(self) -> X {
        self.executor
    }

    // ========================================================================
    // Entity operations
    // ========================================================================

    /// Insert an entity.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = E::META.name))]
    pub fn insert<E: Entity>(&mut self, entity: E) -> Result<Persisted<E>> {
        self.insert_with(entity, DuplicateKeyType::Exception, Vec::new())
    }

    /// Insert an entity, resolving conflicts on `keys` (the identity when empty)
    /// according to `duplicate_key_type`.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = E::META.name, duplicate_key_type = ?duplicate_key_type))]
    pub fn upsert<E: Entity>(
        &mut self,
        entity: E,
        duplicate_key_type: DuplicateKeyType,
        keys: Vec<PropertyDef>,
    ) -> Result<Persisted<E>> {
        self.insert_with(entity, duplicate_key_type, keys)
    }

    fn insert_with<E: Entity>(
        &mut self,
        entity: E,
        duplicate_key_type: DuplicateKeyType,
        keys: Vec<PropertyDef>,
    ) -> Result<Persisted<E>> {
        let mut entity = self.listeners.chain(entity, |listener, current| {
            listener.pre_insert(&Pre::new(current, duplicate_key_type))
        })?;

        let (sql, key_column) = {
            let insert = EntityInsertBuilder::new(&self.config, &entity);
            let key_column = insert.generated_key_column()?;
            if key_column.is_some() && !self.config.dialect.supports_generated_keys() {
                return Err(self.config.dialect.unsupported("generated keys"));
            }
            let sql = if duplicate_key_type == DuplicateKeyType::Exception && keys.is_empty() {
                insert.build(self.commenter.as_ref())?
            } else {
                let context = UpsertContext::from_entity(&entity, duplicate_key_type, keys)?;
                UpsertBuilder::new(&self.config, &context).build(self.commenter.as_ref())?
            };
            (sql, key_column)
        };

        let outcome = self.executor.insert(&sql, key_column.as_deref())?;
        if let Some(key) = outcome.generated_key.clone().filter(|_| key_column.is_some()) {
            tracing::debug!(entity = E::META.name, ?key, "Populating generated key");
            entity.set_generated_key(key);
        }

        let entity = self.listeners.chain(entity, |listener, current| {
            listener.post_insert(&Post::new(
                current,
                duplicate_key_type,
                outcome.rows_affected,
            ))
        })?;
        tracing::info!(
            entity = E::META.name,
            rows = outcome.rows_affected,
            "Inserted entity"
        );
        Ok(Persisted {
            entity,
            count: outcome.rows_affected,
        })
    }

    /// Update an entity by its identity.
    ///
    /// When no property is updatable the statement is skipped, but both hooks
    /// still run.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = E::META.name))]
    pub fn update<E: Entity>(&mut self, entity: E) -> Result<Persisted<E>> {
        let entity = self.listeners.chain(entity, |listener, current| {
            listener.pre_update(&Pre::new(current, DuplicateKeyType::Exception))
        })?;

        let sql = {
            let update = EntityUpdateBuilder::new(&self.config, &entity);
            if update.is_executable() {
                Some(update.build(self.commenter.as_ref())?)
            } else {
                None
            }
        };
        let count = match sql {
            Some(sql) => self.executor.execute(&sql)?,
            None => {
                tracing::debug!(entity = E::META.name, "Nothing to update, skipping execution");
                0
            }
        };

        let entity = self.listeners.chain(entity, |listener, current| {
            listener.post_update(&Post::new(current, DuplicateKeyType::Exception, count))
        })?;
        tracing::info!(entity = E::META.name, rows = count, "Updated entity");
        Ok(Persisted { entity, count })
    }

    /// Delete an entity by its identity.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = E::META.name))]
    pub fn delete<E: Entity>(&mut self, entity: E) -> Result<Persisted<E>> {
        let entity = self.listeners.chain(entity, |listener, current| {
            listener.pre_delete(&Pre::new(current, DuplicateKeyType::Exception))
        })?;

        let sql = EntityDeleteBuilder::new(&self.config, &entity).build(self.commenter.as_ref())?;
        let count = self.executor.execute(&sql)?;

        let entity = self.listeners.chain(entity, |listener, current| {
            listener.post_delete(&Post::new(current, DuplicateKeyType::Exception, count))
        })?;
        tracing::info!(entity = E::META.name, rows = count, "Deleted entity");
        Ok(Persisted { entity, count })
    }

    // ========================================================================
    // Criteria statements
    // ========================================================================

    /// Run a SELECT.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = context.entity().name()))]
    pub fn select(&mut self, context: &SelectContext) -> Result<Vec<Row>> {
        let sql = SelectBuilder::new(&self.config, context).build(self.commenter.as_ref())?;
        self.executor.query(&sql)
    }

    /// Run a criteria UPDATE.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = context.entity().name()))]
    pub fn execute_update(&mut self, context: &UpdateContext) -> Result<u64> {
        let sql = UpdateBuilder::new(&self.config, context).build(self.commenter.as_ref())?;
        self.executor.execute(&sql)
    }

    /// Run a criteria DELETE.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = context.entity().name()))]
    pub fn execute_delete(&mut self, context: &DeleteContext) -> Result<u64> {
        let sql = DeleteBuilder::new(&self.config, context).build(self.commenter.as_ref())?;
        self.executor.execute(&sql)
    }

    /// Run a criteria INSERT.
    #[tracing::instrument(level = "debug", skip_all, fields(entity = context.entity().name()))]
    pub fn execute_insert(&mut self, context: &InsertContext) -> Result<u64> {
        let sql = InsertBuilder::new(&self.config, context).build(self.commenter.as_ref())?;
        Ok(self.executor.insert(&sql, None)?.rows_affected)
    }

    /// Build a SELECT without running it.
    pub fn prepare_select(&self, context: &SelectContext) -> Result<PreparedSql> {
        SelectBuilder::new(&self.config, context).build(self.commenter.as_ref())
    }
}

impl<X: Executor + std::fmt::Debug> std::fmt::Debug for Session<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("executor", &self.executor)
            .field("config", &self.config)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcriteria_core::{EntityMeta, Error, Naming, PropertyInfo, Value};
    use sqlcriteria_query::{Dialect, EntityDef, SqlKind};

    #[derive(Debug, Default)]
    struct Recorder {
        statements: Vec<(SqlKind, String, Vec<Value>)>,
        key_columns: Vec<Option<String>>,
        next_key: i64,
    }

    impl Recorder {
        fn record(&mut self, sql: &PreparedSql) {
            self.statements
                .push((sql.kind(), sql.raw_sql().to_string(), sql.params().to_vec()));
        }
    }

    impl Executor for Recorder {
        fn execute(&mut self, sql: &PreparedSql) -> Result<u64> {
            self.record(sql);
            Ok(1)
        }

        fn query(&mut self, sql: &PreparedSql) -> Result<Vec<Row>> {
            self.record(sql);
            Ok(vec![Row::new(vec!["id".to_string()], vec![Value::BigInt(1)])])
        }

        fn insert(
            &mut self,
            sql: &PreparedSql,
            generated_key_column: Option<&str>,
        ) -> Result<InsertOutcome> {
            self.record(sql);
            self.key_columns.push(generated_key_column.map(str::to_string));
            self.next_key += 1;
            Ok(InsertOutcome::with_key(1, self.next_key + 99))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<i64>,
        body: String,
    }

    static NOTE_PROPERTIES: &[PropertyInfo] = &[
        PropertyInfo::new("id").id(true).generated(true),
        PropertyInfo::new("body"),
    ];
    static NOTE: EntityMeta = EntityMeta::new("Note", NOTE_PROPERTIES);

    impl Entity for Note {
        const META: &'static EntityMeta = &NOTE;

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            vec![("id", self.id.into()), ("body", self.body.clone().into())]
        }

        fn set_generated_key(&mut self, value: Value) {
            self.id = value.as_i64();
        }
    }

    fn session(dialect: Dialect) -> Session<Recorder> {
        Session::new(Recorder::default(), Config::new(dialect, Naming::SnakeLowerCase))
    }

    fn note() -> Note {
        Note {
            id: None,
            body: "hello".to_string(),
        }
    }

    #[test]
    fn test_insert_populates_generated_key() {
        let mut session = session(Dialect::Postgres);
        let saved = session.insert(note()).unwrap();
        assert_eq!(saved.entity.id, Some(100));
        assert_eq!(saved.count, 1);
        let recorder = session.executor();
        assert_eq!(recorder.key_columns, vec![Some("id".to_string())]);
        assert_eq!(recorder.statements[0].1, "insert into note (body) values ($1)");
    }

    #[test]
    fn test_generated_key_needs_dialect_support() {
        let mut session = session(Dialect::Oracle);
        let err = session.insert(note()).unwrap_err();
        assert!(matches!(err, Error::Unsupported { feature: "generated keys", .. }));
        assert!(session.executor().statements.is_empty());
    }

    #[test]
    fn test_update_and_delete_by_identity() {
        let mut session = session(Dialect::Mysql);
        let stored = Note {
            id: Some(5),
            body: "edited".to_string(),
        };
        assert_eq!(session.update(stored.clone()).unwrap().count, 1);
        assert_eq!(session.delete(stored).unwrap().count, 1);
        let statements = &session.executor().statements;
        assert_eq!(statements[0].1, "update note set body = ? where id = ?");
        assert_eq!(statements[1].1, "delete from note where id = ?");
        assert_eq!(statements[1].2, vec![Value::BigInt(5)]);
    }

    #[test]
    fn test_commenter_decorates_statements() {
        let mut session = session(Dialect::Sqlite);
        session.set_commenter(|sql| format!("/* notes */ {}", sql));
        let context = SelectContext::new(EntityDef::of::<Note>());
        let rows = session.select(&context).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            session.executor().statements[0].1,
            "/* notes */ select t0_.id, t0_.body from note t0_"
        );
    }

    #[test]
    fn test_criteria_statements() {
        let mut session = session(Dialect::Postgres);
        let n = EntityDef::of::<Note>();
        let body = n.property("body").unwrap();
        session
            .execute_update(&UpdateContext::new(n).set(body, "x").filter(body.eq("y")))
            .unwrap();
        session
            .execute_delete(&DeleteContext::new(n).filter(body.is_null()))
            .unwrap();
        session
            .execute_insert(&InsertContext::new(n).value(body, "z"))
            .unwrap();
        let kinds: Vec<_> = session.executor().statements.iter().map(|s| s.0).collect();
        assert_eq!(kinds, vec![SqlKind::Update, SqlKind::Delete, SqlKind::Insert]);
        assert_eq!(session.executor().key_columns, vec![None]);
    }
}
