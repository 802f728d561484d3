//! Upsert: INSERT with dialect-specific conflict handling.
//!
//! [`UpsertBuilder`] only assembles an [`UpsertContext`] and asks the dialect
//! for its [`UpsertRenderer`]; the renderer alone decides the statement shape.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::def::{EntityDef, PropertyDef};
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use crate::support::{BuilderSupport, COMMA};
use serde::{Deserialize, Serialize};
use sqlcriteria_core::{Entity, Error, Result, Value};

/// What happens when the inserted row collides with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyType {
    /// Overwrite the existing row's updatable columns.
    Update,
    /// Keep the existing row.
    Ignore,
    /// Let the database raise its unique-constraint error.
    #[default]
    Exception,
}

impl DuplicateKeyType {
    /// Variant name in uppercase, as listeners commonly record it.
    pub const fn as_str(self) -> &'static str {
        match self {
            DuplicateKeyType::Update => "UPDATE",
            DuplicateKeyType::Ignore => "IGNORE",
            DuplicateKeyType::Exception => "EXCEPTION",
        }
    }
}

/// Everything a renderer needs to write one upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertContext {
    entity: EntityDef,
    duplicate_key_type: DuplicateKeyType,
    keys: Vec<PropertyDef>,
    values: Vec<(PropertyDef, Value)>,
    assignments: Vec<PropertyDef>,
}

impl UpsertContext {
    /// Summarize an entity snapshot for upserting.
    ///
    /// Conflicts are detected on `keys`, or on the identity properties when
    /// `keys` is empty. Insertable properties are inserted, skipping a generated
    /// key whose value is still NULL. Updatable non-key properties are
    /// overwritten on conflict.
    pub fn from_entity<E: Entity>(
        entity: &E,
        duplicate_key_type: DuplicateKeyType,
        keys: Vec<PropertyDef>,
    ) -> Result<Self> {
        let def = EntityDef::of::<E>();
        let keys = if keys.is_empty() {
            def.id_properties()
        } else {
            keys
        };
        if let Some(foreign) = keys.iter().find(|k| k.entity() != def) {
            return Err(Error::UnknownEntity {
                entity: foreign.entity().name().to_string(),
                property: foreign.name().to_string(),
            });
        }
        if keys.is_empty() && duplicate_key_type != DuplicateKeyType::Exception {
            return Err(Error::Structure(format!(
                "upsert of `{}` needs conflict keys or identity properties",
                def.name()
            )));
        }

        let mut values = Vec::new();
        for (name, value) in entity.to_row() {
            let property = def.property(name)?;
            let info = property.info();
            if !info.insertable || (info.generated && value.is_null()) {
                continue;
            }
            values.push((property, value));
        }
        let assignments = values
            .iter()
            .map(|(p, _)| *p)
            .filter(|p| p.info().updatable && !p.info().id && !keys.contains(p))
            .collect();

        Ok(Self {
            entity: def,
            duplicate_key_type,
            keys,
            values,
            assignments,
        })
    }

    /// Target entity.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Requested duplicate-key handling.
    pub fn duplicate_key_type(&self) -> DuplicateKeyType {
        self.duplicate_key_type
    }

    /// Conflict keys.
    pub fn keys(&self) -> &[PropertyDef] {
        &self.keys
    }

    /// Inserted columns and values, in property order.
    pub fn values(&self) -> &[(PropertyDef, Value)] {
        &self.values
    }

    /// Columns overwritten on conflict.
    pub fn assignments(&self) -> &[PropertyDef] {
        &self.assignments
    }

    /// Handling actually rendered: an update with nothing to overwrite keeps
    /// the existing row.
    fn effective_type(&self) -> DuplicateKeyType {
        match self.duplicate_key_type {
            DuplicateKeyType::Update if self.assignments.is_empty() => DuplicateKeyType::Ignore,
            other => other,
        }
    }
}

/// Per-dialect conflict-clause syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertRenderer {
    /// `insert ... on conflict (k) do update set ... | do nothing`
    OnConflict,
    /// `insert ... on duplicate key update ...` and `insert ignore into ...`
    OnDuplicateKey,
    /// `merge into T target using (select ... from dual) excluded ...`
    OracleMerge,
    /// `merge into T with (holdlock) as target using (values (...)) as excluded (...) ...;`
    MssqlMerge,
}

impl UpsertRenderer {
    pub(crate) fn render(
        self,
        context: &UpsertContext,
        support: &BuilderSupport<'_, '_>,
        sql: &mut PreparedSqlBuilder,
    ) -> Result<()> {
        let kind = context.effective_type();
        if kind == DuplicateKeyType::Exception {
            return insert_into("insert into ", context, support, sql);
        }
        match self {
            UpsertRenderer::OnConflict => {
                insert_into("insert into ", context, support, sql)?;
                sql.append_sql(" on conflict (");
                column_list(context.keys.iter().copied(), support, sql)?;
                sql.append_sql(")");
                if kind == DuplicateKeyType::Ignore {
                    sql.append_sql(" do nothing");
                } else {
                    sql.append_sql(" do update set ");
                    for property in &context.assignments {
                        let column = support.column_name(*property)?;
                        sql.append_sql(&format!("{} = excluded.{}", column, column));
                        sql.append_sql(COMMA);
                    }
                    sql.cut_back_sql(COMMA.len());
                }
                Ok(())
            }
            UpsertRenderer::OnDuplicateKey => {
                if kind == DuplicateKeyType::Ignore {
                    return insert_into("insert ignore into ", context, support, sql);
                }
                insert_into("insert into ", context, support, sql)?;
                sql.append_sql(" on duplicate key update ");
                for property in &context.assignments {
                    let column = support.column_name(*property)?;
                    sql.append_sql(&format!("{} = values({})", column, column));
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                Ok(())
            }
            UpsertRenderer::OracleMerge => {
                check_merge_keys(context)?;
                sql.append_sql("merge into ");
                sql.append_sql(&support.table(context.entity)?);
                sql.append_sql(" target using (select ");
                for (property, value) in &context.values {
                    sql.append_param(value.clone());
                    sql.append_sql(" ");
                    sql.append_sql(&support.column_name(*property)?);
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                sql.append_sql(" from dual) excluded");
                merge_tail(kind, context, support, sql)
            }
            UpsertRenderer::MssqlMerge => {
                check_merge_keys(context)?;
                sql.append_sql("merge into ");
                sql.append_sql(&support.table(context.entity)?);
                sql.append_sql(" with (holdlock) as target using (values (");
                for (_, value) in &context.values {
                    sql.append_param(value.clone());
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                sql.append_sql(")) as excluded (");
                column_list(context.values.iter().map(|(p, _)| *p), support, sql)?;
                sql.append_sql(")");
                merge_tail(kind, context, support, sql)?;
                sql.append_sql(";");
                Ok(())
            }
        }
    }
}

fn column_list(
    properties: impl Iterator<Item = PropertyDef>,
    support: &BuilderSupport<'_, '_>,
    sql: &mut PreparedSqlBuilder,
) -> Result<()> {
    let mut any = false;
    for property in properties {
        sql.append_sql(&support.column_name(property)?);
        sql.append_sql(COMMA);
        any = true;
    }
    if any {
        sql.cut_back_sql(COMMA.len());
    }
    Ok(())
}

fn insert_into(
    keyword: &str,
    context: &UpsertContext,
    support: &BuilderSupport<'_, '_>,
    sql: &mut PreparedSqlBuilder,
) -> Result<()> {
    if context.values.is_empty() {
        return Err(Error::Structure(format!(
            "upsert of `{}` has no insertable values",
            context.entity.name()
        )));
    }
    sql.append_sql(keyword);
    sql.append_sql(&support.table(context.entity)?);
    sql.append_sql(" (");
    column_list(context.values.iter().map(|(p, _)| *p), support, sql)?;
    sql.append_sql(") values (");
    for (_, value) in &context.values {
        sql.append_param(value.clone());
        sql.append_sql(COMMA);
    }
    sql.cut_back_sql(COMMA.len());
    sql.append_sql(")");
    Ok(())
}

/// Merge sources carry only inserted columns, so every key must be one of them.
fn check_merge_keys(context: &UpsertContext) -> Result<()> {
    match context
        .keys
        .iter()
        .find(|k| !context.values.iter().any(|(p, _)| p == *k))
    {
        Some(missing) => Err(Error::Structure(format!(
            "merge key `{}` of `{}` has no value",
            missing.name(),
            context.entity.name()
        ))),
        None => Ok(()),
    }
}

fn merge_tail(
    kind: DuplicateKeyType,
    context: &UpsertContext,
    support: &BuilderSupport<'_, '_>,
    sql: &mut PreparedSqlBuilder,
) -> Result<()> {
    sql.append_sql(" on (");
    for key in &context.keys {
        let column = support.column_name(*key)?;
        sql.append_sql(&format!("target.{} = excluded.{}", column, column));
        sql.append_sql(" and ");
    }
    sql.cut_back_sql(" and ".len());
    sql.append_sql(")");
    if kind == DuplicateKeyType::Update {
        sql.append_sql(" when matched then update set ");
        for property in &context.assignments {
            let column = support.column_name(*property)?;
            sql.append_sql(&format!("{} = excluded.{}", column, column));
            sql.append_sql(COMMA);
        }
        sql.cut_back_sql(COMMA.len());
    }
    sql.append_sql(" when not matched then insert (");
    column_list(context.values.iter().map(|(p, _)| *p), support, sql)?;
    sql.append_sql(") values (");
    for (property, _) in &context.values {
        sql.append_sql("excluded.");
        sql.append_sql(&support.column_name(*property)?);
        sql.append_sql(COMMA);
    }
    sql.cut_back_sql(COMMA.len());
    sql.append_sql(")");
    Ok(())
}

/// Renders an [`UpsertContext`] through the configured dialect's renderer.
#[derive(Debug)]
pub struct UpsertBuilder<'a> {
    config: &'a Config,
    context: &'a UpsertContext,
}

impl<'a> UpsertBuilder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config, context: &'a UpsertContext) -> Self {
        Self { config, context }
    }

    /// Render the statement. Fails for dialects without upsert support.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let renderer = self.config.dialect.upsert_strategy()?;
        let mut sql = PreparedSqlBuilder::new(
            SqlKind::Upsert,
            self.config.dialect,
            self.config.sql_log_type,
        );
        let aliases = AliasManager::new();
        let support = BuilderSupport::new(self.config, &aliases);
        renderer.render(self.context, &support, &mut sql)?;
        Ok(sql.build(commenter))
    }
}
