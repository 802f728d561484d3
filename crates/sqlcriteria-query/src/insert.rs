//! Criteria INSERT statement builder.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::context::InsertContext;
use crate::phase::{InsertPhase, PhasedRenderer};
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use crate::support::{BuilderSupport, COMMA};
use sqlcriteria_core::{Error, Result};

/// Renders an [`InsertContext`].
#[derive(Debug)]
pub struct InsertBuilder<'a> {
    config: &'a Config,
    context: &'a InsertContext,
}

impl<'a> InsertBuilder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config, context: &'a InsertContext) -> Self {
        Self { config, context }
    }

    /// Render the statement. An insert without values is a structural error.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        if self.context.values.is_empty() {
            return Err(Error::Structure(format!(
                "insert into `{}` has no values",
                self.context.entity.name()
            )));
        }
        if let Some((property, _)) = self
            .context
            .values
            .iter()
            .find(|(p, _)| p.entity() != self.context.entity)
        {
            return Err(Error::UnknownEntity {
                entity: property.entity().name().to_string(),
                property: property.name().to_string(),
            });
        }
        let mut sql = PreparedSqlBuilder::new(
            SqlKind::Insert,
            self.config.dialect,
            self.config.sql_log_type,
        );
        let aliases = AliasManager::new();
        let renderer = InsertRenderer {
            support: BuilderSupport::new(self.config, &aliases),
            context: self.context,
        };
        renderer.render(&mut sql)?;
        Ok(sql.build(commenter))
    }
}

struct InsertRenderer<'a, 'p> {
    support: BuilderSupport<'a, 'p>,
    context: &'a InsertContext,
}

impl PhasedRenderer for InsertRenderer<'_, '_> {
    type Phase = InsertPhase;
    const ORDER: &'static [InsertPhase] = InsertPhase::ORDER;

    fn render_phase(&self, phase: InsertPhase, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match phase {
            InsertPhase::Into => {
                sql.append_sql("insert into ");
                sql.append_sql(&self.support.table(self.context.entity)?);
                sql.append_sql(" (");
                for (property, _) in &self.context.values {
                    sql.append_sql(&self.support.column_name(*property)?);
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                sql.append_sql(")");
            }
            InsertPhase::Values => {
                sql.append_sql(" values (");
                for (_, operand) in &self.context.values {
                    self.support.operand(operand, sql)?;
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                sql.append_sql(")");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::prepared::no_comment;
    use crate::testing::{config, department, employee};
    use sqlcriteria_core::Value;

    #[test]
    fn test_insert_values() {
        let d = department();
        let context = InsertContext::new(d)
            .value(d.property("id").unwrap(), 50)
            .value(d.property("name").unwrap(), "RESEARCH")
            .value(d.property("location").unwrap(), Value::Null);
        let sql = InsertBuilder::new(&config(Dialect::Oracle), &context)
            .build(&no_comment)
            .unwrap();
        assert_eq!(
            sql.raw_sql(),
            "insert into department (id, name, location) values (:1, :2, :3)"
        );
        assert_eq!(sql.formatted_sql(), "insert into department (id, name, location) values (50, 'RESEARCH', null)");
    }

    #[test]
    fn test_insert_rejects_foreign_property() {
        let context =
            InsertContext::new(employee()).value(department().property("name").unwrap(), "X");
        let err = InsertBuilder::new(&config(Dialect::Oracle), &context)
            .build(&no_comment)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownEntity { .. }));
    }

    #[test]
    fn test_empty_insert_fails() {
        let context = InsertContext::new(employee());
        let err = InsertBuilder::new(&config(Dialect::Sqlite), &context)
            .build(&no_comment)
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }
}
