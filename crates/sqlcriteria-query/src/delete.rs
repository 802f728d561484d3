//! Criteria DELETE statement builder.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::context::DeleteContext;
use crate::phase::{DeletePhase, PhasedRenderer};
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use crate::support::BuilderSupport;
use sqlcriteria_core::Result;

/// Renders a [`DeleteContext`].
#[derive(Debug)]
pub struct DeleteBuilder<'a> {
    config: &'a Config,
    context: &'a DeleteContext,
}

impl<'a> DeleteBuilder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config, context: &'a DeleteContext) -> Self {
        Self { config, context }
    }

    /// Render the statement.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let mut sql = PreparedSqlBuilder::new(
            SqlKind::Delete,
            self.config.dialect,
            self.config.sql_log_type,
        );
        let mut aliases = AliasManager::new();
        aliases.register(self.context.entity);
        let renderer = DeleteRenderer {
            support: BuilderSupport::new(self.config, &aliases),
            context: self.context,
        };
        renderer.render(&mut sql)?;
        Ok(sql.build(commenter))
    }
}

struct DeleteRenderer<'a, 'p> {
    support: BuilderSupport<'a, 'p>,
    context: &'a DeleteContext,
}

impl PhasedRenderer for DeleteRenderer<'_, '_> {
    type Phase = DeletePhase;
    const ORDER: &'static [DeletePhase] = DeletePhase::ORDER;

    fn render_phase(&self, phase: DeletePhase, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match phase {
            DeletePhase::Delete => {
                let entity = self.context.entity;
                sql.append_sql("delete ");
                if self.support.config().dialect.deletes_by_alias() {
                    sql.append_sql(self.support.alias(entity)?);
                    sql.append_sql(" ");
                }
                sql.append_sql("from ");
                sql.append_sql(&self.support.dml_target(entity)?);
            }
            DeletePhase::Where => {
                if !self.context.where_criteria.is_empty() {
                    sql.append_sql(" where ");
                    self.support.criteria(&self.context.where_criteria, sql)?;
                }
            }
        }
        Ok(())
    }
}
