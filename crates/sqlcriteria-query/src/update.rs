//! Criteria UPDATE statement builder.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::context::UpdateContext;
use crate::phase::{PhasedRenderer, UpdatePhase};
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use crate::support::{BuilderSupport, COMMA};
use sqlcriteria_core::{Error, Result};

/// Renders an [`UpdateContext`].
#[derive(Debug)]
pub struct UpdateBuilder<'a> {
    config: &'a Config,
    context: &'a UpdateContext,
}

impl<'a> UpdateBuilder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config, context: &'a UpdateContext) -> Self {
        Self { config, context }
    }

    /// Render the statement. An update without assignments is a structural
    /// error, and every assigned property must belong to the updated entity.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        if self.context.assignments.is_empty() {
            return Err(Error::Structure(format!(
                "update of `{}` has no assignments",
                self.context.entity.name()
            )));
        }
        if let Some((foreign, _)) = self
            .context
            .assignments
            .iter()
            .find(|(p, _)| p.entity() != self.context.entity)
        {
            return Err(Error::UnknownEntity {
                entity: foreign.entity().name().to_string(),
                property: foreign.name().to_string(),
            });
        }
        let mut sql = PreparedSqlBuilder::new(
            SqlKind::Update,
            self.config.dialect,
            self.config.sql_log_type,
        );
        let mut aliases = AliasManager::new();
        aliases.register(self.context.entity);
        let renderer = UpdateRenderer {
            support: BuilderSupport::new(self.config, &aliases),
            context: self.context,
        };
        renderer.render(&mut sql)?;
        Ok(sql.build(commenter))
    }
}

struct UpdateRenderer<'a, 'p> {
    support: BuilderSupport<'a, 'p>,
    context: &'a UpdateContext,
}

impl PhasedRenderer for UpdateRenderer<'_, '_> {
    type Phase = UpdatePhase;
    const ORDER: &'static [UpdatePhase] = UpdatePhase::ORDER;

    fn render_phase(&self, phase: UpdatePhase, sql: &mut PreparedSqlBuilder) -> Result<()> {
        let entity = self.context.entity;
        let by_alias = self.support.config().dialect.updates_by_alias();
        match phase {
            UpdatePhase::Update => {
                sql.append_sql("update ");
                if by_alias {
                    sql.append_sql(self.support.alias(entity)?);
                } else {
                    sql.append_sql(&self.support.dml_target(entity)?);
                }
            }
            UpdatePhase::Set => {
                sql.append_sql(" set ");
                for (property, operand) in &self.context.assignments {
                    sql.append_sql(&self.support.column_name(*property)?);
                    sql.append_sql(" = ");
                    self.support.operand(operand, sql)?;
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
            }
            UpdatePhase::From => {
                if by_alias {
                    sql.append_sql(" from ");
                    sql.append_sql(&self.support.aliased_table(entity)?);
                }
            }
            UpdatePhase::Where => {
                if !self.context.where_criteria.is_empty() {
                    sql.append_sql(" where ");
                    self.support.criteria(&self.context.where_criteria, sql)?;
                }
            }
        }
        Ok(())
    }
}
