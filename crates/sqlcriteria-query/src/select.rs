//! SELECT statement builder.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::context::{Projection, SelectContext};
use crate::dialect::PagingStyle;
use crate::phase::{PhasedRenderer, SelectPhase};
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use crate::support::{BuilderSupport, COMMA};
use sqlcriteria_core::Result;

/// Renders a [`SelectContext`].
///
/// # Example
///
/// ```ignore
/// let e = EntityDef::of::<Employee>();
/// let context = SelectContext::new(e)
///     .filter(e.property("salary")?.gt(1000))
///     .order_by(e.property("name")?.asc());
/// let sql = SelectBuilder::new(&config, &context).build(&no_comment)?;
/// ```
#[derive(Debug)]
pub struct SelectBuilder<'a> {
    config: &'a Config,
    context: &'a SelectContext,
}

impl<'a> SelectBuilder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config, context: &'a SelectContext) -> Self {
        Self { config, context }
    }

    /// Render the statement.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let mut sql = PreparedSqlBuilder::new(
            SqlKind::Select,
            self.config.dialect,
            self.config.sql_log_type,
        );
        render_select(self.config, self.context, AliasManager::new(), &mut sql)?;
        Ok(sql.build(commenter))
    }
}

/// Render a select into `sql` using `aliases` as its alias scope.
///
/// The base entity and the joins are registered before any clause is
/// rendered, so criteria may reference any of them regardless of position.
pub(crate) fn render_select(
    config: &Config,
    context: &SelectContext,
    mut aliases: AliasManager<'_>,
    sql: &mut PreparedSqlBuilder,
) -> Result<()> {
    aliases.register(context.entity);
    for join in &context.joins {
        aliases.register(join.entity);
    }
    let renderer = SelectRenderer {
        support: BuilderSupport::new(config, &aliases),
        context,
    };
    renderer.render(sql)
}

struct SelectRenderer<'a, 'p> {
    support: BuilderSupport<'a, 'p>,
    context: &'a SelectContext,
}

impl PhasedRenderer for SelectRenderer<'_, '_> {
    type Phase = SelectPhase;
    const ORDER: &'static [SelectPhase] = SelectPhase::ORDER;

    fn render_phase(&self, phase: SelectPhase, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match phase {
            SelectPhase::Select => self.select(sql),
            SelectPhase::From => self.from(sql),
            SelectPhase::Where => self.where_clause(sql),
            SelectPhase::GroupBy => self.group_by(sql),
            SelectPhase::Having => self.having(sql),
            SelectPhase::OrderBy => self.order_by(sql),
            SelectPhase::Limit => self.limit(sql),
            SelectPhase::Offset => self.offset(sql),
            SelectPhase::ForUpdate => self.for_update(sql),
        }
    }
}

impl SelectRenderer<'_, '_> {
    fn select(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        sql.append_sql("select ");
        if self.context.distinct {
            sql.append_sql("distinct ");
        }
        let mut properties = Vec::new();
        match &self.context.projection {
            Projection::Entity => properties.extend(self.context.entity.properties()),
            Projection::Entities(joined) => {
                properties.extend(self.context.entity.properties());
                for entity in joined {
                    properties.extend(entity.properties());
                }
            }
            Projection::Expressions(expressions) => {
                if expressions.is_empty() {
                    sql.append_sql("*");
                    return Ok(());
                }
                for expr in expressions {
                    self.support.expression(expr, sql)?;
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                return Ok(());
            }
        }
        if properties.is_empty() {
            sql.append_sql("*");
            return Ok(());
        }
        for property in properties {
            sql.append_sql(&self.support.column(property)?);
            sql.append_sql(COMMA);
        }
        sql.cut_back_sql(COMMA.len());
        Ok(())
    }

    fn from(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        sql.append_sql(" from ");
        sql.append_sql(&self.support.aliased_table(self.context.entity)?);
        for join in &self.context.joins {
            sql.append_sql(" ");
            sql.append_sql(join.kind.as_sql());
            sql.append_sql(" ");
            sql.append_sql(&self.support.aliased_table(join.entity)?);
            if !join.on.is_empty() {
                sql.append_sql(" on (");
                self.support.criteria(&join.on, sql)?;
                sql.append_sql(")");
            }
        }
        Ok(())
    }

    fn where_clause(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        if !self.context.where_criteria.is_empty() {
            sql.append_sql(" where ");
            self.support.criteria(&self.context.where_criteria, sql)?;
        }
        Ok(())
    }

    fn group_by(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        if !self.context.group_by.is_empty() {
            sql.append_sql(" group by ");
            for property in &self.context.group_by {
                sql.append_sql(&self.support.column(*property)?);
                sql.append_sql(COMMA);
            }
            sql.cut_back_sql(COMMA.len());
        }
        Ok(())
    }

    fn having(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        if !self.context.having.is_empty() {
            sql.append_sql(" having ");
            self.support.criteria(&self.context.having, sql)?;
        }
        Ok(())
    }

    fn order_by(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        if !self.context.order_by.is_empty() {
            sql.append_sql(" order by ");
            for spec in &self.context.order_by {
                self.support.expression(&spec.expression, sql)?;
                sql.append_sql(" ");
                sql.append_sql(spec.order.as_sql());
                sql.append_sql(COMMA);
            }
            sql.cut_back_sql(COMMA.len());
        }
        Ok(())
    }

    fn limit(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        let dialect = self.support.config().dialect;
        if dialect.paging_style() != PagingStyle::LimitOffset {
            return Ok(());
        }
        match (self.context.limit, self.context.offset) {
            (Some(limit), _) => {
                sql.append_sql(&format!(" limit {}", limit));
            }
            (None, Some(_)) => {
                if let Some(unbounded) = dialect.unbounded_limit() {
                    sql.append_sql(&format!(" limit {}", unbounded));
                }
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn offset(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        let dialect = self.support.config().dialect;
        match dialect.paging_style() {
            PagingStyle::LimitOffset => {
                if let Some(offset) = self.context.offset {
                    sql.append_sql(&format!(" offset {}", offset));
                }
            }
            PagingStyle::OffsetFetch => {
                if self.context.limit.is_none() && self.context.offset.is_none() {
                    return Ok(());
                }
                if dialect.paging_requires_order_by() && self.context.order_by.is_empty() {
                    return Err(dialect.unsupported("paging without order by"));
                }
                sql.append_sql(&format!(
                    " offset {} rows",
                    self.context.offset.unwrap_or(0)
                ));
                if let Some(limit) = self.context.limit {
                    sql.append_sql(&format!(" fetch first {} rows only", limit));
                }
            }
        }
        Ok(())
    }

    fn for_update(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        let Some(for_update) = self.context.for_update else {
            return Ok(());
        };
        let dialect = self.support.config().dialect;
        if !dialect.supports_for_update() {
            return Err(dialect.unsupported("for update"));
        }
        let paged = self.context.limit.is_some() || self.context.offset.is_some();
        if paged && !dialect.supports_for_update_with_paging() {
            return Err(dialect.unsupported("for update with paging"));
        }
        sql.append_sql(" for update");
        if for_update.nowait {
            sql.append_sql(" nowait");
        }
        Ok(())
    }
}
