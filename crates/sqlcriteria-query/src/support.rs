//! Rendering shared by all statement builders: names, expressions, criteria.

use crate::alias::AliasManager;
use crate::config::Config;
use crate::context::SelectContext;
use crate::criterion::{ComparisonOp, Criterion, Expression, LIKE_ESCAPE_CHAR, Operand};
use crate::def::{EntityDef, PropertyDef};
use crate::prepared::PreparedSqlBuilder;
use crate::select::render_select;
use sqlcriteria_core::{Error, Result, Value};

const AND: &str = " and ";
const OR: &str = " or ";
pub(crate) const COMMA: &str = ", ";

/// Renders names and predicates against one statement's aliases.
pub(crate) struct BuilderSupport<'a, 'p> {
    config: &'a Config,
    aliases: &'a AliasManager<'p>,
}

impl<'a, 'p> BuilderSupport<'a, 'p> {
    pub(crate) fn new(config: &'a Config, aliases: &'a AliasManager<'p>) -> Self {
        Self { config, aliases }
    }

    pub(crate) fn config(&self) -> &'a Config {
        self.config
    }

    pub(crate) fn table(&self, entity: EntityDef) -> Result<String> {
        self.config.naming.table_name_for(entity.meta())
    }

    /// `TABLE alias`
    pub(crate) fn aliased_table(&self, entity: EntityDef) -> Result<String> {
        let alias = self
            .aliases
            .lookup(entity)
            .ok_or_else(|| Error::Structure(format!("entity `{}` has no alias", entity.name())))?;
        Ok(format!("{} {}", self.table(entity)?, alias))
    }

    /// Aliased target of a criteria UPDATE or DELETE.
    pub(crate) fn dml_target(&self, entity: EntityDef) -> Result<String> {
        if self.config.dialect.dml_alias_needs_as() {
            Ok(format!("{} as {}", self.table(entity)?, self.alias(entity)?))
        } else {
            self.aliased_table(entity)
        }
    }

    pub(crate) fn alias(&self, entity: EntityDef) -> Result<&'a str> {
        self.aliases
            .lookup(entity)
            .ok_or_else(|| Error::Structure(format!("entity `{}` has no alias", entity.name())))
    }

    /// Unqualified column name.
    pub(crate) fn column_name(&self, property: PropertyDef) -> Result<String> {
        self.config.naming.column_name_for(property.info())
    }

    /// `alias.COLUMN`
    pub(crate) fn column(&self, property: PropertyDef) -> Result<String> {
        let alias = self.aliases.alias_for(property)?;
        Ok(format!("{}.{}", alias, self.column_name(property)?))
    }

    pub(crate) fn expression(&self, expr: &Expression, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match expr {
            Expression::Property(property) => {
                sql.append_sql(&self.column(*property)?);
            }
            Expression::Aggregate { function, argument } => {
                sql.append_sql(function.as_sql());
                sql.append_sql("(");
                match argument {
                    Some(property) => sql.append_sql(&self.column(*property)?),
                    None => sql.append_sql("*"),
                };
                sql.append_sql(")");
            }
        }
        Ok(())
    }

    pub(crate) fn operand(&self, operand: &Operand, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match operand {
            Operand::Param(value) => {
                sql.append_param(value.clone());
                Ok(())
            }
            Operand::Expr(expr) => self.expression(expr, sql),
        }
    }

    /// Criteria joined with `and`; renders nothing for an empty list.
    pub(crate) fn criteria(&self, criteria: &[Criterion], sql: &mut PreparedSqlBuilder) -> Result<()> {
        self.joined(criteria, AND, sql)
    }

    fn joined(&self, criteria: &[Criterion], separator: &str, sql: &mut PreparedSqlBuilder) -> Result<()> {
        if criteria.is_empty() {
            return Ok(());
        }
        for criterion in criteria {
            self.criterion(criterion, sql)?;
            sql.append_sql(separator);
        }
        sql.cut_back_sql(separator.len());
        Ok(())
    }

    fn combinator(
        &self,
        name: &str,
        prefix: &str,
        children: &[Criterion],
        separator: &str,
        sql: &mut PreparedSqlBuilder,
    ) -> Result<()> {
        if children.is_empty() {
            return Err(Error::Structure(format!("`{}` requires at least one criterion", name)));
        }
        sql.append_sql(prefix);
        sql.append_sql("(");
        self.joined(children, separator, sql)?;
        sql.append_sql(")");
        Ok(())
    }

    pub(crate) fn criterion(&self, criterion: &Criterion, sql: &mut PreparedSqlBuilder) -> Result<()> {
        match criterion {
            Criterion::Compare { op, left, right } => {
                self.expression(left, sql)?;
                match (op, right) {
                    (ComparisonOp::Eq, Operand::Param(Value::Null)) => {
                        sql.append_sql(" is null");
                    }
                    (ComparisonOp::Ne, Operand::Param(Value::Null)) => {
                        sql.append_sql(" is not null");
                    }
                    _ => {
                        sql.append_sql(" ");
                        sql.append_sql(op.as_sql());
                        sql.append_sql(" ");
                        self.operand(right, sql)?;
                    }
                }
            }
            Criterion::IsNull(expr) => {
                self.expression(expr, sql)?;
                sql.append_sql(" is null");
            }
            Criterion::IsNotNull(expr) => {
                self.expression(expr, sql)?;
                sql.append_sql(" is not null");
            }
            Criterion::Like {
                left,
                pattern,
                option,
                negated,
            } => {
                sql.append_sql(&self.column(*left)?);
                sql.append_sql(if *negated { " not like " } else { " like " });
                sql.append_param(Value::Text(option.apply(pattern)));
                if option.escapes() {
                    sql.append_sql(&format!(" escape '{}'", LIKE_ESCAPE_CHAR));
                }
            }
            Criterion::Between { left, start, end } => {
                sql.append_sql(&self.column(*left)?);
                sql.append_sql(" between ");
                sql.append_param(start.clone());
                sql.append_sql(" and ");
                sql.append_param(end.clone());
            }
            Criterion::In {
                left,
                values,
                negated,
            } => {
                let column = self.column(*left)?;
                if values.is_empty() {
                    sql.append_sql(if *negated { "1 = 1" } else { "1 = 0" });
                    return Ok(());
                }
                sql.append_sql(&column);
                sql.append_sql(if *negated { " not in (" } else { " in (" });
                for value in values {
                    sql.append_param(value.clone());
                    sql.append_sql(COMMA);
                }
                sql.cut_back_sql(COMMA.len());
                sql.append_sql(")");
            }
            Criterion::InSelect {
                left,
                select,
                negated,
            } => {
                sql.append_sql(&self.column(*left)?);
                sql.append_sql(if *negated { " not in (" } else { " in (" });
                self.sub_select(select, sql)?;
                sql.append_sql(")");
            }
            Criterion::Exists { select, negated } => {
                sql.append_sql(if *negated { "not exists (" } else { "exists (" });
                self.sub_select(select, sql)?;
                sql.append_sql(")");
            }
            Criterion::And(children) => self.combinator("and", "", children, AND, sql)?,
            Criterion::Or(children) => self.combinator("or", "", children, OR, sql)?,
            Criterion::Not(children) => self.combinator("not", "not ", children, AND, sql)?,
        }
        Ok(())
    }

    fn sub_select(&self, context: &SelectContext, sql: &mut PreparedSqlBuilder) -> Result<()> {
        render_select(self.config, context, AliasManager::child(self.aliases), sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::LikeOption;
    use crate::dialect::Dialect;
    use crate::prepared::{SqlKind, SqlLogType};
    use crate::testing::{config, department, employee};

    fn render(criterion: &Criterion) -> Result<(String, Vec<Value>)> {
        let config = config(Dialect::Postgres);
        let mut aliases = AliasManager::new();
        aliases.register(employee());
        let support = BuilderSupport::new(&config, &aliases);
        let mut sql = PreparedSqlBuilder::new(SqlKind::Select, config.dialect, SqlLogType::None);
        support.criterion(criterion, &mut sql)?;
        let prepared = sql.build(&crate::prepared::no_comment);
        Ok((prepared.raw_sql().to_string(), prepared.params().to_vec()))
    }

    #[test]
    fn test_nested_combinators_number_params_left_to_right() {
        let e = employee();
        let salary = e.property("salary").unwrap();
        let name = e.property("name").unwrap();
        let criterion = Criterion::or(vec![
            salary.between(100, 200),
            Criterion::not(vec![name.eq("SMITH"), salary.ne(0)]),
        ]);
        let (sql, params) = render(&criterion).unwrap();
        assert_eq!(
            sql,
            "(t0_.salary between $1 and $2 or not (t0_.name = $3 and t0_.salary <> $4))"
        );
        assert_eq!(
            params,
            vec![Value::Int(100), Value::Int(200), Value::from("SMITH"), Value::Int(0)]
        );
    }

    #[test]
    fn test_null_comparison_binds_nothing() {
        let dept = employee().property("departmentId").unwrap();
        let (sql, params) = render(&dept.eq(Value::Null)).unwrap();
        assert_eq!(sql, "t0_.department_id is null");
        assert!(params.is_empty());
        let (sql, _) = render(&dept.ne(None::<i64>)).unwrap();
        assert_eq!(sql, "t0_.department_id is not null");
    }

    #[test]
    fn test_empty_in_lists() {
        let id = employee().property("id").unwrap();
        let (sql, params) = render(&id.in_list(Vec::<i64>::new())).unwrap();
        assert_eq!(sql, "1 = 0");
        assert!(params.is_empty());
        let (sql, _) = render(&id.not_in(Vec::<i64>::new())).unwrap();
        assert_eq!(sql, "1 = 1");
        let (sql, params) = render(&id.in_list([1_i64, 2, 3])).unwrap();
        assert_eq!(sql, "t0_.id in ($1, $2, $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_like_with_escape() {
        let name = employee().property("name").unwrap();
        let (sql, params) = render(&name.like_with("10%", LikeOption::Prefix)).unwrap();
        assert_eq!(sql, "t0_.name like $1 escape '$'");
        assert_eq!(params, vec![Value::from("10$%%")]);
    }

    #[test]
    fn test_empty_combinator_is_structural_error() {
        let err = render(&Criterion::and(vec![])).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_unregistered_entity_is_rejected() {
        let criterion = department().property("name").unwrap().eq("SALES");
        let err = render(&criterion).unwrap_err();
        assert!(matches!(err, Error::UnknownEntity { .. }));
    }
}
