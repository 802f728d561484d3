//! Declarative statement descriptions.
//!
//! A context is filled in through its fluent methods and then handed, read-only,
//! to the matching builder. Each context describes exactly one statement.

use crate::criterion::{Criterion, Expression, Operand};
use crate::def::{EntityDef, PropertyDef};
use sqlcriteria_core::Value;

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `inner join`
    Inner,
    /// `left outer join`
    LeftOuter,
}

impl JoinKind {
    /// SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner join",
            JoinKind::LeftOuter => "left outer join",
        }
    }
}

/// A joined entity and its ON criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Join type
    pub kind: JoinKind,
    /// Joined entity
    pub entity: EntityDef,
    /// ON criteria, combined with `and`
    pub on: Vec<Criterion>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    /// Sorted expression
    pub expression: Expression,
    /// Direction
    pub order: SortOrder,
}

impl Expression {
    /// Ascending order on this expression.
    pub fn asc(self) -> OrderSpec {
        OrderSpec {
            expression: self,
            order: SortOrder::Asc,
        }
    }

    /// Descending order on this expression.
    pub fn desc(self) -> OrderSpec {
        OrderSpec {
            expression: self,
            order: SortOrder::Desc,
        }
    }
}

impl PropertyDef {
    /// Ascending order on this property.
    pub fn asc(self) -> OrderSpec {
        Expression::from(self).asc()
    }

    /// Descending order on this property.
    pub fn desc(self) -> OrderSpec {
        Expression::from(self).desc()
    }
}

/// Row locking for SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForUpdate {
    /// Fail instead of waiting for locked rows
    pub nowait: bool,
}

/// What a SELECT returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Projection {
    /// All properties of the base entity.
    #[default]
    Entity,
    /// All properties of the base entity followed by those of the listed joined entities.
    Entities(Vec<EntityDef>),
    /// An explicit expression list; an empty list renders `*`.
    Expressions(Vec<Expression>),
}

/// Description of a SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectContext {
    pub(crate) entity: EntityDef,
    pub(crate) distinct: bool,
    pub(crate) projection: Projection,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_criteria: Vec<Criterion>,
    pub(crate) group_by: Vec<PropertyDef>,
    pub(crate) having: Vec<Criterion>,
    pub(crate) order_by: Vec<OrderSpec>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) for_update: Option<ForUpdate>,
}

impl SelectContext {
    /// Select from `entity`.
    pub fn new(entity: EntityDef) -> Self {
        Self {
            entity,
            distinct: false,
            projection: Projection::Entity,
            joins: Vec::new(),
            where_criteria: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            for_update: None,
        }
    }

    /// Base entity.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Joins in rendering order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Add DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Project an explicit expression list.
    pub fn select<X: Into<Expression>>(mut self, expressions: impl IntoIterator<Item = X>) -> Self {
        self.projection =
            Projection::Expressions(expressions.into_iter().map(Into::into).collect());
        self
    }

    /// Project the base entity plus the given joined entities.
    pub fn select_entities(mut self, entities: impl IntoIterator<Item = EntityDef>) -> Self {
        self.projection = Projection::Entities(entities.into_iter().collect());
        self
    }

    /// Add an inner join.
    pub fn inner_join(self, entity: EntityDef, on: Vec<Criterion>) -> Self {
        self.join(JoinKind::Inner, entity, on)
    }

    /// Add a left outer join.
    pub fn left_join(self, entity: EntityDef, on: Vec<Criterion>) -> Self {
        self.join(JoinKind::LeftOuter, entity, on)
    }

    /// Add a join of the given kind.
    pub fn join(mut self, kind: JoinKind, entity: EntityDef, on: Vec<Criterion>) -> Self {
        self.joins.push(Join { kind, entity, on });
        self
    }

    /// Add a WHERE criterion; criteria are combined with `and`.
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.where_criteria.push(criterion);
        self
    }

    /// Add a GROUP BY property.
    pub fn group_by(mut self, property: PropertyDef) -> Self {
        self.group_by.push(property);
        self
    }

    /// Add a HAVING criterion; criteria are combined with `and`.
    pub fn having(mut self, criterion: Criterion) -> Self {
        self.having.push(criterion);
        self
    }

    /// Add an ORDER BY item. Items are rendered in insertion order, duplicates included.
    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        self.order_by.push(spec);
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Lock selected rows.
    pub fn for_update(mut self) -> Self {
        self.for_update = Some(ForUpdate { nowait: false });
        self
    }

    /// Lock selected rows without waiting.
    pub fn for_update_nowait(mut self) -> Self {
        self.for_update = Some(ForUpdate { nowait: true });
        self
    }
}

/// Description of a criteria UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateContext {
    pub(crate) entity: EntityDef,
    pub(crate) assignments: Vec<(PropertyDef, Operand)>,
    pub(crate) where_criteria: Vec<Criterion>,
}

impl UpdateContext {
    /// Update rows of `entity`.
    pub fn new(entity: EntityDef) -> Self {
        Self {
            entity,
            assignments: Vec::new(),
            where_criteria: Vec::new(),
        }
    }

    /// Target entity.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Assign a bound value.
    pub fn set(mut self, property: PropertyDef, value: impl Into<Value>) -> Self {
        self.assignments
            .push((property, Operand::Param(value.into())));
        self
    }

    /// Assign an expression, e.g. another column.
    pub fn set_expr(mut self, property: PropertyDef, expression: impl Into<Expression>) -> Self {
        self.assignments
            .push((property, Operand::Expr(expression.into())));
        self
    }

    /// Add a WHERE criterion.
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.where_criteria.push(criterion);
        self
    }
}

/// Description of a criteria DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContext {
    pub(crate) entity: EntityDef,
    pub(crate) where_criteria: Vec<Criterion>,
}

impl DeleteContext {
    /// Delete rows of `entity`.
    pub fn new(entity: EntityDef) -> Self {
        Self {
            entity,
            where_criteria: Vec::new(),
        }
    }

    /// Target entity.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Add a WHERE criterion.
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.where_criteria.push(criterion);
        self
    }
}

/// Description of a criteria INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertContext {
    pub(crate) entity: EntityDef,
    pub(crate) values: Vec<(PropertyDef, Operand)>,
}

impl InsertContext {
    /// Insert a row into `entity`.
    pub fn new(entity: EntityDef) -> Self {
        Self {
            entity,
            values: Vec::new(),
        }
    }

    /// Target entity.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Bind a value to a column.
    pub fn value(mut self, property: PropertyDef, value: impl Into<Value>) -> Self {
        self.values.push((property, Operand::Param(value.into())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{department, employee};

    #[test]
    fn test_fluent_select_keeps_declaration_order() {
        let e = employee();
        let d = department();
        let name = e.property("name").unwrap();
        let ctx = SelectContext::new(e)
            .left_join(d, vec![d.property("id").unwrap().eq_prop(e.property("departmentId").unwrap())])
            .inner_join(d.instance(1), vec![])
            .order_by(name.asc())
            .order_by(name.asc())
            .limit(10);

        assert_eq!(ctx.joins().len(), 2);
        assert_eq!(ctx.joins()[0].kind, JoinKind::LeftOuter);
        assert_eq!(ctx.joins()[1].entity, d.instance(1));
        assert_eq!(ctx.order_by.len(), 2);
        assert_eq!(ctx.limit, Some(10));
        assert_eq!(ctx.projection(), &Projection::Entity);
    }

    #[test]
    fn test_for_update_variants() {
        let ctx = SelectContext::new(employee()).for_update_nowait();
        assert_eq!(ctx.for_update, Some(ForUpdate { nowait: true }));
        assert_eq!(SortOrder::Desc.as_sql(), "desc");
        assert_eq!(JoinKind::Inner.as_sql(), "inner join");
    }
}
