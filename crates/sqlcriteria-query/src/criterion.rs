//! Predicate trees used in WHERE, HAVING and ON clauses.
//!
//! Leaves compare an [`Expression`] with an [`Operand`]; combinators nest
//! other criteria. Literal operands are never spliced into SQL text, they are
//! always bound as parameters.
//!
//! # Example
//!
//! ```ignore
//! let e = EntityDef::of::<Employee>();
//! let salary = e.property("salary")?;
//! let dept = e.property("departmentId")?;
//!
//! let criterion = Criterion::or(vec![salary.gt(1000), dept.eq(3)]);
//! ```

use crate::context::SelectContext;
use crate::def::PropertyDef;
use sqlcriteria_core::Value;

/// Comparison operators for binary criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl ComparisonOp {
    /// SQL operator text.
    pub const fn as_sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

/// Aggregate functions usable in projections and HAVING criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// `count`
    Count,
    /// `sum`
    Sum,
    /// `avg`
    Avg,
    /// `min`
    Min,
    /// `max`
    Max,
}

impl AggregateFunction {
    /// SQL function name.
    pub const fn as_sql(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

/// A column-valued expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A property column.
    Property(PropertyDef),
    /// An aggregate over a property, or `count(*)` when `argument` is `None`.
    Aggregate {
        /// Function to apply
        function: AggregateFunction,
        /// Aggregated property
        argument: Option<PropertyDef>,
    },
}

impl Expression {
    /// `count(*)`
    pub fn count_all() -> Self {
        Expression::Aggregate {
            function: AggregateFunction::Count,
            argument: None,
        }
    }

    /// `count(property)`
    pub fn count(property: PropertyDef) -> Self {
        Self::aggregate(AggregateFunction::Count, property)
    }

    /// `sum(property)`
    pub fn sum(property: PropertyDef) -> Self {
        Self::aggregate(AggregateFunction::Sum, property)
    }

    /// `avg(property)`
    pub fn avg(property: PropertyDef) -> Self {
        Self::aggregate(AggregateFunction::Avg, property)
    }

    /// `min(property)`
    pub fn min(property: PropertyDef) -> Self {
        Self::aggregate(AggregateFunction::Min, property)
    }

    /// `max(property)`
    pub fn max(property: PropertyDef) -> Self {
        Self::aggregate(AggregateFunction::Max, property)
    }

    fn aggregate(function: AggregateFunction, property: PropertyDef) -> Self {
        Expression::Aggregate {
            function,
            argument: Some(property),
        }
    }

    /// Properties this expression reads.
    pub fn property(&self) -> Option<PropertyDef> {
        match self {
            Expression::Property(p) => Some(*p),
            Expression::Aggregate { argument, .. } => *argument,
        }
    }

    fn compare(self, op: ComparisonOp, right: Operand) -> Criterion {
        Criterion::Compare {
            op,
            left: self,
            right,
        }
    }

    /// `self = ?`
    pub fn eq(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Eq, Operand::Param(value.into()))
    }

    /// `self <> ?`
    pub fn ne(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Ne, Operand::Param(value.into()))
    }

    /// `self < ?`
    pub fn lt(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Lt, Operand::Param(value.into()))
    }

    /// `self <= ?`
    pub fn le(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Le, Operand::Param(value.into()))
    }

    /// `self > ?`
    pub fn gt(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Gt, Operand::Param(value.into()))
    }

    /// `self >= ?`
    pub fn ge(self, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Ge, Operand::Param(value.into()))
    }
}

impl From<PropertyDef> for Expression {
    fn from(property: PropertyDef) -> Self {
        Expression::Property(property)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A bound parameter.
    Param(Value),
    /// Another column-valued expression.
    Expr(Expression),
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expr(expr)
    }
}

impl From<PropertyDef> for Operand {
    fn from(property: PropertyDef) -> Self {
        Operand::Expr(Expression::Property(property))
    }
}

/// Wildcard handling for LIKE criteria.
///
/// Every option except `None` escapes `%`, `_` and the escape character `$`
/// in the pattern and renders an `escape '$'` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeOption {
    /// Pattern used as given.
    #[default]
    None,
    /// Wildcards in the pattern match literally.
    Escape,
    /// Match values starting with the pattern.
    Prefix,
    /// Match values containing the pattern.
    Infix,
    /// Match values ending with the pattern.
    Suffix,
}

/// Escape character used by [`LikeOption`].
pub const LIKE_ESCAPE_CHAR: char = '$';

impl LikeOption {
    /// Apply the option to a raw pattern.
    pub fn apply(self, pattern: &str) -> String {
        match self {
            LikeOption::None => pattern.to_string(),
            LikeOption::Escape => escape_wildcards(pattern),
            LikeOption::Prefix => format!("{}%", escape_wildcards(pattern)),
            LikeOption::Infix => format!("%{}%", escape_wildcards(pattern)),
            LikeOption::Suffix => format!("%{}", escape_wildcards(pattern)),
        }
    }

    /// Whether an `escape` clause is rendered.
    pub const fn escapes(self) -> bool {
        !matches!(self, LikeOption::None)
    }
}

fn escape_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    for c in pattern.chars() {
        if c == LIKE_ESCAPE_CHAR || c == '%' || c == '_' {
            out.push(LIKE_ESCAPE_CHAR);
        }
        out.push(c);
    }
    out
}

/// A predicate or a boolean combination of predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `left op right`; comparing with a NULL parameter renders `is [not] null`.
    Compare {
        /// Comparison operator
        op: ComparisonOp,
        /// Left-hand expression
        left: Expression,
        /// Right-hand operand
        right: Operand,
    },
    /// `expr is null`
    IsNull(Expression),
    /// `expr is not null`
    IsNotNull(Expression),
    /// `prop [not] like ?`
    Like {
        /// Matched property
        left: PropertyDef,
        /// Raw pattern, before `option` is applied
        pattern: String,
        /// Wildcard handling
        option: LikeOption,
        /// Render `not like`
        negated: bool,
    },
    /// `prop between ? and ?`
    Between {
        /// Tested property
        left: PropertyDef,
        /// Lower bound
        start: Value,
        /// Upper bound
        end: Value,
    },
    /// `prop [not] in (?, ...)`
    In {
        /// Tested property
        left: PropertyDef,
        /// Candidate values
        values: Vec<Value>,
        /// Render `not in`
        negated: bool,
    },
    /// `prop [not] in (select ...)`
    InSelect {
        /// Tested property
        left: PropertyDef,
        /// Sub-select producing the candidates
        select: Box<SelectContext>,
        /// Render `not in`
        negated: bool,
    },
    /// `[not] exists (select ...)`
    Exists {
        /// Sub-select, may reference the outer statement's entities
        select: Box<SelectContext>,
        /// Render `not exists`
        negated: bool,
    },
    /// `(a and b ...)`
    And(Vec<Criterion>),
    /// `(a or b ...)`
    Or(Vec<Criterion>),
    /// `not (a and b ...)`
    Not(Vec<Criterion>),
}

impl Criterion {
    /// Conjunction of `criteria`.
    pub fn and(criteria: Vec<Criterion>) -> Self {
        Criterion::And(criteria)
    }

    /// Disjunction of `criteria`.
    pub fn or(criteria: Vec<Criterion>) -> Self {
        Criterion::Or(criteria)
    }

    /// Negated conjunction of `criteria`.
    pub fn not(criteria: Vec<Criterion>) -> Self {
        Criterion::Not(criteria)
    }

    /// `exists (select ...)`
    pub fn exists(select: SelectContext) -> Self {
        Criterion::Exists {
            select: Box::new(select),
            negated: false,
        }
    }

    /// `not exists (select ...)`
    pub fn not_exists(select: SelectContext) -> Self {
        Criterion::Exists {
            select: Box::new(select),
            negated: true,
        }
    }
}

impl PropertyDef {
    /// `self = ?`
    pub fn eq(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).eq(value)
    }

    /// `self <> ?`
    pub fn ne(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).ne(value)
    }

    /// `self < ?`
    pub fn lt(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).lt(value)
    }

    /// `self <= ?`
    pub fn le(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).le(value)
    }

    /// `self > ?`
    pub fn gt(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).gt(value)
    }

    /// `self >= ?`
    pub fn ge(self, value: impl Into<Value>) -> Criterion {
        Expression::from(self).ge(value)
    }

    /// `self = other`, comparing two columns.
    pub fn eq_prop(self, other: PropertyDef) -> Criterion {
        Expression::from(self).compare(ComparisonOp::Eq, other.into())
    }

    /// `self <> other`, comparing two columns.
    pub fn ne_prop(self, other: PropertyDef) -> Criterion {
        Expression::from(self).compare(ComparisonOp::Ne, other.into())
    }

    /// `self is null`
    pub fn is_null(self) -> Criterion {
        Criterion::IsNull(self.into())
    }

    /// `self is not null`
    pub fn is_not_null(self) -> Criterion {
        Criterion::IsNotNull(self.into())
    }

    /// `self like ?` with the pattern used as given.
    pub fn like(self, pattern: impl Into<String>) -> Criterion {
        self.like_with(pattern, LikeOption::None)
    }

    /// `self like ?` with wildcard handling.
    pub fn like_with(self, pattern: impl Into<String>, option: LikeOption) -> Criterion {
        Criterion::Like {
            left: self,
            pattern: pattern.into(),
            option,
            negated: false,
        }
    }

    /// `self not like ?` with wildcard handling.
    pub fn not_like(self, pattern: impl Into<String>, option: LikeOption) -> Criterion {
        Criterion::Like {
            left: self,
            pattern: pattern.into(),
            option,
            negated: true,
        }
    }

    /// `self between ? and ?`
    pub fn between(self, start: impl Into<Value>, end: impl Into<Value>) -> Criterion {
        Criterion::Between {
            left: self,
            start: start.into(),
            end: end.into(),
        }
    }

    /// `self in (?, ...)`
    pub fn in_list<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Criterion {
        Criterion::In {
            left: self,
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `self not in (?, ...)`
    pub fn not_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Criterion {
        Criterion::In {
            left: self,
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// `self in (select ...)`
    pub fn in_select(self, select: SelectContext) -> Criterion {
        Criterion::InSelect {
            left: self,
            select: Box::new(select),
            negated: false,
        }
    }

    /// `self not in (select ...)`
    pub fn not_in_select(self, select: SelectContext) -> Criterion {
        Criterion::InSelect {
            left: self,
            select: Box::new(select),
            negated: true,
        }
    }
}
