use std::fmt;

use crate::ast::{AggregateFunc, ArithmeticOp, ComparatorOp, Literal, MutationOp};

/// Operator tree for every position of a query: filters, join conditions,
/// group keys, projections, order terms, pagination and update clauses.
///
/// Relation indices are positional: `0` is the query source, `1..` are the
/// joined sources in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Positional placeholder bound from the parameter vector.
    Param(usize),
    /// Contiguous run of parameters pinned as a literal list.
    ParamSlice { start: usize, len: usize },
    Field { relation: usize, name: String },
    /// The whole matched row of a relation.
    Entity(usize),
    Compare { left: Box<Expr>, op: ComparatorOp, right: Box<Expr> },
    Arithmetic { left: Box<Expr>, op: ArithmeticOp, right: Box<Expr> },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    In { expr: Box<Expr>, list: Box<Expr> },
    IsNull(Box<Expr>),
    Like { expr: Box<Expr>, pattern: Box<Expr>, case_insensitive: bool },
    Aggregate { func: AggregateFunc, arg: Box<Expr>, distinct: bool },
    Mutation { op: MutationOp, field: String, value: Box<Expr> },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
}

impl Expr {
    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn field(relation: usize, name: &str) -> Self {
        Expr::Field { relation, name: name.to_string() }
    }

    pub fn compare(left: Expr, op: ComparatorOp, right: Expr) -> Self {
        Expr::Compare { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::compare(left, ComparatorOp::Eq, right)
    }

    pub fn arithmetic(left: Expr, op: ArithmeticOp, right: Expr) -> Self {
        Expr::Arithmetic { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    pub fn is_in(expr: Expr, list: Expr) -> Self {
        Expr::In { expr: Box::new(expr), list: Box::new(list) }
    }

    pub fn is_null(expr: Expr) -> Self {
        Expr::IsNull(Box::new(expr))
    }

    pub fn like(expr: Expr, pattern: Expr) -> Self {
        Expr::Like { expr: Box::new(expr), pattern: Box::new(pattern), case_insensitive: false }
    }

    pub fn ilike(expr: Expr, pattern: Expr) -> Self {
        Expr::Like { expr: Box::new(expr), pattern: Box::new(pattern), case_insensitive: true }
    }

    pub fn aggregate(func: AggregateFunc, arg: Expr) -> Self {
        Expr::Aggregate { func, arg: Box::new(arg), distinct: false }
    }

    pub fn count(arg: Expr) -> Self {
        Self::aggregate(AggregateFunc::Count, arg)
    }

    pub fn count_distinct(arg: Expr) -> Self {
        Expr::Aggregate { func: AggregateFunc::Count, arg: Box::new(arg), distinct: true }
    }

    pub fn mutation(op: MutationOp, field: &str, value: Expr) -> Self {
        Expr::Mutation { op, field: field.to_string(), value: Box::new(value) }
    }

    /// The literal `true` join condition, meaning "join by the declared association".
    pub fn is_trivial(&self) -> bool {
        matches!(self, Expr::Literal(Literal::Bool(true)))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Expr::Entity(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expr::Aggregate { .. })
    }

    /// True when an aggregate call appears anywhere in the tree.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Expr::Aggregate { .. } => true,
            Expr::Literal(_)
            | Expr::Param(_)
            | Expr::ParamSlice { .. }
            | Expr::Field { .. }
            | Expr::Entity(_) => false,
            Expr::Compare { left, right, .. } | Expr::Arithmetic { left, right, .. } => {
                left.contains_aggregate() || right.contains_aggregate()
            }
            Expr::And(v) | Expr::Or(v) | Expr::Tuple(v) | Expr::List(v) => v.iter().any(Expr::contains_aggregate),
            Expr::Not(e) | Expr::IsNull(e) => e.contains_aggregate(),
            Expr::In { expr, list } => expr.contains_aggregate() || list.contains_aggregate(),
            Expr::Like { expr, pattern, .. } => expr.contains_aggregate() || pattern.contains_aggregate(),
            Expr::Mutation { value, .. } => value.contains_aggregate(),
            Expr::Map(entries) => entries.iter().any(|(_, e)| e.contains_aggregate()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(l) => write!(f, "{}", l),
            Expr::Param(i) => write!(f, "?{}", i),
            Expr::ParamSlice { start, len } => write!(f, "?[{}..{}]", start, start + len),
            Expr::Field { relation, name } => write!(f, "${}.{}", relation, name),
            Expr::Entity(relation) => write!(f, "${}", relation),
            Expr::Compare { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Arithmetic { left, op, right } => write!(f, "({} {:?} {})", left, op, right),
            Expr::And(v) => write_joined(f, "and", v),
            Expr::Or(v) => write_joined(f, "or", v),
            Expr::Not(e) => write!(f, "not {}", e),
            Expr::In { expr, list } => write!(f, "({} in {})", expr, list),
            Expr::IsNull(e) => write!(f, "is_nil({})", e),
            Expr::Like { expr, pattern, case_insensitive } => {
                let op = if *case_insensitive { "ilike" } else { "like" };
                write!(f, "{}({}, {})", op, expr, pattern)
            }
            Expr::Aggregate { func, arg, distinct } => {
                if *distinct {
                    write!(f, "{}(distinct {})", func.name(), arg)
                } else {
                    write!(f, "{}({})", func.name(), arg)
                }
            }
            Expr::Mutation { op, field, value } => write!(f, "{}({}, {})", op.name(), field, value),
            Expr::Tuple(v) => write_joined(f, ",", v),
            Expr::List(v) => write_joined(f, ",", v),
            Expr::Map(entries) => {
                write!(f, "%{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, sep: &str, items: &[Expr]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 { write!(f, " {} ", sep)?; }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}
