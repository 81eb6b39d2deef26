use crate::ast::{Expr, Join, OrderBy, Source};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Distinct {
    #[default]
    Off,
    Flag(bool),
    /// Deduplicate by an arbitrary expression; rejected at translation time.
    Expr(Expr),
}

/// A relational query as handed over by the query-building layer.
///
/// Clauses are applied in a fixed order regardless of how the value was built:
/// source, joins, filters, group by, having, order by, offset, limit,
/// projection, distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub source: Source,
    pub joins: Vec<Join>,
    pub filters: Vec<Expr>,
    pub group_keys: Vec<Expr>,
    pub having_filters: Vec<Expr>,
    pub order_terms: Vec<OrderBy>,
    pub offset: Option<Expr>,
    pub limit: Option<Expr>,
    pub projection: Expr,
    pub distinct: Distinct,
    /// Relation indices spliced into the output right after the entity slot.
    pub preloads: Vec<usize>,
}

impl Query {
    /// `SELECT <entity> FROM source`
    pub fn from(source: Source) -> Self {
        Self {
            source,
            joins: vec![],
            filters: vec![],
            group_keys: vec![],
            having_filters: vec![],
            order_terms: vec![],
            offset: None,
            limit: None,
            projection: Expr::Entity(0),
            distinct: Distinct::Off,
            preloads: vec![],
        }
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.filters.push(expr);
        self
    }

    pub fn group_by(mut self, key: Expr) -> Self {
        self.group_keys.push(key);
        self
    }

    pub fn having(mut self, expr: Expr) -> Self {
        self.having_filters.push(expr);
        self
    }

    pub fn order_by(mut self, term: OrderBy) -> Self {
        self.order_terms.push(term);
        self
    }

    pub fn offset(mut self, expr: Expr) -> Self {
        self.offset = Some(expr);
        self
    }

    pub fn limit(mut self, expr: Expr) -> Self {
        self.limit = Some(expr);
        self
    }

    pub fn select(mut self, projection: Expr) -> Self {
        self.projection = projection;
        self
    }

    pub fn distinct(mut self, distinct: Distinct) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn preload(mut self, relation: usize) -> Self {
        self.preloads.push(relation);
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_keys.is_empty()
    }
}
