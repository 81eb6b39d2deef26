use serde_json::Value;
use tracing::trace;

use crate::{
    ast::{Direction, Distinct, Expr, Join, OrderBy, Query, Source},
    config::Config,
    planner::Pipeline,
    schema::{RelationshipIndex, SchemaProvider},
    term::{Term, VarGen},
    translator::{Evaluator, JoinResolver, ProjectionBuilder, TranslateError},
};

/// Applies every clause of a query, always in the same order:
/// source, joins, filters, group by, having, order by, offset, limit,
/// projection, distinct.
pub struct PlanBuilder<'a> {
    config: &'a Config,
    joins: JoinResolver<'a>,
    eval: Evaluator<'a>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        config: &'a Config,
        schemas: &'a dyn SchemaProvider,
        relationships: &'a RelationshipIndex,
        params: &'a [Value],
        vars: &'a VarGen,
    ) -> Self {
        Self {
            config,
            joins: JoinResolver::new(schemas, relationships, config),
            eval: Evaluator::new(params, vars),
        }
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.eval
    }

    pub fn build(&self, query: &Query) -> Result<Pipeline, TranslateError> {
        // Fail before building anything when distinct cannot be honored.
        if let Distinct::Expr(expr) = &query.distinct {
            return Err(TranslateError::UnsupportedDistinctExpression(expr.to_string()));
        }

        let pipeline = self.apply_source(&query.source);
        let pipeline = self.apply_joins(pipeline, &query.joins)?;
        let pipeline = self.apply_filters(pipeline, &query.filters)?;
        let pipeline = self.apply_group_by(pipeline, &query.group_keys)?;
        let pipeline = self.apply_having(pipeline, &query.having_filters)?;
        let pipeline = self.apply_order_by(pipeline, &query.order_terms)?;
        let pipeline = self.apply_offset(pipeline, query.offset.as_ref())?;
        let pipeline = self.apply_limit(pipeline, query.limit.as_ref())?;
        let pipeline = self.apply_projection(pipeline, &query.projection, &query.preloads)?;
        self.apply_distinct(pipeline, &query.distinct)
    }

    pub fn apply_source(&self, source: &Source) -> Pipeline {
        Pipeline::new(Term::table(self.config.database(), &source.table), source.schema.clone())
    }

    pub fn apply_joins(&self, mut pipeline: Pipeline, joins: &[Join]) -> Result<Pipeline, TranslateError> {
        for join in joins {
            let width = pipeline.width();
            trace!(table = %join.source.table, relation = width, "join");
            pipeline.term = self.joins.apply(pipeline.term, width, &pipeline.relations, join, &self.eval)?;
            pipeline.relations.push(join.source.schema.clone());
        }
        Ok(pipeline)
    }

    pub fn apply_filters(&self, pipeline: Pipeline, filters: &[Expr]) -> Result<Pipeline, TranslateError> {
        if filters.is_empty() {
            return Ok(pipeline);
        }
        trace!(count = filters.len(), "where");
        let conjunction = Expr::And(filters.to_vec());
        let predicate = self
            .eval
            .vars()
            .lambda(|row| self.eval.eval(&conjunction, &pipeline.element_context(row)))?;
        Ok(pipeline.map_term(|t| t.filter(predicate)))
    }

    /// The group key is always an array, so key `i` reads `group[i]`.
    pub fn apply_group_by(&self, pipeline: Pipeline, keys: &[Expr]) -> Result<Pipeline, TranslateError> {
        if keys.is_empty() {
            return Ok(pipeline);
        }
        trace!(keys = keys.len(), "group by");
        let key_tuple = Expr::List(keys.to_vec());
        let key_fn = self
            .eval
            .vars()
            .lambda(|row| self.eval.eval(&key_tuple, &pipeline.element_context(row)))?;
        let mut pipeline = pipeline.map_term(|t| t.group(key_fn).ungroup());
        pipeline.group_keys = keys.to_vec();
        Ok(pipeline)
    }

    pub fn apply_having(&self, pipeline: Pipeline, having: &[Expr]) -> Result<Pipeline, TranslateError> {
        if having.is_empty() {
            return Ok(pipeline);
        }
        if !pipeline.is_grouped() {
            return Err(TranslateError::UnrecognizedExpression("having requires group_by".to_string()));
        }
        trace!(count = having.len(), "having");
        let conjunction = Expr::And(having.to_vec());
        let predicate = self
            .eval
            .vars()
            .lambda(|bucket| self.eval.eval(&conjunction, &pipeline.element_context(bucket)))?;
        Ok(pipeline.map_term(|t| t.filter(predicate)))
    }

    pub fn apply_order_by(&self, pipeline: Pipeline, terms: &[OrderBy]) -> Result<Pipeline, TranslateError> {
        if terms.is_empty() {
            return Ok(pipeline);
        }
        trace!(count = terms.len(), "order by");
        let mut keys = Vec::with_capacity(terms.len());
        for term in terms {
            let key = self
                .eval
                .vars()
                .lambda(|element| self.eval.eval(&term.expr, &pipeline.element_context(element)))?;
            keys.push(match term.direction {
                Direction::Asc => Term::asc(key),
                Direction::Desc => Term::desc(key),
            });
        }
        Ok(pipeline.map_term(|t| t.order_by(keys)))
    }

    pub fn apply_offset(&self, pipeline: Pipeline, offset: Option<&Expr>) -> Result<Pipeline, TranslateError> {
        let Some(offset) = offset else { return Ok(pipeline) };
        let n = self.eval.eval_count(offset, "offset")?;
        Ok(pipeline.map_term(|t| t.skip(n)))
    }

    pub fn apply_limit(&self, pipeline: Pipeline, limit: Option<&Expr>) -> Result<Pipeline, TranslateError> {
        let Some(limit) = limit else { return Ok(pipeline) };
        let n = self.eval.eval_count(limit, "limit")?;
        Ok(pipeline.map_term(|t| t.limit(n)))
    }

    pub fn apply_projection(
        &self,
        pipeline: Pipeline,
        projection: &Expr,
        preloads: &[usize],
    ) -> Result<Pipeline, TranslateError> {
        trace!(projection = %projection, preloads = preloads.len(), "select");
        ProjectionBuilder::apply(pipeline, projection, preloads, &self.eval)
    }

    /// Distinct runs on the projected output; a scalar has nothing to dedupe.
    pub fn apply_distinct(&self, pipeline: Pipeline, distinct: &Distinct) -> Result<Pipeline, TranslateError> {
        match distinct {
            Distinct::Off | Distinct::Flag(false) => Ok(pipeline),
            Distinct::Flag(true) if pipeline.scalar => Ok(pipeline),
            Distinct::Flag(true) => Ok(pipeline.map_term(Term::distinct)),
            Distinct::Expr(expr) => Err(TranslateError::UnsupportedDistinctExpression(expr.to_string())),
        }
    }

    /// Source plus filters for a query-driven write. Clauses with no meaning
    /// for a bulk write are rejected.
    pub fn write_scope(&self, query: &Query) -> Result<Pipeline, TranslateError> {
        let unsupported = [
            (!query.joins.is_empty(), "join"),
            (query.is_grouped(), "group_by"),
            (!query.having_filters.is_empty(), "having"),
            (!query.order_terms.is_empty(), "order_by"),
            (query.offset.is_some(), "offset"),
            (query.limit.is_some(), "limit"),
        ];
        if let Some((_, clause)) = unsupported.iter().find(|(present, _)| *present) {
            return Err(TranslateError::UnsupportedMutation(format!(
                "{} is not allowed in update_all/delete_all",
                clause
            )));
        }
        let pipeline = self.apply_source(&query.source);
        self.apply_filters(pipeline, &query.filters)
    }
}
