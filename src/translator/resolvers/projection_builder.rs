use tracing::trace;

use crate::{
    ast::Expr,
    planner::Pipeline,
    term::Term,
    translator::{Evaluator, RecordContext, TranslateError},
};

/// Shapes the pipeline output from the query's projection.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn apply(
        pipeline: Pipeline,
        projection: &Expr,
        preloads: &[usize],
        eval: &Evaluator,
    ) -> Result<Pipeline, TranslateError> {
        match projection {
            Expr::Entity(relation) if preloads.is_empty() => Self::entity(pipeline, *relation, eval),
            Expr::Entity(_) => Self::positional(pipeline, std::slice::from_ref(projection), preloads, eval),
            Expr::List(items) | Expr::Tuple(items) => Self::positional(pipeline, items, preloads, eval),
            // map literals, single aggregates and bare expressions
            other => Self::per_element(pipeline, other, eval),
        }
    }

    /// Whole rows of one relation. Grouped buckets are flattened back to rows.
    fn entity(mut pipeline: Pipeline, relation: usize, eval: &Evaluator) -> Result<Pipeline, TranslateError> {
        if relation >= pipeline.width() {
            return Err(TranslateError::UnknownRelation(relation));
        }
        if pipeline.is_grouped() {
            trace!("flattening buckets back to rows");
            let flatten = eval.vars().lambda(|bucket| Ok::<_, TranslateError>(bucket.bracket("reduction")))?;
            pipeline.term = pipeline.term.concat_map(flatten);
            pipeline.group_keys.clear();
        }
        if pipeline.width() == 1 {
            return Ok(pipeline);
        }
        let width = pipeline.width();
        let pick = eval
            .vars()
            .lambda(|row| RecordContext::row(row, width).resolve_relation(relation))?;
        Ok(pipeline.map_term(|t| t.map(pick)))
    }

    /// List and tuple projections: whole entities first (stable), then the
    /// preloaded relations, then everything else in source order.
    fn positional(
        pipeline: Pipeline,
        items: &[Expr],
        preloads: &[usize],
        eval: &Evaluator,
    ) -> Result<Pipeline, TranslateError> {
        let (entities, rest): (Vec<&Expr>, Vec<&Expr>) = items.iter().partition(|e| e.is_entity());
        let preloaded: Vec<Expr> = preloads.iter().map(|r| Expr::Entity(*r)).collect();
        let ordered: Vec<Expr> = entities
            .into_iter()
            .cloned()
            .chain(preloaded)
            .chain(rest.into_iter().cloned())
            .collect();
        trace!(slots = ordered.len(), "positional projection");
        Self::per_element(pipeline, &Expr::List(ordered), eval)
    }

    /// Evaluate `shape` once per output element: per bucket when grouped, once
    /// over the whole sequence when it aggregates without grouping, otherwise
    /// per row.
    fn per_element(mut pipeline: Pipeline, shape: &Expr, eval: &Evaluator) -> Result<Pipeline, TranslateError> {
        let width = pipeline.width();

        if !pipeline.is_grouped() && shape.contains_aggregate() {
            let ctx = RecordContext::Total { rows: pipeline.term.clone(), width };
            let value = eval.eval(shape, &ctx)?;
            return Ok(match shape {
                // one row of values over the whole sequence
                Expr::List(_) | Expr::Tuple(_) | Expr::Map(_) => Pipeline {
                    term: Term::MakeArray(vec![value]),
                    ..pipeline
                },
                _ => Pipeline { term: value, scalar: true, ..pipeline },
            });
        }

        let f = eval.vars().lambda(|element| eval.eval(shape, &pipeline.element_context(element)))?;
        pipeline.term = pipeline.term.map(f);
        Ok(pipeline)
    }
}
