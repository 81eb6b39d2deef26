use serde_json::Value;

use crate::{
    ast::{ArithmeticOp, ComparatorOp, Expr, Literal, MutationOp},
    term::{Term, TermType, VarGen},
    translator::{AggregateExtractor, LikePattern, ParamBinder, RecordContext, TranslateError},
};

/// Turns expressions into store terms against a [`RecordContext`].
///
/// One evaluator lives for one compilation; it shares the compilation's
/// [`VarGen`] so every lambda it builds gets a unique variable.
pub struct Evaluator<'a> {
    params: ParamBinder<'a>,
    vars: &'a VarGen,
}

impl<'a> Evaluator<'a> {
    pub fn new(params: &'a [Value], vars: &'a VarGen) -> Self {
        Self { params: ParamBinder::new(params), vars }
    }

    pub fn vars(&self) -> &'a VarGen {
        self.vars
    }

    pub fn eval(&self, expr: &Expr, ctx: &RecordContext) -> Result<Term, TranslateError> {
        // Past a grouping stage, anything equal to a group key reads the key slot.
        if let RecordContext::Bucket { bucket, keys, .. } = ctx {
            if let Some(pos) = keys.iter().position(|k| k == expr) {
                return Ok(bucket.clone().bracket("group").nth(pos));
            }
        }

        match expr {
            Expr::Literal(l) => Ok(Term::datum(l.to_value())),
            Expr::Param(i) => Ok(Term::datum(self.params.bind(*i)?.clone())),
            Expr::ParamSlice { start, len } => {
                Ok(Term::datum(Value::Array(self.params.bind_slice(*start, *len)?.to_vec())))
            }
            Expr::Field { relation, name } => self.eval_field(*relation, name, ctx),
            Expr::Entity(relation) => ctx.resolve_relation(*relation),
            Expr::Compare { left, op, right } => Ok(Term::binary(
                comparator_kind(*op),
                self.eval(left, ctx)?,
                self.eval(right, ctx)?,
            )),
            Expr::Arithmetic { left, op, right } => Ok(Term::binary(
                arithmetic_kind(*op),
                self.eval(left, ctx)?,
                self.eval(right, ctx)?,
            )),
            Expr::And(items) => self.eval_connective(items, ctx, true),
            Expr::Or(items) => self.eval_connective(items, ctx, false),
            Expr::Not(inner) => Ok(Term::not(self.eval(inner, ctx)?)),
            Expr::In { expr, list } => {
                let list = self.eval_list(list, ctx)?;
                Ok(list.contains(self.eval(expr, ctx)?))
            }
            Expr::IsNull(inner) => Ok(Term::binary(TermType::Eq, self.eval(inner, ctx)?, Term::datum(Value::Null))),
            Expr::Like { expr, pattern, case_insensitive } => {
                let pattern = LikePattern::compile(&self.like_source(pattern)?, *case_insensitive)?;
                Ok(self.eval(expr, ctx)?.matches(pattern.as_str()))
            }
            Expr::Aggregate { .. } => self.eval_aggregate(expr, ctx),
            Expr::Mutation { .. } => Err(TranslateError::UnrecognizedExpression(format!(
                "{} is only valid in an update clause",
                expr
            ))),
            Expr::Tuple(items) | Expr::List(items) => Ok(Term::MakeArray(
                items.iter().map(|e| self.eval(e, ctx)).collect::<Result<_, _>>()?,
            )),
            Expr::Map(entries) => Ok(Term::MakeObject(
                entries
                    .iter()
                    .map(|(k, e)| Ok((k.clone(), self.eval(e, ctx)?)))
                    .collect::<Result<_, TranslateError>>()?,
            )),
        }
    }

    fn eval_field(&self, relation: usize, name: &str, ctx: &RecordContext) -> Result<Term, TranslateError> {
        match ctx {
            RecordContext::Empty if relation == 0 => Ok(Term::datum(name)),
            RecordContext::Bucket { .. } | RecordContext::Total { .. } => {
                Err(TranslateError::IllegalGroupedField(format!("${}.{}", relation, name)))
            }
            _ => Ok(ctx.resolve_relation(relation)?.bracket(name)),
        }
    }

    fn eval_connective(&self, items: &[Expr], ctx: &RecordContext, conjunction: bool) -> Result<Term, TranslateError> {
        let mut terms = items.iter().map(|e| self.eval(e, ctx)).collect::<Result<Vec<_>, _>>()?;
        match terms.len() {
            // empty and = true, empty or = false
            0 => Ok(Term::datum(conjunction)),
            1 => Ok(terms.remove(0)),
            _ if conjunction => Ok(Term::and(terms)),
            _ => Ok(Term::or(terms)),
        }
    }

    fn eval_list(&self, list: &Expr, ctx: &RecordContext) -> Result<Term, TranslateError> {
        match list {
            Expr::Param(i) => Ok(Term::datum(Value::Array(self.params.bind_list(*i)?.to_vec()))),
            other => self.eval(other, ctx),
        }
    }

    fn like_source(&self, pattern: &Expr) -> Result<String, TranslateError> {
        match pattern {
            Expr::Literal(Literal::String(s)) => Ok(s.clone()),
            Expr::Param(i) => match self.params.bind(*i)? {
                Value::String(s) => Ok(s.clone()),
                other => Err(TranslateError::InvalidLikePattern(format!(
                    "parameter {} holds {}, expected a string",
                    i, other
                ))),
            },
            other => Err(TranslateError::InvalidLikePattern(format!(
                "{} is not a string literal or parameter",
                other
            ))),
        }
    }

    fn eval_aggregate(&self, expr: &Expr, ctx: &RecordContext) -> Result<Term, TranslateError> {
        let Some((rows, width)) = ctx.aggregate_rows() else {
            return Err(TranslateError::UnrecognizedExpression(format!(
                "aggregate {} outside of a grouped or aggregated projection",
                expr
            )));
        };
        let Some((inner, apply)) = AggregateExtractor::extract(expr)? else {
            return Err(TranslateError::UnrecognizedExpression(expr.to_string()));
        };

        // A single-relation whole row needs no mapping.
        let mapped = if width == 1 && *inner == Expr::Entity(0) {
            rows
        } else {
            rows.map(self.vars.lambda(|row| self.eval(inner, &RecordContext::row(row, width)))?)
        };
        Ok(apply.apply(mapped))
    }

    /// One patch entry of an update clause, evaluated against the stored row.
    pub fn eval_mutation(&self, expr: &Expr, row: &Term) -> Result<(String, Term), TranslateError> {
        let Expr::Mutation { op, field, value } = expr else {
            return Err(TranslateError::UnsupportedMutation(format!("{} is not a field operator", expr)));
        };
        let value = self.eval(value, &RecordContext::row(row.clone(), 1))?;
        let current = row.clone().bracket(field);
        let patched = match op {
            MutationOp::Set => value,
            MutationOp::Inc => Term::binary(TermType::Add, current, value),
            MutationOp::Push => current.append(value),
            MutationOp::Pull => current.difference(Term::MakeArray(vec![value])),
        };
        Ok((field.clone(), patched))
    }

    /// Offset and limit must resolve to a non-negative integer.
    pub fn eval_count(&self, expr: &Expr, clause: &str) -> Result<Term, TranslateError> {
        match self.eval(expr, &RecordContext::Empty)? {
            Term::Datum(Value::Number(n)) if n.as_u64().is_some() => Ok(Term::Datum(Value::Number(n))),
            other => Err(TranslateError::InvalidPagination(format!(
                "{} must be a non-negative integer, got {}",
                clause, other
            ))),
        }
    }
}

fn comparator_kind(op: ComparatorOp) -> TermType {
    match op {
        ComparatorOp::Eq => TermType::Eq,
        ComparatorOp::NotEq => TermType::Ne,
        ComparatorOp::Lt => TermType::Lt,
        ComparatorOp::LtEq => TermType::Le,
        ComparatorOp::Gt => TermType::Gt,
        ComparatorOp::GtEq => TermType::Ge,
    }
}

fn arithmetic_kind(op: ArithmeticOp) -> TermType {
    match op {
        ArithmeticOp::Add => TermType::Add,
        ArithmeticOp::Sub => TermType::Sub,
        ArithmeticOp::Mul => TermType::Mul,
        ArithmeticOp::Div => TermType::Div,
    }
}
