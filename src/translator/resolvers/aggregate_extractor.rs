use crate::{
    ast::{AggregateFunc, Expr},
    term::Term,
    translator::TranslateError,
};

/// How to fold a mapped sequence into one value.
///
/// The store has no `count distinct` primitive, so a distinct aggregate is
/// always two chained operations: `distinct` then the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateApply {
    pub func: AggregateFunc,
    pub distinct: bool,
}

impl AggregateApply {
    pub fn apply(&self, seq: Term) -> Term {
        let seq = if self.distinct { seq.distinct() } else { seq };
        match self.func {
            AggregateFunc::Count => seq.count(),
            AggregateFunc::Sum => seq.sum(),
            AggregateFunc::Avg => seq.avg(),
            AggregateFunc::Min => seq.min(),
            AggregateFunc::Max => seq.max(),
        }
    }
}

pub struct AggregateExtractor;

impl AggregateExtractor {
    /// Peel a top-level aggregate call off `expr`.
    ///
    /// Returns `None` when `expr` is not an aggregate call. An aggregate whose
    /// argument itself contains an aggregate is rejected.
    pub fn extract(expr: &Expr) -> Result<Option<(&Expr, AggregateApply)>, TranslateError> {
        match expr {
            Expr::Aggregate { func, arg, distinct } => {
                if arg.contains_aggregate() {
                    return Err(TranslateError::UnrecognizedExpression(format!(
                        "nested aggregate in {}",
                        expr
                    )));
                }
                Ok(Some((arg.as_ref(), AggregateApply { func: *func, distinct: *distinct })))
            }
            _ => Ok(None),
        }
    }
}
