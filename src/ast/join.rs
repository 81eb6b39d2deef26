use crate::ast::{Expr, Source};

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub source: Source,
    /// `true` joins through the declared association; anything else is a predicate
    /// over the already established relations plus this one.
    pub condition: Expr,
}

impl Join {
    pub fn new(source: Source, condition: Expr) -> Self {
        Self { source, condition }
    }

    pub fn assoc(source: Source) -> Self {
        Self { source, condition: Expr::lit(true) }
    }
}
