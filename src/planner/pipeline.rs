use crate::{ast::Expr, term::Term, translator::RecordContext};

/// The pipeline under construction plus the shape facts later clauses need.
///
/// Each clause stage takes one by value and returns the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub term: Term,
    /// Schema name per relation index; the length is the record width.
    pub relations: Vec<Option<String>>,
    /// Non-empty once grouped: the sequence then holds buckets.
    pub group_keys: Vec<Expr>,
    /// The term yields one value rather than a sequence.
    pub scalar: bool,
}

impl Pipeline {
    pub fn new(term: Term, schema: Option<String>) -> Self {
        Self { term, relations: vec![schema], group_keys: vec![], scalar: false }
    }

    pub fn width(&self) -> usize {
        self.relations.len()
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_keys.is_empty()
    }

    /// Context for a lambda parameter bound to one element of the sequence.
    pub fn element_context(&self, element: Term) -> RecordContext {
        if self.is_grouped() {
            RecordContext::bucket(element, &self.group_keys, self.width())
        } else {
            RecordContext::row(element, self.width())
        }
    }

    pub fn map_term(mut self, f: impl FnOnce(Term) -> Term) -> Self {
        self.term = f(self.term);
        self
    }
}
