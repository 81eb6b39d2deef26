use crate::{ast::Expr, term::Term, translator::TranslateError};

/// What a lambda body can see while an expression is being evaluated.
///
/// A merged join record is an array with one slot per relation, so relation
/// `i` of a `width > 1` row is `row.nth(i)`. Grouped pipelines hold buckets of
/// the shape `{group: [keys...], reduction: [rows...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordContext {
    /// No row bound: field access yields the bare field name.
    Empty,
    Row { record: Term, width: usize },
    /// Inside a join predicate: `left` covers relations `0..right_index`.
    JoinPair { left: Box<RecordContext>, right: Term, right_index: usize },
    Bucket { bucket: Term, keys: Vec<Expr>, width: usize },
    /// Whole sequence folded into one output row (aggregates without grouping).
    Total { rows: Term, width: usize },
}

impl RecordContext {
    pub fn row(record: Term, width: usize) -> Self {
        RecordContext::Row { record, width }
    }

    pub fn join_pair(left: Term, width: usize, right: Term) -> Self {
        RecordContext::JoinPair {
            left: Box::new(RecordContext::row(left, width)),
            right,
            right_index: width,
        }
    }

    pub fn bucket(bucket: Term, keys: &[Expr], width: usize) -> Self {
        RecordContext::Bucket { bucket, keys: keys.to_vec(), width }
    }

    /// The document for `relation` in a row context.
    pub fn resolve_relation(&self, relation: usize) -> Result<Term, TranslateError> {
        match self {
            RecordContext::Row { record, width } => {
                if relation >= *width {
                    return Err(TranslateError::UnknownRelation(relation));
                }
                if *width == 1 {
                    Ok(record.clone())
                } else {
                    Ok(record.clone().nth(relation))
                }
            }
            RecordContext::JoinPair { left, right, right_index } => {
                if relation == *right_index {
                    Ok(right.clone())
                } else if relation < *right_index {
                    left.resolve_relation(relation)
                } else {
                    Err(TranslateError::UnknownRelation(relation))
                }
            }
            RecordContext::Empty => Err(TranslateError::UnknownRelation(relation)),
            RecordContext::Bucket { .. } | RecordContext::Total { .. } => Err(TranslateError::IllegalGroupedField(
                format!("whole row of relation {}", relation),
            )),
        }
    }

    /// Aggregates may only be evaluated where a set of rows is in scope.
    pub fn aggregate_rows(&self) -> Option<(Term, usize)> {
        match self {
            RecordContext::Bucket { bucket, width, .. } => Some((bucket.clone().bracket("reduction"), *width)),
            RecordContext::Total { rows, width } => Some((rows.clone(), *width)),
            _ => None,
        }
    }
}
