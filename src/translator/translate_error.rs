use std::fmt;

/// Why a query could not be translated. Every variant is a defect in the
/// query or the schema definitions; retrying the same input fails the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// `distinct` keyed by an arbitrary expression.
    UnsupportedDistinctExpression(String),
    /// No declared association links the joined schema to the pipeline.
    MissingJoinRelationship { right: String, reason: String },
    /// More than one declared association could back the join.
    AmbiguousJoin { right: String, candidates: Vec<String> },
    MalformedParameter(String),
    /// Bare field past a grouping stage that is neither a key nor aggregated.
    IllegalGroupedField(String),
    UnrecognizedExpression(String),
    UnknownRelation(usize),
    InvalidLikePattern(String),
    InvalidPagination(String),
    UnsupportedMutation(String),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnsupportedDistinctExpression(expr) => write!(
                f,
                "distinct on expression {} is not supported; group_by the expression instead",
                expr
            ),
            TranslateError::MissingJoinRelationship { right, reason } => {
                write!(f, "cannot join {} by association: {}", right, reason)
            }
            TranslateError::AmbiguousJoin { right, candidates } => write!(
                f,
                "join with {} is ambiguous, candidate keys: {}; give an explicit join condition",
                right,
                candidates.join(", ")
            ),
            TranslateError::MalformedParameter(msg) => write!(f, "malformed parameter reference: {}", msg),
            TranslateError::IllegalGroupedField(field) => write!(
                f,
                "{} must appear in group_by or be used in an aggregate",
                field
            ),
            TranslateError::UnrecognizedExpression(msg) => write!(f, "unrecognized expression: {}", msg),
            TranslateError::UnknownRelation(index) => write!(f, "relation index {} is not bound in this query", index),
            TranslateError::InvalidLikePattern(msg) => write!(f, "invalid like pattern: {}", msg),
            TranslateError::InvalidPagination(msg) => write!(f, "invalid offset/limit: {}", msg),
            TranslateError::UnsupportedMutation(msg) => write!(f, "unsupported mutation: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}
