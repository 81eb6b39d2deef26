use std::fmt;

use crate::{connector::ConnectorError, translator::TranslateError};

#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    Translate(TranslateError),
    Connector(ConnectorError),
    /// The store answered with an error document.
    Store(String),
    /// The store answered with a shape the operation cannot use.
    UnexpectedResponse(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Translate(e) => write!(f, "{}", e),
            RepoError::Connector(e) => write!(f, "{}", e),
            RepoError::Store(msg) => write!(f, "store error: {}", msg),
            RepoError::UnexpectedResponse(msg) => write!(f, "unexpected store response: {}", msg),
        }
    }
}

impl std::error::Error for RepoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepoError::Translate(e) => Some(e),
            RepoError::Connector(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TranslateError> for RepoError {
    fn from(e: TranslateError) -> Self {
        RepoError::Translate(e)
    }
}

impl From<ConnectorError> for RepoError {
    fn from(e: ConnectorError) -> Self {
        RepoError::Connector(e)
    }
}
