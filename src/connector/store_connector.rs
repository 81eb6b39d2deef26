use std::fmt;
use std::future::Future;

use crate::{connector::StoreResponse, term::Term};

/// Failure talking to the store, as opposed to an error document the store
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorError {
    Connection(String),
    Timeout,
    Protocol(String),
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Connection(msg) => write!(f, "connection failed: {}", msg),
            ConnectorError::Timeout => write!(f, "store did not answer in time"),
            ConnectorError::Protocol(msg) => write!(f, "protocol error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

/// Executes a compiled pipeline against a live store.
///
/// Connection handling, timeouts and cancellation live behind this trait.
pub trait StoreConnector: Send + Sync {
    fn run(&self, term: &Term) -> impl Future<Output = Result<StoreResponse, ConnectorError>> + Send;
}
