use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    ast::{Expr, Query},
    connector::{MutationSummary, RepoError, StoreConnector, StoreResponse},
    planner::Fields,
    term::Term,
    translator::Translator,
};

/// Repository operations built on a [`Translator`] and a [`StoreConnector`].
///
/// Implementors only say where the two collaborators live; every operation
/// has a default body that compiles, runs and unwraps the response.
pub trait Repo: Send + Sync {
    type Connector: StoreConnector;

    fn translator(&self) -> &Translator;

    fn connector(&self) -> &Self::Connector;

    /// Run a compiled term; error documents become [`RepoError::Store`].
    fn execute(&self, term: &Term) -> impl Future<Output = Result<StoreResponse, RepoError>> + Send {
        async move {
            match self.connector().run(term).await? {
                StoreResponse::Error(msg) => Err(RepoError::Store(msg)),
                response => Ok(response),
            }
        }
    }

    fn all(&self, query: &Query, params: &[Value]) -> impl Future<Output = Result<Vec<Value>, RepoError>> + Send {
        async move {
            let term = self.translator().compile_query(query, params)?;
            match self.execute(&term).await? {
                StoreResponse::Documents(docs) => Ok(docs),
                other => Err(RepoError::UnexpectedResponse(format!("expected documents, got {:?}", other))),
            }
        }
    }

    /// For queries whose projection is a single ungrouped aggregate.
    fn scalar(&self, query: &Query, params: &[Value]) -> impl Future<Output = Result<Value, RepoError>> + Send {
        async move {
            let term = self.translator().compile_query(query, params)?;
            match self.execute(&term).await? {
                StoreResponse::Scalar(value) => Ok(value),
                other => Err(RepoError::UnexpectedResponse(format!("expected a scalar, got {:?}", other))),
            }
        }
    }

    fn insert(&self, table: &str, fields: &Fields) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move { self.write(self.translator().compile_insert(table, fields)).await }
    }

    fn insert_all(&self, table: &str, rows: &[Fields]) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move { self.write(self.translator().compile_insert_all(table, rows)).await }
    }

    fn update(
        &self,
        table: &str,
        primary_key: &Value,
        fields: &Fields,
    ) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move { self.write(self.translator().compile_update(table, primary_key, fields)).await }
    }

    fn delete(&self, table: &str, primary_key: &Value) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move { self.write(self.translator().compile_delete(table, primary_key)).await }
    }

    fn update_all(
        &self,
        query: &Query,
        params: &[Value],
        ops: &[Expr],
    ) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move {
            let term = self.translator().compile_update_all(query, params, ops)?;
            self.write(term).await
        }
    }

    fn delete_all(&self, query: &Query, params: &[Value]) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move {
            let term = self.translator().compile_delete_all(query, params)?;
            self.write(term).await
        }
    }

    fn write(&self, term: Term) -> impl Future<Output = Result<MutationSummary, RepoError>> + Send {
        async move {
            match self.execute(&term).await? {
                StoreResponse::Mutation(summary) => {
                    debug!(affected = summary.affected(), errors = summary.errors, "write finished");
                    if summary.errors > 0 {
                        let msg = summary.first_error.unwrap_or_else(|| format!("{} write errors", summary.errors));
                        return Err(RepoError::Store(msg));
                    }
                    Ok(summary)
                }
                other => Err(RepoError::UnexpectedResponse(format!("expected a write summary, got {:?}", other))),
            }
        }
    }
}

/// A repository holding a shared translator and its own connector.
pub struct StoreRepo<C> {
    translator: Arc<Translator>,
    connector: C,
}

impl<C: StoreConnector> StoreRepo<C> {
    pub fn new(translator: Arc<Translator>, connector: C) -> Self {
        Self { translator, connector }
    }
}

impl<C: StoreConnector> Repo for StoreRepo<C> {
    type Connector = C;

    fn translator(&self) -> &Translator {
        &self.translator
    }

    fn connector(&self) -> &C {
        &self.connector
    }
}
