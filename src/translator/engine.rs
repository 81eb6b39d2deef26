use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    ast::{Expr, Query},
    config::Config,
    planner::{Fields, MutationPlan, PlanBuilder},
    schema::{RelationshipIndex, SchemaRegistry},
    term::{Term, VarGen},
    translator::TranslateError,
};

/// Compiles queries and writes into store pipelines.
///
/// Holds only read-only state, so one instance can be shared across threads.
/// Every `compile_*` call is pure: the same inputs always produce the same term.
#[derive(Debug, Clone)]
pub struct Translator {
    config: Config,
    schemas: SchemaRegistry,
    relationships: RelationshipIndex,
}

impl Translator {
    pub fn new(config: Config, schemas: SchemaRegistry) -> Self {
        let relationships = RelationshipIndex::build(&schemas);
        debug!(schemas = schemas.len(), relationships = relationships.len(), "translator ready");
        Self { config, schemas, relationships }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn compile_query(&self, query: &Query, params: &[Value]) -> Result<Term, TranslateError> {
        let vars = VarGen::new();
        let result = self.plan_builder(params, &vars).build(query);
        match result {
            Ok(pipeline) => {
                debug!(
                    table = %query.source.table,
                    joins = query.joins.len(),
                    filters = query.filters.len(),
                    grouped = query.is_grouped(),
                    scalar = pipeline.scalar,
                    "compiled query"
                );
                Ok(pipeline.term)
            }
            Err(e) => {
                warn!(table = %query.source.table, error = %e, "query rejected");
                Err(e)
            }
        }
    }

    pub fn compile_insert(&self, table: &str, fields: &Fields) -> Term {
        debug!(table, fields = fields.len(), "compiled insert");
        MutationPlan::new(&self.config).insert(table, fields)
    }

    pub fn compile_insert_all(&self, table: &str, rows: &[Fields]) -> Term {
        debug!(table, rows = rows.len(), "compiled bulk insert");
        MutationPlan::new(&self.config).insert_all(table, rows)
    }

    pub fn compile_update(&self, table: &str, primary_key: &Value, fields: &Fields) -> Term {
        debug!(table, fields = fields.len(), "compiled update");
        MutationPlan::new(&self.config).update(table, primary_key, fields)
    }

    pub fn compile_delete(&self, table: &str, primary_key: &Value) -> Term {
        debug!(table, "compiled delete");
        MutationPlan::new(&self.config).delete(table, primary_key)
    }

    /// Patch every row matched by the query's filters.
    pub fn compile_update_all(&self, query: &Query, params: &[Value], ops: &[Expr]) -> Result<Term, TranslateError> {
        let vars = VarGen::new();
        let builder = self.plan_builder(params, &vars);
        let result = builder
            .write_scope(query)
            .and_then(|scope| MutationPlan::new(&self.config).update_all(scope, ops, builder.evaluator()));
        self.log_write("update_all", query, result)
    }

    pub fn compile_delete_all(&self, query: &Query, params: &[Value]) -> Result<Term, TranslateError> {
        let vars = VarGen::new();
        let result = self
            .plan_builder(params, &vars)
            .write_scope(query)
            .map(|scope| MutationPlan::new(&self.config).delete_all(scope));
        self.log_write("delete_all", query, result)
    }

    fn plan_builder<'a>(&'a self, params: &'a [Value], vars: &'a VarGen) -> PlanBuilder<'a> {
        PlanBuilder::new(&self.config, &self.schemas, &self.relationships, params, vars)
    }

    fn log_write(&self, op: &str, query: &Query, result: Result<Term, TranslateError>) -> Result<Term, TranslateError> {
        match &result {
            Ok(_) => debug!(op, table = %query.source.table, filters = query.filters.len(), "compiled write"),
            Err(e) => warn!(op, table = %query.source.table, error = %e, "write rejected"),
        }
        result
    }
}
