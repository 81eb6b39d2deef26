use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{
    ast::Expr,
    config::{ConflictStrategy, Config, Durability},
    planner::Pipeline,
    term::Term,
    translator::{Evaluator, TranslateError},
};

/// Field map of a single document write.
pub type Fields = IndexMap<String, Value>;

/// Builds write terms and attaches the write optargs from [`Config`].
pub struct MutationPlan<'a> {
    config: &'a Config,
}

impl<'a> MutationPlan<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn table(&self, table: &str) -> Term {
        Term::table(self.config.database(), table)
    }

    pub fn insert(&self, table: &str, fields: &Fields) -> Term {
        let term = self.table(table).insert(Term::datum(document(fields)));
        self.write_optargs(term, true)
    }

    pub fn insert_all(&self, table: &str, rows: &[Fields]) -> Term {
        let docs = Value::Array(rows.iter().map(document).collect());
        let term = self.table(table).insert(Term::datum(docs));
        self.write_optargs(term, true)
    }

    pub fn update(&self, table: &str, primary_key: &Value, fields: &Fields) -> Term {
        let term = self
            .table(table)
            .get(Term::datum(primary_key.clone()))
            .update(Term::datum(document(fields)));
        self.write_optargs(term, false)
    }

    pub fn delete(&self, table: &str, primary_key: &Value) -> Term {
        let term = self.table(table).get(Term::datum(primary_key.clone())).delete();
        self.write_optargs(term, false)
    }

    /// `scope.update(row => {field: patched, ...})`
    pub fn update_all(&self, scope: Pipeline, ops: &[Expr], eval: &Evaluator) -> Result<Term, TranslateError> {
        if ops.is_empty() {
            return Err(TranslateError::UnsupportedMutation("update_all needs at least one field operator".to_string()));
        }
        let patch = eval.vars().lambda(|row| {
            let entries = ops
                .iter()
                .map(|op| eval.eval_mutation(op, &row))
                .collect::<Result<Vec<(String, Term)>, _>>()?;
            for (i, (field, _)) in entries.iter().enumerate() {
                if entries[..i].iter().any(|(seen, _)| seen == field) {
                    return Err(TranslateError::UnsupportedMutation(format!(
                        "field {} is targeted by more than one operator",
                        field
                    )));
                }
            }
            Ok(Term::MakeObject(entries))
        })?;
        Ok(self.write_optargs(scope.term.update(patch), false))
    }

    pub fn delete_all(&self, scope: Pipeline) -> Term {
        self.write_optargs(scope.term.delete(), false)
    }

    // `conflict` only applies to inserts; store defaults are never emitted.
    fn write_optargs(&self, mut term: Term, insert: bool) -> Term {
        if insert && self.config.conflict != ConflictStrategy::Error {
            term = term.with_optarg("conflict", Term::datum(self.config.conflict.as_str()));
        }
        if self.config.durability == Durability::Soft {
            term = term.with_optarg("durability", Term::datum("soft"));
        }
        if self.config.return_changes {
            term = term.with_optarg("return_changes", Term::datum(true));
        }
        term
    }
}

fn document(fields: &Fields) -> Value {
    Value::Object(fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Map<String, Value>>())
}
