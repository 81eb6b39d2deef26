use tracing::trace;

use crate::{
    ast::Join,
    config::Config,
    schema::{JoinKeys, RelationshipIndex, SchemaProvider},
    term::Term,
    translator::{Evaluator, RecordContext, TranslateError},
};

/// Compiles one join onto the pipeline and merges both halves into a single
/// positional record.
pub struct JoinResolver<'a> {
    schemas: &'a dyn SchemaProvider,
    relationships: &'a RelationshipIndex,
    config: &'a Config,
}

impl<'a> JoinResolver<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, relationships: &'a RelationshipIndex, config: &'a Config) -> Self {
        Self { schemas, relationships, config }
    }

    /// `established` holds the schema names of relations `0..width`, in order.
    pub fn apply(
        &self,
        seq: Term,
        width: usize,
        established: &[Option<String>],
        join: &Join,
        eval: &Evaluator,
    ) -> Result<Term, TranslateError> {
        let right = Term::table(self.config.database(), &join.source.table);

        let joined = if join.condition.is_trivial() {
            let (relation, keys) = self.resolve_keys(established, join)?;
            trace!(
                right = %join.source.table,
                relation,
                left_field = %keys.left_field,
                right_field = %keys.right_field,
                "join by association"
            );
            let left_key = eval.vars().lambda(|row| {
                Ok::<_, TranslateError>(RecordContext::row(row, width).resolve_relation(relation)?.bracket(&keys.left_field))
            })?;
            let joined = seq.eq_join(left_key, right);
            if keys.right_field == self.primary_key_of(join) {
                joined
            } else {
                joined.with_optarg("index", Term::datum(keys.right_field.as_str()))
            }
        } else {
            trace!(right = %join.source.table, condition = %join.condition, "join by predicate");
            let predicate = eval
                .vars()
                .lambda2(|l, r| eval.eval(&join.condition, &RecordContext::join_pair(l, width, r)))?;
            seq.inner_join(right, predicate)
        };

        let merge = eval.vars().lambda(|pair| {
            let left = pair.clone().bracket("left");
            let right = pair.bracket("right");
            Ok::<_, TranslateError>(if width == 1 {
                Term::MakeArray(vec![left, right])
            } else {
                left.append(right)
            })
        })?;
        Ok(joined.map(merge))
    }

    /// Exactly one association between an established relation and the joined
    /// schema must exist.
    fn resolve_keys(&self, established: &[Option<String>], join: &Join) -> Result<(usize, JoinKeys), TranslateError> {
        let right_name = &join.source.table;
        let Some(right_schema) = join.source.schema.as_deref() else {
            return Err(TranslateError::MissingJoinRelationship {
                right: right_name.clone(),
                reason: "the joined source has no schema".to_string(),
            });
        };

        let mut candidates: Vec<(usize, &str, &JoinKeys)> = Vec::new();
        for (relation, left) in established.iter().enumerate() {
            let Some(left) = left.as_deref() else { continue };
            for keys in self.relationships.between(left, right_schema) {
                candidates.push((relation, left, keys));
            }
        }

        match candidates.as_slice() {
            [] => Err(TranslateError::MissingJoinRelationship {
                right: right_name.clone(),
                reason: format!("no association links {} to the joined schemas", right_schema),
            }),
            [(relation, _, keys)] => Ok((*relation, (*keys).clone())),
            many => Err(TranslateError::AmbiguousJoin {
                right: right_name.clone(),
                candidates: many
                    .iter()
                    .map(|(_, left, k)| format!("{}.{} = {}.{}", left, k.left_field, right_schema, k.right_field))
                    .collect(),
            }),
        }
    }

    fn primary_key_of(&self, join: &Join) -> &str {
        join.source
            .schema
            .as_deref()
            .and_then(|name| self.schemas.schema_of(name))
            .map(|s| s.primary_key.as_str())
            .unwrap_or("id")
    }
}
