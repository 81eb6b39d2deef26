/// Cardinality of a declared association. Only the key pair matters for
/// joins; the kind is kept for callers that shape preloaded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

/// A relationship declared on an owning schema.
///
/// - `owner_key`: field on the schema declaring the association.
/// - `related`: name of the associated schema.
/// - `related_key`: field on the associated schema.
///
/// For `belongs_to` the owner holds the foreign key (`post_id -> id`), for
/// `has_one`/`has_many` the related schema does (`id -> post_id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub name: String,
    pub kind: AssociationKind,
    pub related: String,
    pub owner_key: String,
    pub related_key: String,
}

impl Association {
    pub fn belongs_to(name: &str, related: &str, foreign_key: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AssociationKind::BelongsTo,
            related: related.to_string(),
            owner_key: foreign_key.to_string(),
            related_key: "id".to_string(),
        }
    }

    pub fn has_one(name: &str, related: &str, foreign_key: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AssociationKind::HasOne,
            related: related.to_string(),
            owner_key: "id".to_string(),
            related_key: foreign_key.to_string(),
        }
    }

    pub fn has_many(name: &str, related: &str, foreign_key: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AssociationKind::HasMany,
            related: related.to_string(),
            owner_key: "id".to_string(),
            related_key: foreign_key.to_string(),
        }
    }

    /// Override the non-foreign-key side (defaults to `id`).
    pub fn references(mut self, key: &str) -> Self {
        match self.kind {
            AssociationKind::BelongsTo => self.related_key = key.to_string(),
            AssociationKind::HasOne | AssociationKind::HasMany => self.owner_key = key.to_string(),
        }
        self
    }
}
