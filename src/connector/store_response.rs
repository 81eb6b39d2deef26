use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counters and keys reported by the store for a write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MutationSummary {
    pub inserted: u64,
    pub replaced: u64,
    pub unchanged: u64,
    pub deleted: u64,
    pub skipped: u64,
    pub errors: u64,
    pub generated_keys: Vec<Value>,
    pub first_error: Option<String>,
}

impl MutationSummary {
    /// Rows the write actually touched.
    pub fn affected(&self) -> u64 {
        self.inserted + self.replaced + self.deleted
    }
}

/// What a store returns for one executed pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreResponse {
    Documents(Vec<Value>),
    Scalar(Value),
    Mutation(MutationSummary),
    /// First-class error document.
    Error(String),
}

const SUMMARY_KEYS: [&str; 4] = ["inserted", "replaced", "deleted", "generated_keys"];

impl StoreResponse {
    /// Classify a raw response value by shape.
    ///
    /// Arrays are documents; objects carrying an `error` string are errors;
    /// objects carrying any write counter are mutation summaries; anything
    /// else is a scalar.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(docs) => StoreResponse::Documents(docs),
            Value::Object(m) => {
                if let Some(Value::String(msg)) = m.get("error") {
                    return StoreResponse::Error(msg.clone());
                }
                let has_counters = SUMMARY_KEYS.iter().any(|k| m.contains_key(*k));
                let value = Value::Object(m);
                if has_counters {
                    if let Ok(summary) = serde_json::from_value::<MutationSummary>(value.clone()) {
                        return StoreResponse::Mutation(summary);
                    }
                }
                StoreResponse::Scalar(value)
            }
            other => StoreResponse::Scalar(other),
        }
    }
}
