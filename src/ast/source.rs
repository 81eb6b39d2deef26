/// A table the query reads from, optionally bound to a registered schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub table: String,
    /// Name of the schema descriptor, used to resolve association joins.
    pub schema: Option<String>,
}

impl Source {
    pub fn table(table: &str) -> Self {
        Self { table: table.to_string(), schema: None }
    }

    pub fn with_schema(table: &str, schema: &str) -> Self {
        Self { table: table.to_string(), schema: Some(schema.to_string()) }
    }
}
