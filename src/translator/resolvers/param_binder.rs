use serde_json::Value;

use crate::translator::TranslateError;

/// Resolves pin references against the caller's parameter vector.
#[derive(Debug, Clone, Copy)]
pub struct ParamBinder<'a> {
    params: &'a [Value],
}

impl<'a> ParamBinder<'a> {
    pub fn new(params: &'a [Value]) -> Self {
        Self { params }
    }

    pub fn bind(&self, index: usize) -> Result<&'a Value, TranslateError> {
        self.params.get(index).ok_or_else(|| {
            TranslateError::MalformedParameter(format!(
                "parameter {} requested but only {} supplied",
                index,
                self.params.len()
            ))
        })
    }

    pub fn bind_slice(&self, start: usize, len: usize) -> Result<&'a [Value], TranslateError> {
        let end = start.checked_add(len).ok_or_else(|| {
            TranslateError::MalformedParameter(format!("slice {}+{} overflows", start, len))
        })?;
        self.params.get(start..end).ok_or_else(|| {
            TranslateError::MalformedParameter(format!(
                "slice {}..{} requested but only {} supplied",
                start,
                end,
                self.params.len()
            ))
        })
    }

    /// A single parameter used as a list must already be an array.
    pub fn bind_list(&self, index: usize) -> Result<&'a [Value], TranslateError> {
        match self.bind(index)? {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(TranslateError::MalformedParameter(format!(
                "parameter {} is pinned as a list but holds {}",
                index, other
            ))),
        }
    }
}
