use serde_json::Value;

pub type Result<T> = std::result::Result<T, FlowPropsError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowPropsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl FlowPropsError {
    pub(crate) fn missing_store() -> Self {
        FlowPropsError::InvalidArgument("a property store is required".to_string())
    }

    pub(crate) fn expected(what: &str, found: &Value) -> Self {
        FlowPropsError::InvalidFormat(format!("expected {}, found {}", what, kind_of(found)))
    }
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
