use thiserror::Error;

pub type DiResult<T> = Result<T, DiError>;

#[derive(Error, Debug)]
pub enum DiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A provider has no computation of its own.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A configuration with neither data nor fallback was read.
    #[error("Configuration provider not initialized")]
    NotInitialized,

    #[error("Missing configuration key '{key}' (path '{path}')")]
    MissingKey { path: String, key: String },

    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Permanent restriction, retrying never helps.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Argument binding error: {0}")]
    Binding(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A provider was resolved again from inside its own computation.
    #[error("Recursive resolution: {0}")]
    Recursion(String),

    /// Error raised by a wrapped function, passed through untouched.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DiError {
    /// Build a `TypeMismatch` for a cursor that was expected to be a mapping.
    pub fn not_a_mapping(path: impl Into<String>, found: &serde_json::Value) -> Self {
        DiError::TypeMismatch {
            path: path.into(),
            expected: "mapping",
            found: value_kind(found),
        }
    }
}

/// Short name of a JSON value's kind, for error messages.
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}
