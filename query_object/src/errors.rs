use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("No table set for query")]
    NoTable,

    #[error("Invalid query parameters: {0}")]
    InvalidParams(String),
}

impl From<serde_json::Error> for StatementError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidParams(err.to_string())
    }
}
