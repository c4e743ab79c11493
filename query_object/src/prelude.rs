//! Convenience re-exports for common query-object usage

// Error types
pub use crate::errors::StatementError;

// Statement building
pub use crate::query_builder::{
    Bound, Condition, Fragment, JoinType, QueryParams, SortOrder, StatementBuilder,
    StatementHandle, StatementKind,
};

// Low-level SQL generation
pub use crate::query_builder::{quote, quote_identifier, Placeholder, SqlGenerator};

// Common external dependencies that are frequently used
pub use serde_json::{json, Value};
