//! Query Object - statement assembly layer for SqlHaus
//!
//! This crate provides the boolean expression compiler, the cached
//! statement builder and the low-level SQL generation helpers.

#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod errors;
pub mod prelude;
pub mod query_builder;
pub mod validation;

pub use errors::StatementError;
pub use query_builder::{
    bool_expr, quote, quote_identifier, BoolExpr, Bound, Condition, Fragment, Join, JoinType,
    Placeholder, QueryParams, SortOrder, SqlGenerator, StatementBuilder, StatementHandle,
    StatementKind,
};
