//! Query builder utilities
//!
//! This module provides SQL statement construction utilities.

pub mod bool_expr;
pub mod builder;
pub mod fragment;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod params;
pub mod sql_generation;



pub use bool_expr::BoolExpr;
pub use builder::{StatementBuilder, StatementKind};
pub use fragment::{Condition, Fragment, IntoFragments, StatementHandle};
pub use join::{Join, JoinType};
pub use ordering::SortOrder;
pub use pagination::{Bound, Pagination};
pub use params::{JoinParam, OneOrMany, OrderParam, QueryParams};
pub use sql_generation::{quote, quote_identifier, Placeholder, SqlGenerator};
