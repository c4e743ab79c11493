//! # SqlHaus
//!
//! A SQL statement assembler. Statements are described through a fluent,
//! mutable builder, composed from sub-queries, and rendered to text on
//! demand. The rendered text is cached until the next mutation.
//!
//! ## Quick Start
//!
//! ```rust
//! use sqlhaus::prelude::*;
//!
//! # fn main() -> Result<(), SqlHausError> {
//! let recent = StatementBuilder::new()
//!     .select(["user_id"])
//!     .from("orders")
//!     .where_clause("created_at > NOW() - INTERVAL 7 DAY")
//!     .alias("recent");
//!
//! let statement = StatementBuilder::new()
//!     .select(["u.id", "u.name"])
//!     .from(recent)
//!     .inner_join("users u ON u.id = recent.user_id")
//!     .where_clause(["u.role = 'admin'", "u.role = 'owner'"])
//!     .order_by("u.name", SortOrder::Asc)
//!     .limit(10);
//!
//! let mut haus = SqlHaus::new();
//! haus.register_statement("recent_admins", statement)?;
//!
//! println!("{}", haus.build("recent_admins")?);
//! # Ok(())
//! # }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;
pub mod response;

// Re-export the main public types for convenience
pub use crate::core::SqlHaus;
pub use crate::errors::SqlHausError;
pub use crate::response::{JsonResponder, Responder, Response};

// Re-export centralized config
pub use config::{AppConfig, PlaceholderStyle, RenderConfig};

// Re-export internal crates used by the public API
pub use config;
pub use query_object;
