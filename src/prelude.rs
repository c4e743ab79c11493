//! Convenience re-exports for common SqlHaus usage
//!
//! This prelude module re-exports the most commonly used items from the SqlHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use sqlhaus::prelude::*;
//!
//! let sql = StatementBuilder::new().from("users").build_query();
//! assert!(sql.is_ok());
//! ```

// Core SqlHaus components
pub use crate::core::SqlHaus;
pub use crate::errors::SqlHausError;
pub use crate::response::{JsonResponder, Responder, Response};

// Re-export centralized config
pub use config::{AppConfig, ConfigError, PlaceholderStyle, RenderConfig};

// Re-export commonly used query-object types for convenience
pub use query_object::prelude::*;
