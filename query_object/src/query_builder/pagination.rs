//! Query builder utilities
//!
//! This module provides LIMIT/OFFSET construction utilities.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::validation;

/// A LIMIT or OFFSET value.
///
/// Numeric input becomes a non-negative integer; anything else (a `?` or
/// `:limit` placeholder, for instance) is kept verbatim. Negative input is
/// clamped to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Count(u64),
    Raw(String),
}

impl Bound {
    /// Coerce text the way an integer cast of a numeric string would
    pub fn parse(text: &str) -> Self {
        match validation::parse_integer(text) {
            Some(count) => Bound::from(count),
            None => Bound::Raw(text.to_string()),
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Bound::Count(count) => Some(*count),
            Bound::Raw(_) => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Count(count) => write!(f, "{}", count),
            Bound::Raw(text) => f.write_str(text),
        }
    }
}

macro_rules! bound_from_int {
    ($saturate:expr; $($ty:ty),*) => {
        $(
            impl From<$ty> for Bound {
                fn from(count: $ty) -> Self {
                    Bound::Count(u64::try_from(count).unwrap_or($saturate))
                }
            }
        )*
    };
}

bound_from_int!(0; i32, i64);
bound_from_int!(u64::MAX; u32, u64, usize);

impl From<&str> for Bound {
    fn from(text: &str) -> Self {
        Bound::parse(text)
    }
}

impl From<String> for Bound {
    fn from(text: String) -> Self {
        Bound::parse(&text)
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBound {
            Unsigned(u64),
            Signed(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawBound::deserialize(deserializer)? {
            RawBound::Unsigned(count) => Bound::Count(count),
            RawBound::Signed(count) => Bound::from(count),
            // Saturating cast, NaN becomes zero
            RawBound::Float(value) => Bound::Count(value.trunc().max(0.0) as u64),
            RawBound::Text(text) => Bound::parse(&text),
        })
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<Bound>,
    pub offset: Option<Bound>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: impl Into<Bound>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_offset(mut self, offset: impl Into<Bound>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// `LIMIT n ` and/or `OFFSET m `, each followed by a space
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = &self.limit {
            sql.push_str(&format!("LIMIT {} ", limit));
        }

        if let Some(offset) = &self.offset {
            sql.push_str(&format!("OFFSET {} ", offset));
        }

        sql
    }
}
