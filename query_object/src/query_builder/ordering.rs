//! Query builder utilities
//!
//! This module provides ORDER BY construction utilities.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::errors::StatementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(StatementError::InvalidParams(format!(
                "unknown sort direction '{}'",
                s
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Render one ORDER BY item; the direction is omitted when unset
pub fn order_item(field: &str, direction: Option<SortOrder>) -> String {
    match direction {
        Some(direction) => format!("{} {}", field, direction.to_sql()),
        None => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_order_item() {
        assert_eq!(order_item("name", Some(SortOrder::Desc)), "name DESC");
        assert_eq!(order_item("name", None), "name");
    }
}
