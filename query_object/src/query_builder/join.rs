use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::errors::StatementError;
use crate::query_builder::fragment::Fragment;

/// Join keyword emitted before a join target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// Accepts `INNER`, `left join`, `RIGHT JOIN` and so on
impl FromStr for JoinType {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let keyword = normalized
            .strip_suffix("JOIN")
            .map(str::trim_end)
            .unwrap_or(normalized.as_str());

        match keyword {
            "" | "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            _ => Err(StatementError::InvalidParams(format!(
                "unknown join type '{}'",
                s
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for JoinType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A single join entry: the join type and the joined expression, e.g.
/// `LEFT JOIN` + `roles r ON r.id = u.role_id`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Type of join (INNER, LEFT, RIGHT)
    pub join_type: JoinType,
    /// Joined table expression or nested statement
    pub target: Fragment,
}

impl Join {
    pub fn new(join_type: JoinType, target: impl Into<Fragment>) -> Self {
        Self {
            join_type,
            target: target.into(),
        }
    }

    pub fn inner(target: impl Into<Fragment>) -> Self {
        Self::new(JoinType::Inner, target)
    }

    pub fn left(target: impl Into<Fragment>) -> Self {
        Self::new(JoinType::Left, target)
    }

    pub fn right(target: impl Into<Fragment>) -> Self {
        Self::new(JoinType::Right, target)
    }

    /// Render as `<join type> <target>`
    pub fn to_sql(&self) -> Result<String, StatementError> {
        Ok(format!("{} {}", self.join_type.to_sql(), self.target.resolve()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::builder::StatementBuilder;

    #[test]
    fn test_join_type_to_sql() {
        assert_eq!(JoinType::Inner.to_sql(), "INNER JOIN");
        assert_eq!(JoinType::Left.to_sql(), "LEFT JOIN");
        assert_eq!(JoinType::Right.to_sql(), "RIGHT JOIN");
        assert_eq!(JoinType::default(), JoinType::Inner);
    }

    #[test]
    fn test_join_type_from_str() {
        assert_eq!("INNER JOIN".parse::<JoinType>().unwrap(), JoinType::Inner);
        assert_eq!("inner".parse::<JoinType>().unwrap(), JoinType::Inner);
        assert_eq!("left join".parse::<JoinType>().unwrap(), JoinType::Left);
        assert_eq!(" RIGHT ".parse::<JoinType>().unwrap(), JoinType::Right);
        assert_eq!("JOIN".parse::<JoinType>().unwrap(), JoinType::Inner);
        assert!("FULL OUTER JOIN".parse::<JoinType>().is_err());
    }

    #[test]
    fn test_join_to_sql() {
        let join = Join::left("roles r ON r.id = u.role_id");
        assert_eq!(
            join.to_sql().unwrap(),
            "LEFT JOIN roles r ON r.id = u.role_id"
        );
    }

    #[test]
    fn test_join_with_sub_query_target() {
        let totals = StatementBuilder::new()
            .select(["user_id", "SUM(amount) AS total"])
            .from("orders")
            .group_by("user_id")
            .alias("t");

        let join = Join::inner(totals);
        assert_eq!(
            join.to_sql().unwrap(),
            "INNER JOIN (SELECT user_id, SUM(amount) AS total FROM `orders` GROUP BY user_id ) t"
        );
    }

    #[test]
    fn test_join_equality_requires_same_type() {
        assert_eq!(Join::inner("a"), Join::new(JoinType::Inner, "a"));
        assert_ne!(Join::inner("a"), Join::left("a"));
    }
}
