//! Bulk statement configuration
//!
//! [`QueryParams`] is the declarative form of the fluent setters. It
//! deserializes from JSON or TOML using camelCase keys:
//!
//! ```json
//! {
//!   "select": ["id", "name"],
//!   "from": "users",
//!   "leftJoin": ["roles r ON r.id = users.role_id"],
//!   "where": ["active = 1", ["role = 'admin'", "role = 'owner'"]],
//!   "orderBy": [["name", "ASC"], "id"],
//!   "limit": 10
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::StatementError;
use crate::query_builder::builder::StatementBuilder;
use crate::query_builder::fragment::{Condition, Fragment};
use crate::query_builder::join::JoinType;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::Bound;

/// A single value or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// `join` entry: bare expression or `[expression]` (INNER), or
/// `[expression, type]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum JoinParam {
    Typed(Fragment, JoinType),
    Listed((Fragment,)),
    Expr(Fragment),
}

/// `orderBy` entry: bare field or `[field]`, or `[field, direction]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrderParam {
    Pair(String, SortOrder),
    Listed((String,)),
    Field(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub select: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub from: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub join: Vec<JoinParam>,
    #[serde(default)]
    pub inner_join: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub left_join: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub right_join: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub group_by: Option<OneOrMany<Fragment>>,
    #[serde(default)]
    pub having: Option<OneOrMany<Condition>>,
    #[serde(default, rename = "where")]
    pub conditions: Option<OneOrMany<Condition>>,
    #[serde(default)]
    pub order_by: Vec<OrderParam>,
    #[serde(default)]
    pub limit: Option<Bound>,
    #[serde(default)]
    pub offset: Option<Bound>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl QueryParams {
    pub fn from_json(value: &Value) -> Result<Self, StatementError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, StatementError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl StatementBuilder {
    /// Apply bulk parameters. When `sql` is present it is the only entry
    /// applied; otherwise each present entry is passed to its setter, with
    /// list-valued join, where and orderBy entries applied one at a time.
    pub fn set_params(self, params: QueryParams) -> Self {
        if let Some(sql) = params.sql {
            debug_log!("Applying raw SQL parameter");
            return self.sql(sql);
        }

        trace_log!("Applying statement parameters: {:?}", params);

        let mut builder = self;

        if let Some(select) = params.select {
            builder = builder.select(select.into_vec());
        }

        if let Some(from) = params.from {
            builder = builder.from(from.into_vec());
        }

        for join in params.join {
            builder = match join {
                JoinParam::Typed(target, join_type) => builder.join(target, join_type),
                JoinParam::Listed((target,)) | JoinParam::Expr(target) => {
                    builder.join(target, None)
                }
            };
        }

        for (targets, join_type) in [
            (params.inner_join, JoinType::Inner),
            (params.left_join, JoinType::Left),
            (params.right_join, JoinType::Right),
        ] {
            if let Some(targets) = targets {
                builder = builder.joins(targets.into_vec(), join_type);
            }
        }

        if let Some(group_by) = params.group_by {
            builder = builder.group_by(group_by.into_vec());
        }

        if let Some(having) = params.having {
            builder = builder.having(Condition::group(having.into_vec()));
        }

        if let Some(conditions) = params.conditions {
            for condition in conditions.into_vec() {
                builder = builder.where_clause(condition);
            }
        }

        for order in params.order_by {
            builder = match order {
                OrderParam::Pair(field, direction) => builder.order_by(field, direction),
                OrderParam::Listed((field,)) | OrderParam::Field(field) => {
                    builder.order_by(field, None)
                }
            };
        }

        if let Some(limit) = params.limit {
            builder = builder.limit(limit);
        }

        if let Some(offset) = params.offset {
            builder = builder.offset(offset);
        }

        if let Some(data) = params.data {
            builder = builder.data(data);
        }

        builder
    }
}
