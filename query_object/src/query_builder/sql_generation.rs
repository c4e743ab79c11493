//! Query builder utilities
//!
//! This module provides the clause-level SQL generation used by
//! [`StatementBuilder`](crate::query_builder::StatementBuilder), plus the
//! standalone value and identifier quoting helpers.
//!
//! Quoting wraps non-numeric values in single quotes and does not escape
//! quotes embedded in the value. Do not feed untrusted input through it.

use serde_json::{Map, Value};

use crate::errors::StatementError;
use crate::query_builder::bool_expr::BoolExpr;
use crate::query_builder::fragment::{Condition, Fragment};
use crate::query_builder::join::Join;
use crate::query_builder::ordering::{order_item, SortOrder};
use crate::validation;

/// How INSERT/UPDATE values are rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// Inline quoted literals: `'Bob'`, `30`
    #[default]
    None,
    /// Named parameters: `:name`, `:age`
    Named,
    /// The same token for every value, e.g. `?`
    Wildcard(String),
}

impl Placeholder {
    fn render(&self, column: &str, value: &Value) -> String {
        match self {
            Placeholder::None => quote(value),
            Placeholder::Named => format!(":{}", column),
            Placeholder::Wildcard(token) => token.clone(),
        }
    }
}

/// Add quotes to non-numeric values.
///
/// Numbers and numeric strings are emitted bare, with whole-number floats
/// losing their fraction (`1.0` -> `1`). Other strings are wrapped
/// in single quotes as-is. `null` and `false` become `''`, `true` becomes
/// `'1'`, arrays and objects are quoted JSON text.
pub fn quote(value: &Value) -> String {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float.to_string(),
            _ => number.to_string(),
        },
        Value::String(text) if validation::is_numeric(text) => text.clone(),
        Value::String(text) => format!("'{}'", text),
        Value::Null | Value::Bool(false) => "''".to_string(),
        Value::Bool(true) => "'1'".to_string(),
        other => format!("'{}'", other),
    }
}

/// Wrap a plain identifier or dotted identifier path in backticks
/// (`users` -> `` `users` ``, `shop.users` -> `` `shop`.`users` ``).
/// Anything else (aliases, expressions, pre-quoted names) is returned as-is.
pub fn quote_identifier(name: &str) -> String {
    if validation::is_identifier_path(name) {
        format!("`{}`", name.replace('.', "`.`"))
    } else {
        name.to_string()
    }
}

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build the SELECT field list, `*` when empty
    pub fn build_field_list(fields: &[Fragment]) -> Result<String, StatementError> {
        if fields.is_empty() {
            return Ok("*".to_string());
        }

        let parts = fields
            .iter()
            .map(|field| field.resolve().map(|sql| sql.into_owned()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parts.join(", "))
    }

    /// Build the comma-separated table list
    pub fn build_table_list(tables: &[Fragment]) -> Result<String, StatementError> {
        if tables.is_empty() {
            return Err(StatementError::NoTable);
        }

        let parts = tables
            .iter()
            .map(|table| match table {
                Fragment::Literal(name) => Ok(quote_identifier(name)),
                Fragment::SubQuery(statement) => statement.build_query(),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parts.join(", "))
    }

    /// Build an INSERT's column/value part:
    /// `` (`a`, `b`) VALUES (1, 'x') `` with a leading and trailing space
    pub fn build_insert(data: &Map<String, Value>, placeholder: &Placeholder) -> String {
        let mut columns = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());

        for (column, value) in data {
            columns.push(format!("`{}`", column));
            values.push(placeholder.render(column, value));
        }

        format!(" ({}) VALUES ({}) ", columns.join(", "), values.join(", "))
    }

    /// Build an UPDATE's assignment list:
    /// `` `a` = 1, `b` = 'x' `` with a leading and trailing space
    pub fn build_update(data: &Map<String, Value>, placeholder: &Placeholder) -> String {
        let assignments = data
            .iter()
            .map(|(column, value)| format!("`{}` = {}", column, placeholder.render(column, value)))
            .collect::<Vec<_>>();

        format!(" {} ", assignments.join(", "))
    }

    /// Build an equality expression for a single value or an IN expression
    /// for several. With `negate`, `!=` and `NOT IN` are used instead.
    ///
    /// An empty value list yields ` TRUE ` in both forms, so a negated empty
    /// set never excludes every row.
    pub fn build_in(field: &str, values: &[Value], negate: bool) -> String {
        if values.is_empty() {
            return " TRUE ".to_string();
        }

        let column = format!("`{}`", field.replace('.', "`.`"));
        let quoted = values.iter().map(quote).collect::<Vec<_>>().join(", ");

        if values.len() > 1 {
            let operator = if negate { "NOT IN" } else { "IN" };
            format!("{} {} ({})", column, operator, quoted)
        } else {
            let operator = if negate { "!=" } else { "=" };
            format!("{} {} {}", column, operator, quoted)
        }
    }

    /// Build JOIN clauses, space separated
    pub fn build_join_clause(joins: &[Join]) -> Result<String, StatementError> {
        let parts = joins
            .iter()
            .map(Join::to_sql)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parts.join(" "))
    }

    /// Compile a WHERE/HAVING condition set as one AND-level list.
    /// Returns `None` when there is nothing to emit.
    pub fn build_condition(conditions: &[Condition]) -> Result<Option<String>, StatementError> {
        if conditions.is_empty() {
            return Ok(None);
        }

        let resolved = conditions
            .iter()
            .map(Condition::resolve)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BoolExpr::List(resolved).compile(true))
    }

    /// Build the GROUP BY field list
    pub fn build_group_by_clause(fields: &[Fragment]) -> Result<String, StatementError> {
        let parts = fields
            .iter()
            .map(|field| field.resolve().map(|sql| sql.into_owned()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parts.join(", "))
    }

    /// Build the ORDER BY item list
    pub fn build_order_clause(order_by: &[(String, Option<SortOrder>)]) -> String {
        order_by
            .iter()
            .map(|(field, direction)| order_item(field, *direction))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_quote_values() {
        assert_eq!(quote(&json!(30)), "30");
        assert_eq!(quote(&json!(1.5)), "1.5");
        assert_eq!(quote(&json!(1.0)), "1");
        assert_eq!(quote(&json!(-20.0)), "-20");
        assert_eq!(quote(&json!("42")), "42");
        assert_eq!(quote(&json!("Bob")), "'Bob'");
        assert_eq!(quote(&json!("")), "''");
        assert_eq!(quote(&json!(null)), "''");
        assert_eq!(quote(&json!(true)), "'1'");
        assert_eq!(quote(&json!(false)), "''");
    }

    #[test]
    fn test_quote_does_not_escape_embedded_quotes() {
        assert_eq!(quote(&json!("O'Brien")), "'O'Brien'");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "`users`");
        assert_eq!(quote_identifier("shop.users"), "`shop`.`users`");
        assert_eq!(quote_identifier("users u"), "users u");
        assert_eq!(quote_identifier("`users`"), "`users`");
    }

    #[test]
    fn test_build_insert() {
        let data = row(json!({"name": "Bob", "age": 30}));

        assert_eq!(
            SqlGenerator::build_insert(&data, &Placeholder::None),
            " (`name`, `age`) VALUES ('Bob', 30) "
        );
        assert_eq!(
            SqlGenerator::build_insert(&data, &Placeholder::Named),
            " (`name`, `age`) VALUES (:name, :age) "
        );
        assert_eq!(
            SqlGenerator::build_insert(&data, &Placeholder::Wildcard("?".to_string())),
            " (`name`, `age`) VALUES (?, ?) "
        );
    }

    #[test]
    fn test_build_update() {
        let data = row(json!({"age": 31, "name": "Bob"}));

        assert_eq!(
            SqlGenerator::build_update(&data, &Placeholder::None),
            " `age` = 31, `name` = 'Bob' "
        );
        assert_eq!(
            SqlGenerator::build_update(&data, &Placeholder::Named),
            " `age` = :age, `name` = :name "
        );
        assert_eq!(
            SqlGenerator::build_update(&data, &Placeholder::Wildcard("?".to_string())),
            " `age` = ?, `name` = ? "
        );
    }

    #[test]
    fn test_build_in() {
        assert_eq!(SqlGenerator::build_in("x", &[], false), " TRUE ");
        assert_eq!(SqlGenerator::build_in("x", &[json!(1)], false), "`x` = 1");
        assert_eq!(
            SqlGenerator::build_in("x", &[json!(1), json!(2)], false),
            "`x` IN (1, 2)"
        );
    }

    #[test]
    fn test_build_in_negated() {
        assert_eq!(SqlGenerator::build_in("x", &[], true), " TRUE ");
        assert_eq!(SqlGenerator::build_in("x", &[json!(1)], true), "`x` != 1");
        assert_eq!(
            SqlGenerator::build_in("x", &[json!("a"), json!("b")], true),
            "`x` NOT IN ('a', 'b')"
        );
    }

    #[test]
    fn test_build_in_dotted_field() {
        assert_eq!(
            SqlGenerator::build_in("u.status", &[json!("active")], false),
            "`u`.`status` = 'active'"
        );
    }

    #[test]
    fn test_build_condition() {
        assert_eq!(SqlGenerator::build_condition(&[]).unwrap(), None);

        let conditions = vec![Condition::from("a = 1"), Condition::from(["b = 2", "c = 3"])];
        assert_eq!(
            SqlGenerator::build_condition(&conditions).unwrap().as_deref(),
            Some("a = 1 AND (b = 2 OR c = 3)")
        );
    }

    #[test]
    fn test_build_table_list_requires_a_table() {
        assert_eq!(
            SqlGenerator::build_table_list(&[]),
            Err(StatementError::NoTable)
        );
        assert_eq!(
            SqlGenerator::build_table_list(&["users".into(), "roles r".into()]).unwrap(),
            "`users`, roles r"
        );
    }

    #[test]
    fn test_build_order_clause() {
        let order_by = vec![
            ("name".to_string(), Some(SortOrder::Asc)),
            ("created_at".to_string(), None),
        ];
        assert_eq!(
            SqlGenerator::build_order_clause(&order_by),
            "name ASC, created_at"
        );
    }
}
