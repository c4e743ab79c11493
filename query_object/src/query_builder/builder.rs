//! Query builder utilities
//!
//! This module provides the mutable, cached statement builder.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::errors::StatementError;
use crate::query_builder::fragment::{Condition, Fragment, IntoFragments, StatementHandle};
use crate::query_builder::join::{Join, JoinType};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::{Bound, Pagination};
use crate::query_builder::sql_generation::{Placeholder, SqlGenerator};

/// Statement mode. The discriminants are bit flags so a set of kinds can be
/// tested at once, e.g. `StatementKind::ALL ^ StatementKind::Insert.bits()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Select,
    Update,
    Insert,
    Delete,
}

impl StatementKind {
    pub const ALL: u8 = 15;

    pub fn bits(&self) -> u8 {
        match self {
            StatementKind::Select => 1,
            StatementKind::Update => 2,
            StatementKind::Insert => 4,
            StatementKind::Delete => 8,
        }
    }

    /// Whether this kind is part of `mask`
    pub fn accept(&self, mask: u8) -> bool {
        self.bits() & mask != 0
    }
}

/// Mutable SQL statement state with a memoized rendering.
///
/// Every setter takes and returns the builder by value and drops the cached
/// SQL. Getters never touch the cache. Nested statements are shared through
/// [`StatementHandle`]s and built on demand when the parent is built.
///
/// Prefer [`StatementBuilder::build_query`] over `to_string()` unless a
/// table is known to be set: formatting a statement that cannot be built
/// returns [`fmt::Error`], which makes `to_string()` panic.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    pub(crate) kind: StatementKind,
    pub(crate) alias: Option<String>,
    pub(crate) fields: Vec<Fragment>,
    pub(crate) tables: Vec<Fragment>,
    pub(crate) joins: Vec<Join>,
    pub(crate) group_by: Vec<Fragment>,
    pub(crate) having: Vec<Condition>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) order_by: Vec<(String, Option<SortOrder>)>,
    pub(crate) pagination: Pagination,
    pub(crate) data: Map<String, Value>,
    pub(crate) raw_sql: Option<String>,
    cached_sql: RefCell<Option<String>>,
    rebuilds: Cell<u64>,
}

fn merge_unique<T: PartialEq>(target: &mut Vec<T>, items: impl IntoIterator<Item = T>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

fn non_empty(fragments: impl IntoFragments) -> Vec<Fragment> {
    fragments
        .into_fragments()
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.cached_sql.get_mut().take();
    }

    /// Add fields to select and switch to SELECT. Empty input is ignored.
    pub fn select(mut self, fields: impl IntoFragments) -> Self {
        let fields = non_empty(fields);
        if fields.is_empty() {
            return self;
        }

        self.kind = StatementKind::Select;
        merge_unique(&mut self.fields, fields);
        self.invalidate();
        self
    }

    /// Add one or more tables
    pub fn from(mut self, tables: impl IntoFragments) -> Self {
        let tables = non_empty(tables);
        if tables.is_empty() {
            return self;
        }

        merge_unique(&mut self.tables, tables);
        self.invalidate();
        self
    }

    /// Switch to INSERT into `table` with the given column values
    pub fn insert<I, K, V>(mut self, table: impl IntoFragments, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.kind = StatementKind::Insert;
        self.invalidate();
        self.from(table).data(data)
    }

    /// Switch to UPDATE of `table`, setting `data` on rows matching `condition`
    pub fn update<I, K, V>(
        mut self,
        table: impl IntoFragments,
        data: I,
        condition: impl Into<Condition>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.kind = StatementKind::Update;
        self.invalidate();
        self.from(table).data(data).where_clause(condition)
    }

    /// Switch to DELETE from `table` for rows matching `condition`
    pub fn delete(mut self, table: impl IntoFragments, condition: impl Into<Condition>) -> Self {
        self.kind = StatementKind::Delete;
        self.invalidate();
        self.from(table).where_clause(condition)
    }

    /// Merge column values used by INSERT and UPDATE; later values win
    pub fn data<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (column, value) in data {
            self.data.insert(column.into(), value.into());
        }
        self.invalidate();
        self
    }

    /// Append a join; the type defaults to INNER
    pub fn join(mut self, target: impl Into<Fragment>, join_type: impl Into<Option<JoinType>>) -> Self {
        let target = target.into();
        if target.is_empty() {
            return self;
        }

        self.joins
            .push(Join::new(join_type.into().unwrap_or_default(), target));
        self.invalidate();
        self
    }

    /// Append several joins of the same type
    pub fn joins(self, targets: impl IntoFragments, join_type: impl Into<Option<JoinType>>) -> Self {
        let join_type = join_type.into();
        targets
            .into_fragments()
            .into_iter()
            .fold(self, |builder, target| builder.join(target, join_type))
    }

    pub fn inner_join(self, target: impl Into<Fragment>) -> Self {
        self.join(target, JoinType::Inner)
    }

    pub fn left_join(self, target: impl Into<Fragment>) -> Self {
        self.join(target, JoinType::Left)
    }

    pub fn right_join(self, target: impl Into<Fragment>) -> Self {
        self.join(target, JoinType::Right)
    }

    /// Remove the first join matching both target and type
    pub fn remove_join(mut self, target: impl Into<Fragment>, join_type: impl Into<Option<JoinType>>) -> Self {
        let join = Join::new(join_type.into().unwrap_or_default(), target);
        if let Some(index) = self.joins.iter().position(|existing| *existing == join) {
            self.joins.remove(index);
        }
        self.invalidate();
        self
    }

    pub fn group_by(mut self, fields: impl IntoFragments) -> Self {
        let fields = non_empty(fields);
        if fields.is_empty() {
            return self;
        }

        merge_unique(&mut self.group_by, fields);
        self.invalidate();
        self
    }

    /// Add HAVING conditions. A top-level group contributes each of its
    /// members as a separate condition.
    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        let condition = condition.into();
        if condition.is_empty() {
            return self;
        }

        merge_unique(&mut self.having, condition.into_entries());
        self.invalidate();
        self
    }

    /// Add a WHERE condition. A group is kept as a single nested entry, so
    /// `["a", "b"]` renders as `a OR b`.
    pub fn where_clause(mut self, condition: impl Into<Condition>) -> Self {
        let condition = condition.into();
        if condition.is_empty() {
            return self;
        }

        merge_unique(&mut self.conditions, [condition]);
        self.invalidate();
        self
    }

    /// Order by `field`. Setting a field again replaces its direction and
    /// keeps its position.
    pub fn order_by(mut self, field: impl Into<String>, direction: impl Into<Option<SortOrder>>) -> Self {
        let field = field.into();
        if field.is_empty() {
            return self;
        }

        let direction = direction.into();
        match self.order_by.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = direction,
            None => self.order_by.push((field, direction)),
        }
        self.invalidate();
        self
    }

    /// Numeric input is truncated to an integer, other text is kept as-is
    pub fn limit(mut self, limit: impl Into<Bound>) -> Self {
        self.pagination.limit = Some(limit.into());
        self.invalidate();
        self
    }

    /// Numeric input is truncated to an integer, other text is kept as-is
    pub fn offset(mut self, offset: impl Into<Bound>) -> Self {
        self.pagination.offset = Some(offset.into());
        self.invalidate();
        self
    }

    /// Name used when this statement is embedded as a derived table
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = (!alias.is_empty()).then_some(alias);
        self.invalidate();
        self
    }

    /// Use `sql` verbatim instead of assembling the statement.
    /// Data and alias are left untouched.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.raw_sql = Some(sql.into());
        self.invalidate();
        self
    }

    /// Remove selected fields. Like `select`, this switches to SELECT.
    pub fn remove_fields(mut self, fields: impl IntoFragments) -> Self {
        let fields = non_empty(fields);
        if fields.is_empty() {
            return self;
        }

        self.kind = StatementKind::Select;
        self.fields.retain(|field| !fields.contains(field));
        self.invalidate();
        self
    }

    pub fn remove_tables(mut self, tables: impl IntoFragments) -> Self {
        let tables = tables.into_fragments();
        self.tables.retain(|table| !tables.contains(table));
        self.invalidate();
        self
    }

    pub fn remove_group_by(mut self, fields: impl IntoFragments) -> Self {
        let fields = fields.into_fragments();
        self.group_by.retain(|field| !fields.contains(field));
        self.invalidate();
        self
    }

    pub fn remove_having(mut self, condition: impl Into<Condition>) -> Self {
        let entries = condition.into().into_entries();
        self.having.retain(|existing| !entries.contains(existing));
        self.invalidate();
        self
    }

    pub fn remove_where(mut self, condition: impl Into<Condition>) -> Self {
        let condition = condition.into();
        self.conditions.retain(|existing| *existing != condition);
        self.invalidate();
        self
    }

    pub fn remove_order_by(mut self, field: &str) -> Self {
        self.order_by.retain(|(existing, _)| existing != field);
        self.invalidate();
        self
    }

    pub fn clear_alias(mut self) -> Self {
        self.alias = None;
        self.invalidate();
        self
    }

    pub fn clear_fields(mut self) -> Self {
        self.fields.clear();
        self.invalidate();
        self
    }

    pub fn clear_tables(mut self) -> Self {
        self.tables.clear();
        self.invalidate();
        self
    }

    pub fn clear_joins(mut self) -> Self {
        self.joins.clear();
        self.invalidate();
        self
    }

    pub fn clear_group_by(mut self) -> Self {
        self.group_by.clear();
        self.invalidate();
        self
    }

    pub fn clear_having(mut self) -> Self {
        self.having.clear();
        self.invalidate();
        self
    }

    pub fn clear_where(mut self) -> Self {
        self.conditions.clear();
        self.invalidate();
        self
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self.invalidate();
        self
    }

    pub fn clear_limit(mut self) -> Self {
        self.pagination.limit = None;
        self.invalidate();
        self
    }

    pub fn clear_offset(mut self) -> Self {
        self.pagination.offset = None;
        self.invalidate();
        self
    }

    pub fn clear_data(mut self) -> Self {
        self.data.clear();
        self.invalidate();
        self
    }

    pub fn clear_sql(mut self) -> Self {
        self.raw_sql = None;
        self.invalidate();
        self
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn get_fields(&self) -> &[Fragment] {
        &self.fields
    }

    pub fn get_tables(&self) -> &[Fragment] {
        &self.tables
    }

    pub fn get_joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn get_group_by(&self) -> &[Fragment] {
        &self.group_by
    }

    pub fn get_having(&self) -> &[Condition] {
        &self.having
    }

    pub fn get_where(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn get_order_by(&self) -> &[(String, Option<SortOrder>)] {
        &self.order_by
    }

    pub fn get_limit(&self) -> Option<&Bound> {
        self.pagination.limit.as_ref()
    }

    pub fn get_offset(&self) -> Option<&Bound> {
        self.pagination.offset.as_ref()
    }

    pub fn get_data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn get_sql(&self) -> Option<&str> {
        self.raw_sql.as_deref()
    }

    /// Number of times the statement text was actually assembled
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.get()
    }

    pub fn is_cached(&self) -> bool {
        self.cached_sql.borrow().is_some()
    }

    /// Freeze the builder into a shareable handle for use as a sub-query
    pub fn into_handle(self) -> StatementHandle {
        Rc::new(self)
    }

    /// Build the statement, reusing the cached text until the next mutation
    pub fn build_query(&self) -> Result<String, StatementError> {
        if let Some(sql) = self.cached_sql.borrow().clone() {
            trace_log!("Statement cache hit");
            return Ok(sql);
        }

        let sql = self.assemble(&Placeholder::None)?;
        self.rebuilds.set(self.rebuilds.get() + 1);
        debug_log!("Built {:?} statement: {}", self.kind, sql);

        *self.cached_sql.borrow_mut() = Some(sql.clone());
        Ok(sql)
    }

    /// Build the statement with INSERT/UPDATE values rendered as
    /// placeholders. The result is not cached.
    pub fn build_prepared(&self, placeholder: &Placeholder) -> Result<String, StatementError> {
        if *placeholder == Placeholder::None {
            return self.build_query();
        }

        self.assemble(placeholder)
    }

    fn assemble(&self, placeholder: &Placeholder) -> Result<String, StatementError> {
        if let Some(sql) = self.raw_sql.as_deref().filter(|sql| !sql.is_empty()) {
            return Ok(sql.to_string());
        }

        let not_insert = StatementKind::ALL ^ StatementKind::Insert.bits();
        let select = StatementKind::Select.bits();

        let mut sql = match self.kind {
            StatementKind::Select => {
                format!("SELECT {} FROM ", SqlGenerator::build_field_list(&self.fields)?)
            }
            StatementKind::Insert => "INSERT INTO ".to_string(),
            StatementKind::Update => "UPDATE ".to_string(),
            StatementKind::Delete => "DELETE FROM ".to_string(),
        };

        sql.push_str(&SqlGenerator::build_table_list(&self.tables)?);
        sql.push(' ');

        if !self.data.is_empty() {
            match self.kind {
                StatementKind::Update => {
                    sql.push_str("SET");
                    sql.push_str(&SqlGenerator::build_update(&self.data, placeholder));
                    sql.push(' ');
                }
                StatementKind::Insert => {
                    sql.push_str(&SqlGenerator::build_insert(&self.data, placeholder));
                }
                _ => {}
            }
        }

        if self.kind.accept(select) && !self.joins.is_empty() {
            sql.push_str(&SqlGenerator::build_join_clause(&self.joins)?);
            sql.push(' ');
        }

        if self.kind.accept(not_insert) {
            if let Some(condition) = SqlGenerator::build_condition(&self.conditions)? {
                sql.push_str(&format!("WHERE {} ", condition));
            }
        }

        if self.kind.accept(select) && !self.group_by.is_empty() {
            sql.push_str(&format!(
                "GROUP BY {} ",
                SqlGenerator::build_group_by_clause(&self.group_by)?
            ));

            if let Some(having) = SqlGenerator::build_condition(&self.having)? {
                sql.push_str(&format!("HAVING {} ", having));
            }
        }

        if self.kind.accept(not_insert) && !self.order_by.is_empty() {
            sql.push_str(&format!(
                "ORDER BY {} ",
                SqlGenerator::build_order_clause(&self.order_by)
            ));
        }

        sql.push_str(&self.pagination.to_sql());

        if let Some(alias) = &self.alias {
            if self.kind == StatementKind::Select {
                sql = format!("({}) {}", sql, alias);
            }
        }

        Ok(sql)
    }
}

// Cache state is not part of a statement's identity
impl PartialEq for StatementBuilder {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.alias == other.alias
            && self.fields == other.fields
            && self.tables == other.tables
            && self.joins == other.joins
            && self.group_by == other.group_by
            && self.having == other.having
            && self.conditions == other.conditions
            && self.order_by == other.order_by
            && self.pagination == other.pagination
            && self.data == other.data
            && self.raw_sql == other.raw_sql
    }
}

/// Formatting fails with [`fmt::Error`] when the statement cannot be built
impl fmt::Display for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = self.build_query().map_err(|_| fmt::Error)?;
        f.write_str(&sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_masks() {
        let not_insert = StatementKind::ALL ^ StatementKind::Insert.bits();

        assert!(StatementKind::Select.accept(not_insert));
        assert!(StatementKind::Update.accept(not_insert));
        assert!(StatementKind::Delete.accept(not_insert));
        assert!(!StatementKind::Insert.accept(not_insert));
        assert!(StatementKind::Insert.accept(StatementKind::ALL));
        assert_eq!(StatementKind::default(), StatementKind::Select);
    }

    #[test]
    fn test_new_builder_is_empty_select() {
        let builder = StatementBuilder::new();

        assert_eq!(builder.kind(), StatementKind::Select);
        assert!(builder.get_fields().is_empty());
        assert!(builder.get_tables().is_empty());
        assert_eq!(builder.get_limit(), None);
        assert!(!builder.is_cached());
        assert_eq!(builder.rebuild_count(), 0);
    }

    #[test]
    fn test_merge_deduplicates() {
        let builder = StatementBuilder::new()
            .select(["id", "name"])
            .select(["name", "email"])
            .from("users")
            .from("users");

        assert_eq!(
            builder.get_fields(),
            &[
                Fragment::from("id"),
                Fragment::from("name"),
                Fragment::from("email")
            ]
        );
        assert_eq!(builder.get_tables().len(), 1);
    }

    #[test]
    fn test_empty_select_is_ignored() {
        let builder = StatementBuilder::new()
            .delete("users", "id = 1")
            .select(Vec::<&str>::new())
            .select("");

        assert_eq!(builder.kind(), StatementKind::Delete);
        assert!(builder.get_fields().is_empty());
    }

    #[test]
    fn test_equality_ignores_cache() {
        let built = StatementBuilder::new().from("users");
        built.build_query().unwrap();

        assert!(built.is_cached());
        assert_eq!(built, StatementBuilder::new().from("users"));
    }

    #[test]
    fn test_display_matches_build_query() {
        let builder = StatementBuilder::new().from("users").limit(1);
        assert_eq!(builder.to_string(), builder.build_query().unwrap());
    }

    #[test]
    fn test_display_without_table_is_format_error() {
        use std::fmt::Write;

        let builder = StatementBuilder::new().select("id");
        let mut out = String::new();

        assert!(write!(out, "{}", builder).is_err());
        assert!(matches!(builder.build_query(), Err(StatementError::NoTable)));
    }
}
