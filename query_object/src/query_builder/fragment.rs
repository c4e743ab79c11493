//! Statement fragments
//!
//! Fields, tables, join targets and conditions are either literal SQL text
//! or a nested statement that is rendered when the parent is built.

use std::borrow::Cow;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};

use crate::errors::StatementError;
use crate::query_builder::bool_expr::BoolExpr;
use crate::query_builder::builder::StatementBuilder;

/// Shared, read-only handle to a nested statement
pub type StatementHandle = Rc<StatementBuilder>;

/// Literal SQL text or a nested statement
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Literal(String),
    SubQuery(StatementHandle),
}

impl Fragment {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn sub_query(statement: impl Into<StatementHandle>) -> Self {
        Self::SubQuery(statement.into())
    }

    /// Only an empty literal is empty; nested statements never are
    pub fn is_empty(&self) -> bool {
        matches!(self, Fragment::Literal(text) if text.is_empty())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Fragment::Literal(text) => Some(text),
            Fragment::SubQuery(_) => None,
        }
    }

    /// Render the fragment, building a nested statement if needed
    pub fn resolve(&self) -> Result<Cow<'_, str>, StatementError> {
        match self {
            Fragment::Literal(text) => Ok(Cow::Borrowed(text)),
            Fragment::SubQuery(statement) => statement.build_query().map(Cow::Owned),
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<&String> for Fragment {
    fn from(text: &String) -> Self {
        Self::Literal(text.clone())
    }
}

impl From<StatementBuilder> for Fragment {
    fn from(statement: StatementBuilder) -> Self {
        Self::SubQuery(Rc::new(statement))
    }
}

impl From<StatementHandle> for Fragment {
    fn from(statement: StatementHandle) -> Self {
        Self::SubQuery(statement)
    }
}

impl From<&StatementHandle> for Fragment {
    fn from(statement: &StatementHandle) -> Self {
        Self::SubQuery(Rc::clone(statement))
    }
}

// Declarative input can only carry literal text
impl<'de> Deserialize<'de> for Fragment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Fragment::Literal)
    }
}

/// Conversion into one or more fragments, so setters accept a single
/// value or a collection
pub trait IntoFragments {
    fn into_fragments(self) -> Vec<Fragment>;
}

macro_rules! single_fragment {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFragments for $ty {
                fn into_fragments(self) -> Vec<Fragment> {
                    vec![self.into()]
                }
            }
        )*
    };
}

single_fragment!(
    &str,
    String,
    &String,
    Fragment,
    StatementBuilder,
    StatementHandle,
    &StatementHandle,
);

impl<T: Into<Fragment>> IntoFragments for Vec<T> {
    fn into_fragments(self) -> Vec<Fragment> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Fragment>, const N: usize> IntoFragments for [T; N] {
    fn into_fragments(self) -> Vec<Fragment> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Fragment> + Clone> IntoFragments for &[T] {
    fn into_fragments(self) -> Vec<Fragment> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Condition tree used by WHERE and HAVING.
///
/// A group is compiled one nesting level deeper than its parent, so its
/// members are joined with the opposite operator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Fragment(Fragment),
    Group(Vec<Condition>),
}

impl Condition {
    pub fn group<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::Group(items.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Fragment(fragment) => fragment.is_empty(),
            Condition::Group(items) => items.is_empty(),
        }
    }

    /// Split a top-level group into its members; anything else is a single
    /// entry
    pub fn into_entries(self) -> Vec<Condition> {
        match self {
            Condition::Group(items) => items,
            other => vec![other],
        }
    }

    /// Render every nested statement, producing a tree of plain text
    pub fn resolve(&self) -> Result<BoolExpr, StatementError> {
        match self {
            Condition::Fragment(fragment) => Ok(BoolExpr::Term(fragment.resolve()?.into_owned())),
            Condition::Group(items) => items
                .iter()
                .map(Condition::resolve)
                .collect::<Result<Vec<_>, _>>()
                .map(BoolExpr::List),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::Group(Vec::new())
    }
}

impl From<Fragment> for Condition {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Self::Fragment(text.into())
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Self::Fragment(text.into())
    }
}

impl From<&String> for Condition {
    fn from(text: &String) -> Self {
        Self::Fragment(text.into())
    }
}

impl From<StatementBuilder> for Condition {
    fn from(statement: StatementBuilder) -> Self {
        Self::Fragment(statement.into())
    }
}

impl From<StatementHandle> for Condition {
    fn from(statement: StatementHandle) -> Self {
        Self::Fragment(statement.into())
    }
}

impl<C: Into<Condition>> From<Vec<C>> for Condition {
    fn from(items: Vec<C>) -> Self {
        Self::group(items)
    }
}

impl<C: Into<Condition>, const N: usize> From<[C; N]> for Condition {
    fn from(items: [C; N]) -> Self {
        Self::group(items)
    }
}
