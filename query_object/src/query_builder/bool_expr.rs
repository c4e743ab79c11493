//! Boolean expression compiler
//!
//! Turns a nested list of condition fragments into a single SQL boolean
//! expression. The logical operator alternates with nesting depth: the top
//! level joins with `AND` (when `use_and` is set), the level below with `OR`,
//! the next with `AND` again, and so on.
//!
//! ```text
//! [[a, b], [c, d]]  --(and)-->  (a OR b) AND (c OR d)
//! [[a, b], [c, d]]  --(or)--->  (a AND b) OR (c AND d)
//! [a]               --(and)-->  a   (compiled as `a` with the flag flipped)
//! ```
//!
//! A single-element list adds no parentheses but still flips the operator
//! for everything below it.

/// Node of a condition tree whose leaves are already-rendered SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolExpr {
    Term(String),
    List(Vec<BoolExpr>),
}

impl BoolExpr {
    /// Create a leaf node
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(text.into())
    }

    /// Create a list node
    pub fn list<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<BoolExpr>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Empty text or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            BoolExpr::Term(text) => text.is_empty(),
            BoolExpr::List(items) => items.is_empty(),
        }
    }

    /// Lists of more than one element get parenthesized when nested
    fn is_compound(&self) -> bool {
        matches!(self, BoolExpr::List(items) if items.len() > 1)
    }

    /// Compile this node, see [`compile`]
    pub fn compile(&self, use_and: bool) -> Option<String> {
        compile(self, use_and)
    }
}

impl From<&str> for BoolExpr {
    fn from(text: &str) -> Self {
        Self::Term(text.to_string())
    }
}

impl From<String> for BoolExpr {
    fn from(text: String) -> Self {
        Self::Term(text)
    }
}

impl<E: Into<BoolExpr>> From<Vec<E>> for BoolExpr {
    fn from(items: Vec<E>) -> Self {
        Self::list(items)
    }
}

impl<E: Into<BoolExpr>, const N: usize> From<[E; N]> for BoolExpr {
    fn from(items: [E; N]) -> Self {
        Self::list(items)
    }
}

/// Compile `expr` into a boolean expression.
///
/// The first level of a list is joined with `AND` if `use_and` is true and
/// `OR` otherwise; each nested level inverts the operator. Returns `None` for
/// an empty node. An element that compiles to nothing contributes an empty
/// string to its parent's join.
pub fn compile(expr: &BoolExpr, use_and: bool) -> Option<String> {
    if expr.is_empty() {
        return None;
    }

    match expr {
        BoolExpr::Term(text) => Some(text.clone()),
        BoolExpr::List(items) if items.len() == 1 => compile(&items[0], !use_and),
        BoolExpr::List(items) => {
            let operator = if use_and { " AND " } else { " OR " };

            let parts = items
                .iter()
                .map(|item| {
                    let compiled = compile(item, !use_and).unwrap_or_default();
                    if item.is_compound() {
                        format!("({})", compiled)
                    } else {
                        compiled
                    }
                })
                .collect::<Vec<_>>();

            Some(parts.join(operator))
        }
    }
}
