//! AND / OR conjunctions of fragments.

use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::predicate::{SQL_FALSE, SQL_TRUE};
use crate::Fragment;
use sqlweave_core::{Result, Value};

/// Render `parts` joined by `sep` inside one pair of parentheses.
///
/// Parts that render to empty text are skipped. With no parts at all the
/// identity element `empty` is returned instead.
fn join(parts: &[FragmentRef], sep: &str, empty: &str) -> Result<(String, Vec<Value>)> {
    if parts.is_empty() {
        return Ok((empty.to_string(), Vec::new()));
    }

    let mut sql_parts = Vec::with_capacity(parts.len());
    let mut args = Vec::new();
    for part in parts {
        let (sql, part_args) = part.to_sql_nested()?;
        if sql.is_empty() {
            continue;
        }
        sql_parts.push(sql);
        args.extend(part_args);
    }

    if sql_parts.is_empty() {
        return Ok((String::new(), args));
    }
    Ok((format!("({})", sql_parts.join(sep)), args))
}

macro_rules! conjunction {
    ($(#[$doc:meta])* $name:ident, $sep:literal, $empty:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            parts: Vec<FragmentRef>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Append a child fragment.
            pub fn push(mut self, part: impl IntoFragment) -> Self {
                self.parts.push(part.into_fragment());
                self
            }

            pub fn len(&self) -> usize {
                self.parts.len()
            }

            pub fn is_empty(&self) -> bool {
                self.parts.is_empty()
            }
        }

        impl Fragment for $name {
            fn to_sql(&self) -> Result<(String, Vec<Value>)> {
                join(&self.parts, $sep, $empty)
            }
        }

        impl<F: IntoFragment> FromIterator<F> for $name {
            fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
                Self {
                    parts: iter.into_iter().map(IntoFragment::into_fragment).collect(),
                }
            }
        }
    };
}

conjunction! {
    /// Conjunction of fragments: `(a AND b AND ...)`.
    ///
    /// An empty conjunction renders as `(1=1)`.
    ///
    /// ```
    /// use sqlweave_query::{And, Eq, Fragment, Gt};
    ///
    /// let cond = And::new()
    ///     .push(Eq::new().with("status", "active"))
    ///     .push(Gt::new().with("age", 18));
    /// assert_eq!(cond.to_sql().unwrap().0, "(status = ? AND age > ?)");
    /// ```
    And, " AND ", SQL_TRUE
}

conjunction! {
    /// Disjunction of fragments: `(a OR b OR ...)`.
    ///
    /// An empty disjunction renders as `(1=0)`.
    Or, " OR ", SQL_FALSE
}

impl_fragment_conversions!(And, Or);
