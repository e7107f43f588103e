//! Map-based predicate sugar.
//!
//! Each predicate type is a map from column name to bind argument. Entries
//! render as `col <op> ?` clauses joined by ` AND `, in column-name order.

use crate::arg::{Arg, Resolved};
use crate::fragment::impl_fragment_conversions;
use crate::placeholder::placeholders;
use crate::Fragment;
use sqlweave_core::{Error, PredicateError, PredicateFamily, RejectedValue, Result, Value};
use std::collections::BTreeMap;

/// Rendered for an empty map, and for an empty list under `NotEq`.
pub(crate) const SQL_TRUE: &str = "(1=1)";
/// Rendered for an empty list under `Eq`.
pub(crate) const SQL_FALSE: &str = "(1=0)";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Eq,
    NotEq,
    Lt,
    LtOrEq,
    Gt,
    GtOrEq,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl Op {
    const fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::NotEq => "<>",
            Op::Lt => "<",
            Op::LtOrEq => "<=",
            Op::Gt => ">",
            Op::GtOrEq => ">=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::ILike => "ILIKE",
            Op::NotILike => "NOT ILIKE",
        }
    }

    /// Families that only accept scalars. Equality accepts everything.
    const fn family(self) -> Option<PredicateFamily> {
        match self {
            Op::Eq | Op::NotEq => None,
            Op::Lt | Op::LtOrEq | Op::Gt | Op::GtOrEq => Some(PredicateFamily::Comparison),
            Op::Like | Op::NotLike | Op::ILike | Op::NotILike => Some(PredicateFamily::Pattern),
        }
    }

    const fn negated(self) -> bool {
        matches!(self, Op::NotEq)
    }
}

fn rejected(column: &str, family: PredicateFamily, value: RejectedValue) -> Error {
    tracing::debug!(column, ?family, ?value, "predicate value rejected");
    Error::InvalidPredicate(PredicateError {
        column: column.to_string(),
        family,
        rejected: value,
    })
}

fn render_map(entries: &BTreeMap<String, Arg>, op: Op) -> Result<(String, Vec<Value>)> {
    if entries.is_empty() {
        return Ok((SQL_TRUE.to_string(), Vec::new()));
    }

    let mut parts = Vec::with_capacity(entries.len());
    let mut args = Vec::with_capacity(entries.len());

    for (column, arg) in entries {
        let part = match arg.resolve()? {
            Resolved::Null => match op.family() {
                Some(family) => return Err(rejected(column, family, RejectedValue::Null)),
                None if op.negated() => format!("{column} IS NOT NULL"),
                None => format!("{column} IS NULL"),
            },
            Resolved::List(items) => match op.family() {
                Some(family) => return Err(rejected(column, family, RejectedValue::List)),
                None if items.is_empty() => {
                    let sql = if op.negated() { SQL_TRUE } else { SQL_FALSE };
                    sql.to_string()
                }
                None => {
                    args.extend(items.iter().cloned());
                    let keyword = if op.negated() { "NOT IN" } else { "IN" };
                    format!("{column} {keyword} ({})", placeholders(items.len()))
                }
            },
            Resolved::Fragment(fragment) => {
                let (sql, nested) = fragment.to_sql_value()?;
                args.extend(nested);
                format!("{column} {} {sql}", op.as_str())
            }
            Resolved::Scalar(value) => {
                args.push(value);
                format!("{column} {} ?", op.as_str())
            }
        };
        parts.push(part);
    }

    Ok((parts.join(" AND "), args))
}

macro_rules! predicate_map {
    ($($(#[$doc:meta])* $name:ident => $op:expr;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default)]
            pub struct $name {
                entries: BTreeMap<String, Arg>,
            }

            impl $name {
                /// Create an empty map.
                pub fn new() -> Self {
                    Self::default()
                }

                /// Add or replace the entry for `column`.
                pub fn with(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
                    self.entries.insert(column.into(), value.into());
                    self
                }

                pub fn len(&self) -> usize {
                    self.entries.len()
                }

                pub fn is_empty(&self) -> bool {
                    self.entries.is_empty()
                }
            }

            impl Fragment for $name {
                fn to_sql(&self) -> Result<(String, Vec<Value>)> {
                    render_map(&self.entries, $op)
                }
            }

            impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for $name {
                fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                    Self {
                        entries: iter
                            .into_iter()
                            .map(|(k, v)| (k.into(), v.into()))
                            .collect(),
                    }
                }
            }

            impl<K: Into<String>, V: Into<Arg>, const N: usize> From<[(K, V); N]> for $name {
                fn from(entries: [(K, V); N]) -> Self {
                    entries.into_iter().collect()
                }
            }
        )*

        impl_fragment_conversions!($($name),*);
    };
}

predicate_map! {
    /// Equality: `col = ?`, `col IS NULL`, or `col IN (?,...)` for lists.
    ///
    /// ```
    /// use sqlweave_query::{Eq, Fragment};
    ///
    /// let eq = Eq::new().with("id", vec![1, 2, 3]).with("deleted_at", None::<i64>);
    /// let (sql, args) = eq.to_sql().unwrap();
    /// assert_eq!(sql, "deleted_at IS NULL AND id IN (?,?,?)");
    /// assert_eq!(args.len(), 3);
    /// ```
    Eq => Op::Eq;
    /// Inequality: `col <> ?`, `col IS NOT NULL`, or `col NOT IN (?,...)`.
    NotEq => Op::NotEq;
    /// `col < ?`
    Lt => Op::Lt;
    /// `col <= ?`
    LtOrEq => Op::LtOrEq;
    /// `col > ?`
    Gt => Op::Gt;
    /// `col >= ?`
    GtOrEq => Op::GtOrEq;
    /// `col LIKE ?`
    Like => Op::Like;
    /// `col NOT LIKE ?`
    NotLike => Op::NotLike;
    /// `col ILIKE ?` (PostgreSQL case-insensitive match)
    ILike => Op::ILike;
    NotILike => Op::NotILike;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Valuer;
    use crate::expr::Expr;
    use crate::select::SelectBuilder;

    #[derive(Debug)]
    struct Broken;

    impl Valuer for Broken {
        fn value(&self) -> Result<Value> {
            Err(Error::Valuer(sqlweave_core::ValuerError {
                message: "no value".to_string(),
                source: None,
            }))
        }
    }

    #[test]
    fn test_eq_scalar() {
        let (sql, args) = Eq::new().with("id", 1).to_sql().unwrap();
        assert_eq!(sql, "id = ?");
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn test_eq_keys_are_sorted() {
        let eq = Eq::from([("z", 3), ("a", 1), ("m", 2)]);
        let (sql, args) = eq.to_sql().unwrap();
        assert_eq!(sql, "a = ? AND m = ? AND z = ?");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(eq.to_sql().unwrap().0, sql);
    }

    #[test]
    fn test_eq_null_and_list() {
        let eq = Eq::new().with("x", vec![1, 2, 3]).with("y", None::<i32>);
        let (sql, args) = eq.to_sql().unwrap();
        assert_eq!(sql, "x IN (?,?,?) AND y IS NULL");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let (sql, _) = NotEq::new().with("y", None::<i32>).to_sql().unwrap();
        assert_eq!(sql, "y IS NOT NULL");
    }

    #[test]
    fn test_not_eq_list() {
        let (sql, args) = NotEq::new().with("id", [7i64, 8]).to_sql().unwrap();
        assert_eq!(sql, "id NOT IN (?,?)");
        assert_eq!(args, vec![Value::BigInt(7), Value::BigInt(8)]);
    }

    #[test]
    fn test_empty_list() {
        let (sql, args) = Eq::new().with("x", Vec::<i32>::new()).to_sql().unwrap();
        assert_eq!(sql, "(1=0)");
        assert!(args.is_empty());

        let (sql, _) = NotEq::new().with("x", Vec::<i32>::new()).to_sql().unwrap();
        assert_eq!(sql, "(1=1)");
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(Eq::new().to_sql().unwrap().0, "(1=1)");
        assert_eq!(NotEq::new().to_sql().unwrap().0, "(1=1)");
        assert_eq!(Gt::new().to_sql().unwrap().0, "(1=1)");
        assert!(Like::new().to_sql().unwrap().1.is_empty());
    }

    #[test]
    fn test_bytes_are_one_value() {
        let (sql, args) = Eq::new().with("data", b"test".to_vec()).to_sql().unwrap();
        assert_eq!(sql, "data = ?");
        assert_eq!(args, vec![Value::Bytes(b"test".to_vec())]);
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(Lt::new().with("a", 1).to_sql().unwrap().0, "a < ?");
        assert_eq!(LtOrEq::new().with("a", 1).to_sql().unwrap().0, "a <= ?");
        assert_eq!(Gt::new().with("a", 1).to_sql().unwrap().0, "a > ?");
        assert_eq!(GtOrEq::new().with("a", 1).to_sql().unwrap().0, "a >= ?");
    }

    #[test]
    fn test_comparison_rejects_null_and_list() {
        let err = Lt::new().with("x", None::<i32>).to_sql().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPredicate(PredicateError {
                family: PredicateFamily::Comparison,
                rejected: RejectedValue::Null,
                ..
            })
        ));
        assert!(err.to_string().contains("cannot use null with less than or greater than operators"));

        let err = GtOrEq::new().with("x", vec![1, 2]).to_sql().unwrap_err();
        assert!(err.to_string().contains("cannot use array or slice"));
    }

    #[test]
    fn test_pattern_operators() {
        let (sql, args) = Like::new().with("name", "%irrel").to_sql().unwrap();
        assert_eq!(sql, "name LIKE ?");
        assert_eq!(args, vec![Value::Text("%irrel".into())]);
        assert_eq!(
            NotLike::new().with("name", "%a").to_sql().unwrap().0,
            "name NOT LIKE ?"
        );
        assert_eq!(
            ILike::new().with("name", "sq%").to_sql().unwrap().0,
            "name ILIKE ?"
        );
        assert_eq!(
            NotILike::new().with("name", "sq%").to_sql().unwrap().0,
            "name NOT ILIKE ?"
        );
    }

    #[test]
    fn test_pattern_rejects_null_and_list() {
        let err = ILike::new().with("name", None::<&str>).to_sql().unwrap_err();
        assert!(err.to_string().contains("cannot use null with like operators"));

        let err = NotLike::new().with("name", vec!["a"]).to_sql().unwrap_err();
        assert!(err.to_string().contains("array or slice with like operators"));
    }

    #[test]
    fn test_fragment_value() {
        let eq = Eq::new().with("total", Expr::new("(SELECT max(x) FROM t WHERE y = ?)", [2]));
        let (sql, args) = eq.to_sql().unwrap();
        assert_eq!(sql, "total = (SELECT max(x) FROM t WHERE y = ?)");
        assert_eq!(args, vec![Value::Int(2)]);
    }

    #[test]
    fn test_subquery_value_is_parenthesised() {
        let max = SelectBuilder::new().column("max(id)").from("t");
        let (sql, args) = Eq::new().with("id", max).to_sql().unwrap();
        assert_eq!(sql, "id = (SELECT max(id) FROM t)");
        assert!(args.is_empty());

        let avg = SelectBuilder::new()
            .column("avg(x)")
            .from("t")
            .filter(Expr::new("y = ?", [1]));
        let (sql, args) = Gt::new().with("x", avg).to_sql().unwrap();
        assert_eq!(sql, "x > (SELECT avg(x) FROM t WHERE y = ?)");
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn test_valuer_error_propagates() {
        let eq = Eq::new().with("x", Arg::valuer(Broken));
        assert!(matches!(eq.to_sql(), Err(Error::Valuer(_))));
    }

    #[test]
    fn test_from_iterator() {
        let gt: Gt = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(gt.len(), 2);
        assert_eq!(gt.to_sql().unwrap().0, "a > ? AND b > ?");
    }
}
