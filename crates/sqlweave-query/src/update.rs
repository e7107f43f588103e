//! UPDATE statement builder.

use crate::arg::Arg;
use crate::buffer::render_parts;
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::placeholder::{MARKER, PlaceholderStyle};
use crate::statement::finish_statement;
use crate::Fragment;
use sqlweave_core::{Error, Result, StructuralErrorKind, Value};
use std::collections::BTreeMap;

/// An UPDATE statement builder.
///
/// ```
/// use sqlweave_query::{Eq, Expr, Fragment, UpdateBuilder};
///
/// let update = UpdateBuilder::new("users")
///     .set("name", "bob")
///     .set("visits", Expr::new("visits + ?", [1]))
///     .filter(Eq::new().with("id", 7));
/// let (sql, args) = update.to_sql().unwrap();
/// assert_eq!(sql, "UPDATE users SET name = ?, visits = visits + ? WHERE id = ?");
/// assert_eq!(args.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    /// Placeholder style applied by `to_sql`
    style: PlaceholderStyle,
    /// Expressions written before UPDATE
    prefixes: Vec<FragmentRef>,
    /// Target table
    table: String,
    /// SET assignments, in call order
    set_clauses: Vec<(String, Arg)>,
    /// WHERE clause conditions
    where_parts: Vec<FragmentRef>,
    /// ORDER BY expressions
    order_bys: Vec<String>,
    /// LIMIT clause
    limit: Option<u64>,
    /// OFFSET clause
    offset: Option<u64>,
    /// Expressions written after the statement
    suffixes: Vec<FragmentRef>,
}

impl UpdateBuilder {
    /// Create an UPDATE of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub(crate) fn seeded(
        table: String,
        style: PlaceholderStyle,
        where_parts: Vec<FragmentRef>,
    ) -> Self {
        Self {
            style,
            table,
            where_parts,
            ..Self::default()
        }
    }

    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn prefix(mut self, prefix: impl IntoFragment) -> Self {
        self.prefixes.push(prefix.into_fragment());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Add `column = value`. A fragment value is inlined; a SELECT is
    /// wrapped in parentheses.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.set_clauses.push((column.into(), value.into()));
        self
    }

    /// Add a SET clause per entry, in column-name order.
    pub fn set_map<I, K, V>(mut self, clauses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        let sorted: BTreeMap<String, Arg> = clauses
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.set_clauses.extend(sorted);
        self
    }

    /// Add a WHERE condition. Multiple conditions are joined with `AND`.
    pub fn filter(mut self, pred: impl IntoFragment) -> Self {
        self.where_parts.push(pred.into_fragment());
        self
    }

    pub fn order_by<I, S>(mut self, order_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys.extend(order_bys.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn suffix(mut self, suffix: impl IntoFragment) -> Self {
        self.suffixes.push(suffix.into_fragment());
        self
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn render(&self) -> Result<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(Error::structural(
                StructuralErrorKind::MissingTable,
                "update statements must specify a table",
            ));
        }
        if self.set_clauses.is_empty() {
            return Err(Error::structural(
                StructuralErrorKind::MissingSet,
                "update statements must have at least one Set clause",
            ));
        }

        let mut sql = String::new();
        let mut args = Vec::new();

        if let Some(prefix) = render_parts(&self.prefixes, " ", &mut args)? {
            sql.push_str(&prefix);
            sql.push(' ');
        }

        sql.push_str("UPDATE ");
        sql.push_str(&self.table);

        sql.push_str(" SET ");
        let mut sets = Vec::with_capacity(self.set_clauses.len());
        for (column, value) in &self.set_clauses {
            let value_sql = match value {
                Arg::Fragment(fragment) => {
                    let (value_sql, value_args) = fragment.to_sql_value()?;
                    args.extend(value_args);
                    value_sql
                }
                plain => {
                    args.push(plain.to_value()?);
                    MARKER.to_string()
                }
            };
            sets.push(format!("{column} = {value_sql}"));
        }
        sql.push_str(&sets.join(", "));

        if let Some(where_sql) = render_parts(&self.where_parts, " AND ", &mut args)? {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.order_bys.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_bys.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        if let Some(suffix) = render_parts(&self.suffixes, " ", &mut args)? {
            sql.push(' ');
            sql.push_str(&suffix);
        }

        Ok((sql, args))
    }
}

impl Fragment for UpdateBuilder {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        finish_statement("update", self.style, self.render())
    }

    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        self.render()
    }
}

impl_fragment_conversions!(UpdateBuilder);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn test_set_null_binds_null() {
        let (sql, args) = UpdateBuilder::new("t")
            .set("deleted_at", None::<i64>)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE t SET deleted_at = ?");
        assert_eq!(args, vec![Value::Null]);
    }

    #[test]
    fn test_set_map_appends_sorted() {
        let (sql, args) = UpdateBuilder::new("test")
            .set("a", 0)
            .set_map([("y", 2), ("x", 1)])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE test SET a = ?, x = ?, y = ?");
        assert_eq!(args, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_errors() {
        let err = UpdateBuilder::default().set("x", 1).to_sql().unwrap_err();
        assert_eq!(err.structural_kind(), Some(StructuralErrorKind::MissingTable));

        let err = UpdateBuilder::new("x").to_sql().unwrap_err();
        assert_eq!(err.structural_kind(), Some(StructuralErrorKind::MissingSet));
    }

    #[test]
    fn test_fragment_value_is_not_parenthesised() {
        let (sql, _) = UpdateBuilder::new("t")
            .set("n", Expr::new("n + ?", [1]))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE t SET n = n + ?");
    }
}
