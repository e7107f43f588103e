//! DELETE statement builder.

use crate::buffer::render_parts;
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::placeholder::PlaceholderStyle;
use crate::statement::finish_statement;
use crate::Fragment;
use sqlweave_core::{Error, Result, StructuralErrorKind, Value};

/// A DELETE statement builder.
#[derive(Debug, Clone, Default)]
pub struct DeleteBuilder {
    /// Placeholder style applied by `to_sql`
    style: PlaceholderStyle,
    /// Expressions written before DELETE
    prefixes: Vec<FragmentRef>,
    /// Target table
    from: String,
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

impl DeleteBuilder {
    /// Create a DELETE from `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            from: table.into(),
            ..Self::default()
        }
    }

    pub(crate) fn seeded(
        from: String,
        style: PlaceholderStyle,
        where_parts: Vec<FragmentRef>,
    ) -> Self {
        Self {
            style,
            from,
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

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = table.into();
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
        if self.from.is_empty() {
            return Err(Error::structural(
                StructuralErrorKind::MissingTable,
                "delete statements must specify a From table",
            ));
        }

        let mut sql = String::new();
        let mut args = Vec::new();

        if let Some(prefix) = render_parts(&self.prefixes, " ", &mut args)? {
            sql.push_str(&prefix);
            sql.push(' ');
        }

        sql.push_str("DELETE FROM ");
        sql.push_str(&self.from);

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

impl Fragment for DeleteBuilder {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        finish_statement("delete", self.style, self.render())
    }

    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        self.render()
    }
}

impl_fragment_conversions!(DeleteBuilder);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::predicate::Eq;

    #[test]
    fn test_delete_with_predicate_map() {
        let (sql, args) = DeleteBuilder::new("sessions")
            .filter(Eq::new().with("user_id", 3).with("expired", true))
            .placeholder_style(PlaceholderStyle::Colon)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM sessions WHERE expired = :1 AND user_id = :2");
        assert_eq!(args, vec![Value::Bool(true), Value::Int(3)]);
    }

    #[test]
    fn test_missing_table() {
        let err = DeleteBuilder::default()
            .filter(Expr::new("a = ?", [1]))
            .to_sql()
            .unwrap_err();
        assert_eq!(err.structural_kind(), Some(StructuralErrorKind::MissingTable));
        assert_eq!(
            err.to_string(),
            "Structural error: delete statements must specify a From table"
        );
    }

    #[test]
    fn test_from_replaces_table() {
        let (sql, _) = DeleteBuilder::new("a").from("b").to_sql().unwrap();
        assert_eq!(sql, "DELETE FROM b");
    }
}
