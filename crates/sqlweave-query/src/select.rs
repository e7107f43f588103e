//! SELECT statement builder.

use crate::buffer::{append_to_sql, render_parts};
use crate::expr::{Alias, Expr};
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::join::{Join, JoinType};
use crate::placeholder::PlaceholderStyle;
use crate::statement::finish_statement;
use crate::Fragment;
use sqlweave_core::{Error, Result, StructuralErrorKind, Value};
use std::sync::Arc;

/// A SELECT statement builder.
///
/// Every method consumes the builder and returns the extended copy, so a
/// partially built query can be cloned and extended in different directions.
///
/// ```
/// use sqlweave_query::{Eq, Fragment, PlaceholderStyle, SelectBuilder};
///
/// let query = SelectBuilder::new()
///     .columns(["id", "name"])
///     .from("users")
///     .filter(Eq::new().with("active", true))
///     .limit(10)
///     .placeholder_style(PlaceholderStyle::Dollar);
/// let (sql, args) = query.to_sql().unwrap();
/// assert_eq!(sql, "SELECT id, name FROM users WHERE active = $1 LIMIT 10");
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    /// Placeholder style applied by `to_sql`
    style: PlaceholderStyle,
    /// Expressions written before SELECT
    prefixes: Vec<FragmentRef>,
    /// Keywords after SELECT (DISTINCT, ...)
    options: Vec<String>,
    /// Result columns
    columns: Vec<FragmentRef>,
    /// FROM table or aliased subquery
    from: Option<FragmentRef>,
    /// JOIN clauses
    joins: Vec<FragmentRef>,
    /// WHERE clause conditions
    where_parts: Vec<FragmentRef>,
    /// GROUP BY expressions
    group_bys: Vec<String>,
    /// HAVING clause conditions
    having_parts: Vec<FragmentRef>,
    /// ORDER BY items
    order_bys: Vec<FragmentRef>,
    /// LIMIT clause
    limit: Option<u64>,
    /// OFFSET clause
    offset: Option<u64>,
    /// Expressions written after the statement
    suffixes: Vec<FragmentRef>,
}

impl SelectBuilder {
    /// Create an empty SELECT.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seeded(style: PlaceholderStyle, where_parts: Vec<FragmentRef>) -> Self {
        Self {
            style,
            where_parts,
            ..Self::default()
        }
    }

    /// Set the placeholder style used by [`Fragment::to_sql`].
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    /// Add an expression before `SELECT`, e.g. a `WITH` clause.
    pub fn prefix(mut self, prefix: impl IntoFragment) -> Self {
        self.prefixes.push(prefix.into_fragment());
        self
    }

    /// Add keywords between `SELECT` and the columns.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Shorthand for `options(["DISTINCT"])`.
    pub fn distinct(self) -> Self {
        self.options(["DISTINCT"])
    }

    /// Add one result column. Strings are raw SQL; fragments bring their
    /// arguments along.
    pub fn column(mut self, column: impl IntoFragment) -> Self {
        self.columns.push(column.into_fragment());
        self
    }

    /// Add result columns by name.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(
            columns
                .into_iter()
                .map(|c| Arc::new(Expr::raw(c)) as FragmentRef),
        );
        self
    }

    /// Remove every result column.
    pub fn remove_columns(mut self) -> Self {
        self.columns.clear();
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Arc::new(Expr::raw(table)));
        self
    }

    /// Select FROM a subquery: `FROM (<sub>) AS alias`.
    pub fn from_select(mut self, sub: SelectBuilder, alias: impl Into<String>) -> Self {
        self.from = Some(Arc::new(Alias::new(sub, alias)));
        self
    }

    /// Add a complete join clause, keyword included.
    pub fn join_clause(mut self, clause: impl IntoFragment) -> Self {
        self.joins.push(clause.into_fragment());
        self
    }

    /// `JOIN <clause>`
    pub fn join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Plain, clause))
    }

    pub fn left_join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Left, clause))
    }

    pub fn right_join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Right, clause))
    }

    pub fn inner_join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Inner, clause))
    }

    pub fn full_join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Full, clause))
    }

    pub fn cross_join(self, clause: impl IntoFragment) -> Self {
        self.join_clause(Join::new(JoinType::Cross, clause))
    }

    /// Add a WHERE condition. Multiple conditions are joined with `AND`.
    pub fn filter(mut self, pred: impl IntoFragment) -> Self {
        self.where_parts.push(pred.into_fragment());
        self
    }

    /// Add GROUP BY expressions.
    pub fn group_by<I, S>(mut self, group_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_bys.extend(group_bys.into_iter().map(Into::into));
        self
    }

    /// Add a HAVING condition. Multiple conditions are joined with `AND`.
    pub fn having(mut self, pred: impl IntoFragment) -> Self {
        self.having_parts.push(pred.into_fragment());
        self
    }

    /// Add ORDER BY expressions.
    pub fn order_by<I, S>(mut self, order_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys.extend(
            order_bys
                .into_iter()
                .map(|o| Arc::new(Expr::raw(o)) as FragmentRef),
        );
        self
    }

    /// Add an ORDER BY item that may carry arguments.
    pub fn order_by_clause(mut self, clause: impl IntoFragment) -> Self {
        self.order_bys.push(clause.into_fragment());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn remove_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn remove_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Add an expression after the rest of the statement.
    pub fn suffix(mut self, suffix: impl IntoFragment) -> Self {
        self.suffixes.push(suffix.into_fragment());
        self
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn render(&self) -> Result<(String, Vec<Value>)> {
        if self.columns.is_empty() {
            return Err(Error::structural(
                StructuralErrorKind::MissingColumns,
                "select statements must have at least one result column",
            ));
        }

        let mut sql = String::new();
        let mut args = Vec::new();

        if let Some(prefix) = render_parts(&self.prefixes, " ", &mut args)? {
            sql.push_str(&prefix);
            sql.push(' ');
        }

        sql.push_str("SELECT ");
        if !self.options.is_empty() {
            sql.push_str(&self.options.join(" "));
            sql.push(' ');
        }
        append_to_sql(&self.columns, &mut sql, ", ", &mut args)?;

        if let Some(from) = &self.from {
            let (from_sql, from_args) = from.to_sql_nested()?;
            sql.push_str(" FROM ");
            sql.push_str(&from_sql);
            args.extend(from_args);
        }

        if let Some(joins) = render_parts(&self.joins, " ", &mut args)? {
            sql.push(' ');
            sql.push_str(&joins);
        }

        if let Some(where_sql) = render_parts(&self.where_parts, " AND ", &mut args)? {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_bys.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_bys.join(", "));
        }

        if let Some(having) = render_parts(&self.having_parts, " AND ", &mut args)? {
            sql.push_str(" HAVING ");
            sql.push_str(&having);
        }

        if let Some(order) = render_parts(&self.order_bys, ", ", &mut args)? {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
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

impl Fragment for SelectBuilder {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        finish_statement("select", self.style, self.render())
    }

    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        self.render()
    }

    /// A subquery standing in for a value needs its own parentheses.
    fn to_sql_value(&self) -> Result<(String, Vec<Value>)> {
        let (sql, args) = self.render()?;
        Ok((format!("({sql})"), args))
    }
}

impl_fragment_conversions!(SelectBuilder);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseBuilder;
    use crate::clause::OrderBy;
    use crate::conj::Or;
    use crate::predicate::{Eq, Gt, Lt};

    #[test]
    fn test_select_full() {
        let query = SelectBuilder::new()
            .prefix(Expr::new("WITH prefix AS ?", [0]))
            .distinct()
            .columns(["a", "b"])
            .column(Expr::new("IF(n IN (?,?,?), 1, 0) as c", [1, 2, 3]))
            .from("e")
            .join_clause("CROSS JOIN j1")
            .join("j2")
            .left_join("j3")
            .right_join("j4")
            .inner_join("j5")
            .cross_join("j6")
            .filter(Expr::new("f = ?", [4]))
            .filter(Eq::new().with("g", 5))
            .filter(Eq::new().with("h", vec![6, 7, 8]))
            .filter(Eq::new().with("i", Vec::<i32>::new()))
            .filter(Or::new().push(Expr::new("j = ?", [10])).push(Expr::raw("j = 11")))
            .group_by(["l"])
            .having("m = n")
            .order_by_clause(Expr::new("? DESC", [1]))
            .order_by(["o ASC", "p DESC"])
            .limit(12)
            .offset(13)
            .suffix(Expr::new("FETCH FIRST ? ROWS ONLY", [14]))
            .column(CaseBuilder::with_subject("x").when("1", "2"));

        let (sql, args) = query.to_sql().unwrap();
        assert_eq!(
            sql,
            "WITH prefix AS ? \
             SELECT DISTINCT a, b, IF(n IN (?,?,?), 1, 0) as c, CASE x WHEN 1 THEN 2 END \
             FROM e \
             CROSS JOIN j1 JOIN j2 LEFT JOIN j3 RIGHT JOIN j4 INNER JOIN j5 CROSS JOIN j6 \
             WHERE f = ? AND g = ? AND h IN (?,?,?) AND (1=0) AND (j = ? OR j = 11) \
             GROUP BY l HAVING m = n ORDER BY ? DESC, o ASC, p DESC LIMIT 12 OFFSET 13 \
             FETCH FIRST ? ROWS ONLY"
        );
        let expected: Vec<Value> = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 1, 14]
            .into_iter()
            .map(Value::Int)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_no_columns_is_error() {
        let err = SelectBuilder::new().from("x").to_sql().unwrap_err();
        assert_eq!(
            err.structural_kind(),
            Some(StructuralErrorKind::MissingColumns)
        );
    }

    #[test]
    fn test_select_without_from() {
        let (sql, _) = SelectBuilder::new().column("1").to_sql().unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_dollar_numbering_across_clauses() {
        let query = SelectBuilder::new()
            .column(Expr::new("coalesce(a, ?)", [0]))
            .from("t")
            .filter(Gt::new().with("b", 1))
            .filter(Lt::new().with("c", 2))
            .having(Expr::new("count(*) > ?", [3]))
            .placeholder_style(PlaceholderStyle::Dollar);
        let (sql, args) = query.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT coalesce(a, $1) FROM t WHERE b > $2 AND c < $3 HAVING count(*) > $4"
        );
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_from_select() {
        let sub = SelectBuilder::new()
            .column("c")
            .from("d")
            .filter(Eq::new().with("i", 0))
            .placeholder_style(PlaceholderStyle::Dollar);
        let query = SelectBuilder::new()
            .columns(["a", "b"])
            .from_select(sub, "subq")
            .filter(Expr::new("x = ?", [1]))
            .placeholder_style(PlaceholderStyle::Dollar);
        let (sql, args) = query.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT a, b FROM (SELECT c FROM d WHERE i = $1) AS subq WHERE x = $2"
        );
        assert_eq!(args, vec![Value::Int(0), Value::Int(1)]);
    }

    #[test]
    fn test_subquery_in_filter_keeps_markers_canonical() {
        let sub = SelectBuilder::new()
            .column("id")
            .from("banned")
            .filter(Expr::new("reason = ?", ["spam"]))
            .placeholder_style(PlaceholderStyle::Dollar);
        let query = SelectBuilder::new()
            .column("*")
            .from("users")
            .filter(Expr::new("age > ?", [18]))
            .filter(Expr::new("id NOT IN (?)", [sub]))
            .placeholder_style(PlaceholderStyle::Dollar);
        let (sql, _) = query.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE age > $1 AND id NOT IN (SELECT id FROM banned WHERE reason = $2)"
        );
    }

    #[test]
    fn test_empty_filter_is_skipped() {
        let (sql, _) = SelectBuilder::new()
            .column("a")
            .from("t")
            .filter("")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT a FROM t");
    }

    #[test]
    fn test_clone_is_independent() {
        let base = SelectBuilder::new().column("a").from("t");
        let left = base.clone().filter("x = 1");
        let right = base.clone().limit(5);
        assert_eq!(base.to_sql().unwrap().0, "SELECT a FROM t");
        assert_eq!(left.to_sql().unwrap().0, "SELECT a FROM t WHERE x = 1");
        assert_eq!(right.to_sql().unwrap().0, "SELECT a FROM t LIMIT 5");
    }

    #[test]
    fn test_remove_limit_offset_and_order_by_item() {
        let query = SelectBuilder::new()
            .column("a")
            .from("t")
            .order_by_clause(OrderBy::desc("a").nulls_last())
            .limit(5)
            .offset(10)
            .remove_limit()
            .remove_offset();
        assert_eq!(
            query.to_sql().unwrap().0,
            "SELECT a FROM t ORDER BY a DESC NULLS LAST"
        );
    }

    #[test]
    fn test_value_form_is_parenthesised() {
        let query = SelectBuilder::new().column("a").from("b");
        assert_eq!(query.to_sql_value().unwrap().0, "(SELECT a FROM b)");
    }

    #[test]
    fn test_nested_error_propagates() {
        let err = SelectBuilder::new()
            .column("a")
            .filter(Lt::new().with("x", None::<i32>))
            .to_sql()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate(_)));
    }
}
