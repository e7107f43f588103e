//! INSERT statement builder.

use crate::arg::Arg;
use crate::buffer::render_parts;
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::placeholder::{MARKER, PlaceholderStyle};
use crate::select::SelectBuilder;
use crate::statement::finish_statement;
use crate::Fragment;
use sqlweave_core::{Error, Result, StructuralErrorKind, Value};
use std::collections::BTreeMap;

/// An INSERT statement builder.
///
/// ```
/// use sqlweave_query::{args, Fragment, InsertBuilder};
///
/// let insert = InsertBuilder::new("users")
///     .columns(["name", "age"])
///     .values(args!["bob", 30])
///     .values(args!["alice", 31]);
/// let (sql, args) = insert.to_sql().unwrap();
/// assert_eq!(sql, "INSERT INTO users (name,age) VALUES (?,?),(?,?)");
/// assert_eq!(args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    /// Placeholder style applied by `to_sql`
    style: PlaceholderStyle,
    /// Expressions written before INSERT
    prefixes: Vec<FragmentRef>,
    /// Keywords between INSERT and INTO
    options: Vec<String>,
    /// Target table
    table: String,
    /// Column list (empty = omitted)
    columns: Vec<String>,
    /// VALUES rows
    rows: Vec<Vec<Arg>>,
    /// INSERT ... SELECT source, used instead of rows
    select: Option<SelectBuilder>,
    /// Expressions written after the statement
    suffixes: Vec<FragmentRef>,
}

impl InsertBuilder {
    /// Create an INSERT into `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
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

    /// Add keywords between `INSERT` and `INTO`, e.g. `IGNORE`.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add one row of values. Fragments are inlined in place of a marker.
    pub fn values<I, T>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Replace columns and values with the entries of `clauses`, in
    /// column-name order.
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
        let (columns, row): (Vec<_>, Vec<_>) = sorted.into_iter().unzip();
        self.columns = columns;
        self.rows = vec![row];
        self
    }

    /// Insert the result of a SELECT instead of literal rows.
    pub fn select(mut self, select: SelectBuilder) -> Self {
        self.select = Some(select);
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
                "insert statements must specify a table",
            ));
        }
        if self.rows.is_empty() && self.select.is_none() {
            return Err(Error::structural(
                StructuralErrorKind::MissingValues,
                "insert statements must have at least one set of values or select clause",
            ));
        }

        let mut sql = String::new();
        let mut args = Vec::new();

        if let Some(prefix) = render_parts(&self.prefixes, " ", &mut args)? {
            sql.push_str(&prefix);
            sql.push(' ');
        }

        sql.push_str("INSERT ");
        if !self.options.is_empty() {
            sql.push_str(&self.options.join(" "));
            sql.push(' ');
        }
        sql.push_str("INTO ");
        sql.push_str(&self.table);
        sql.push(' ');

        if !self.columns.is_empty() {
            sql.push('(');
            sql.push_str(&self.columns.join(","));
            sql.push_str(") ");
        }

        if let Some(select) = &self.select {
            let (select_sql, select_args) = select.to_sql_nested()?;
            sql.push_str(&select_sql);
            args.extend(select_args);
        } else {
            sql.push_str("VALUES ");
            let mut rows = Vec::with_capacity(self.rows.len());
            for row in &self.rows {
                let mut values = Vec::with_capacity(row.len());
                for arg in row {
                    match arg {
                        Arg::Fragment(fragment) => {
                            let (value_sql, value_args) = fragment.to_sql_value()?;
                            values.push(value_sql);
                            args.extend(value_args);
                        }
                        plain => {
                            values.push(MARKER.to_string());
                            args.push(plain.to_value()?);
                        }
                    }
                }
                rows.push(format!("({})", values.join(",")));
            }
            sql.push_str(&rows.join(","));
        }

        if let Some(suffix) = render_parts(&self.suffixes, " ", &mut args)? {
            sql.push(' ');
            sql.push_str(&suffix);
        }

        Ok((sql, args))
    }
}

impl Fragment for InsertBuilder {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        finish_statement("insert", self.style, self.render())
    }

    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        self.render()
    }
}

impl_fragment_conversions!(InsertBuilder);
