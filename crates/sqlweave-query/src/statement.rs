//! Shared statement configuration and the statement-level rewrite pass.

use crate::delete::DeleteBuilder;
use crate::fragment::{FragmentRef, IntoFragment};
use crate::insert::InsertBuilder;
use crate::placeholder::PlaceholderStyle;
use crate::select::SelectBuilder;
use crate::update::UpdateBuilder;
use serde::{Deserialize, Serialize};
use sqlweave_core::{Result, Value};

/// Apply the placeholder rewrite to a fully composed statement.
pub(crate) fn finish_statement(
    kind: &'static str,
    style: PlaceholderStyle,
    rendered: Result<(String, Vec<Value>)>,
) -> Result<(String, Vec<Value>)> {
    match rendered {
        Ok((sql, args)) => {
            let sql = style.replace_placeholders(&sql);
            tracing::trace!(statement = kind, sql = %sql, args = args.len(), "Rendered statement");
            Ok((sql, args))
        }
        Err(e) => {
            tracing::debug!(statement = kind, error = %e, "Statement render failed");
            Err(e)
        }
    }
}

/// Statement settings that every builder can be loaded from.
///
/// ```
/// use sqlweave_query::StatementConfig;
///
/// let config: StatementConfig = serde_json::from_str(r#"{"placeholder_style":"dollar"}"#).unwrap();
/// assert_eq!(config.placeholder_style.to_string(), "dollar");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    pub placeholder_style: PlaceholderStyle,
}

/// A base for statement builders: a placeholder style plus WHERE
/// conditions that every SELECT, UPDATE and DELETE started from it carries.
///
/// The base is never modified by the builders it hands out.
///
/// ```
/// use sqlweave_query::{Expr, Fragment, PlaceholderStyle, StatementBuilder};
///
/// let tenant = StatementBuilder::new()
///     .placeholder_style(PlaceholderStyle::Dollar)
///     .filter(Expr::new("tenant_id = ?", [42]));
/// let (sql, _) = tenant
///     .select(["name"])
///     .from("projects")
///     .filter(Expr::new("archived = ?", [false]))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, "SELECT name FROM projects WHERE tenant_id = $1 AND archived = $2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    style: PlaceholderStyle,
    where_parts: Vec<FragmentRef>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a base from loaded configuration.
    pub fn from_config(config: StatementConfig) -> Self {
        Self::new().placeholder_style(config.placeholder_style)
    }

    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Add a WHERE condition carried into every SELECT, UPDATE and DELETE.
    pub fn filter(mut self, pred: impl IntoFragment) -> Self {
        self.where_parts.push(pred.into_fragment());
        self
    }

    pub fn select<I, S>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectBuilder::seeded(self.style, self.where_parts.clone()).columns(columns)
    }

    /// INSERT has no WHERE clause; only the placeholder style carries over.
    pub fn insert(&self, table: impl Into<String>) -> InsertBuilder {
        InsertBuilder::new(table).placeholder_style(self.style)
    }

    pub fn update(&self, table: impl Into<String>) -> UpdateBuilder {
        UpdateBuilder::seeded(table.into(), self.style, self.where_parts.clone())
    }

    pub fn delete(&self, table: impl Into<String>) -> DeleteBuilder {
        DeleteBuilder::seeded(table.into(), self.style, self.where_parts.clone())
    }

    /// Number of carried WHERE conditions.
    pub fn filter_count(&self) -> usize {
        self.where_parts.len()
    }
}

/// Start a SELECT with the default settings.
pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectBuilder::new().columns(columns)
}

/// Start an INSERT with the default settings.
pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder::new(table)
}

/// Start an UPDATE with the default settings.
pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

/// Start a DELETE with the default settings.
pub fn delete(table: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table)
}
