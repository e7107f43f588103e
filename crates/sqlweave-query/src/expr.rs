//! Raw SQL expressions and the composition algorithm.
//!
//! An [`Expr`] is SQL text with `?` markers plus one argument per marker.
//! Arguments that are themselves fragments are rendered and spliced into
//! the text in place of their marker, recursively, so any tree of fragments
//! flattens into one string and one argument list in depth-first order.

use crate::arg::Arg;
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::placeholder::MARKER;
use crate::Fragment;
use sqlweave_core::{Result, Value};

/// A raw SQL fragment with bound arguments.
///
/// # Example
///
/// ```
/// use sqlweave_query::{Expr, Fragment};
///
/// let e = Expr::new("count(?)", [Expr::new("nullif(a,?)", ["b"])]);
/// let (sql, args) = e.to_sql().unwrap();
/// assert_eq!(sql, "count(nullif(a,?))");
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Expr {
    sql: String,
    args: Vec<Arg>,
}

impl Expr {
    /// Create an expression from SQL text and its arguments.
    pub fn new<I, T>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        Self {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an expression with no arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// The unrendered SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The unrendered arguments.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// True when no argument is a nested fragment.
    pub fn is_simple(&self) -> bool {
        !self.args.iter().any(Arg::is_fragment)
    }
}

impl Fragment for Expr {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        compose(&self.sql, &self.args)
    }
}

/// Splice `args` into the markers of `sql`.
///
/// Marker/argument count mismatches are tolerated: surplus arguments trail
/// the output list (a surplus fragment contributes its values), surplus
/// markers are copied through unconsumed.
// TODO: opt-in strict mode that rejects marker/argument count mismatches.
pub(crate) fn compose(sql: &str, args: &[Arg]) -> Result<(String, Vec<Value>)> {
    if !args.iter().any(Arg::is_fragment) {
        let values = args.iter().map(Arg::to_value).collect::<Result<Vec<_>>>()?;
        return Ok((sql.to_string(), values));
    }

    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::with_capacity(args.len());
    let mut rest = sql;
    let mut next = 0;

    while next < args.len() && !rest.is_empty() {
        let Some(i) = rest.find(MARKER) else {
            break;
        };

        // `??` is a literal marker: copy it and keep the argument pending.
        if rest[i + 1..].starts_with(MARKER) {
            out.push_str(&rest[..i + 2]);
            rest = &rest[i + 2..];
            continue;
        }

        match &args[next] {
            Arg::Fragment(fragment) => {
                let (nested_sql, nested_args) = fragment.to_sql_nested()?;
                out.push_str(&rest[..i]);
                out.push_str(&nested_sql);
                values.extend(nested_args);
            }
            plain => {
                out.push_str(&rest[..=i]);
                values.push(plain.to_value()?);
            }
        }

        next += 1;
        rest = &rest[i + 1..];
    }

    out.push_str(rest);
    for arg in &args[next..] {
        match arg {
            // No marker left to splice into: only the values trail.
            Arg::Fragment(fragment) => values.extend(fragment.to_sql_nested()?.1),
            plain => values.push(plain.to_value()?),
        }
    }

    tracing::trace!(
        fragments = args.iter().filter(|a| a.is_fragment()).count(),
        bound = values.len(),
        "composed expression"
    );

    Ok((out, values))
}

/// Concatenation of literal text and fragments, with no separators.
///
/// ```
/// use sqlweave_query::{ConcatExpr, Expr, Fragment};
///
/// let name = Expr::new("CONCAT(?,' ',?)", ["f", "l"]);
/// let e = ConcatExpr::new().push("COALESCE(name,").push(name).push(")");
/// assert_eq!(e.to_sql().unwrap().0, "COALESCE(name,CONCAT(?,' ',?))");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcatExpr {
    parts: Vec<FragmentRef>,
}

impl ConcatExpr {
    /// Create an empty concatenation.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append literal text or a fragment.
    pub fn push(mut self, part: impl IntoFragment) -> Self {
        self.parts.push(part.into_fragment());
        self
    }
}

impl Fragment for ConcatExpr {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut sql = String::new();
        let mut args = Vec::new();
        for part in &self.parts {
            let (part_sql, part_args) = part.to_sql_nested()?;
            sql.push_str(&part_sql);
            args.extend(part_args);
        }
        Ok((sql, args))
    }
}

/// A fragment labelled with an alias: `(<fragment>) AS <alias>`.
///
/// Useful for computed columns such as CASE expressions.
#[derive(Debug, Clone)]
pub struct Alias {
    expr: FragmentRef,
    alias: String,
}

impl Alias {
    pub fn new(expr: impl IntoFragment, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into_fragment(),
            alias: alias.into(),
        }
    }
}

impl Fragment for Alias {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let (sql, args) = self.expr.to_sql_nested()?;
        Ok((format!("({sql}) AS {}", self.alias), args))
    }
}

impl_fragment_conversions!(Expr, ConcatExpr, Alias);
