//! Accumulating several fragments into one statement text.

use crate::fragment::FragmentRef;
use crate::Fragment;
use sqlweave_core::{Error, Result, Value};

/// Render `parts` into `buf`, writing `sep` between non-empty renderings.
///
/// Arguments are appended to `args` in part order. The first failing part
/// aborts; whatever was written before it stays in `buf`.
pub fn append_to_sql(
    parts: &[FragmentRef],
    buf: &mut String,
    sep: &str,
    args: &mut Vec<Value>,
) -> Result<()> {
    let mut emitted = false;
    for part in parts {
        let (sql, part_args) = part.to_sql_nested()?;
        if sql.is_empty() {
            continue;
        }
        if emitted {
            buf.push_str(sep);
        }
        buf.push_str(&sql);
        args.extend(part_args);
        emitted = true;
    }
    Ok(())
}

/// Render a clause list on its own, `None` when nothing was emitted.
///
/// Statement builders use this so a keyword such as ` WHERE ` is only
/// written when at least one part rendered to non-empty text.
pub(crate) fn render_parts(
    parts: &[FragmentRef],
    sep: &str,
    args: &mut Vec<Value>,
) -> Result<Option<String>> {
    if parts.is_empty() {
        return Ok(None);
    }
    let mut buf = String::new();
    append_to_sql(parts, &mut buf, sep, args)?;
    Ok((!buf.is_empty()).then_some(buf))
}

/// Write-many, check-once statement buffer.
///
/// Each rendered fragment is followed by one space. After the first failure
/// every further write is ignored and [`finish`](Self::finish) reports that
/// failure.
#[derive(Debug, Default)]
pub struct SqlBuffer {
    sql: String,
    args: Vec<Value>,
    error: Option<Error>,
}

impl SqlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text.
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        if self.error.is_none() {
            self.sql.push_str(s);
        }
        self
    }

    /// Render `fragment` in nested form and append it plus a trailing space.
    pub fn write_sql(&mut self, fragment: &dyn Fragment) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match fragment.to_sql_nested() {
            Ok((sql, args)) => {
                self.sql.push_str(&sql);
                self.sql.push(' ');
                self.args.extend(args);
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The accumulated text and arguments, or the first recorded failure.
    pub fn finish(self) -> Result<(String, Vec<Value>)> {
        match self.error {
            Some(e) => Err(e),
            None => Ok((self.sql, self.args)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::predicate::Lt;
    use std::sync::Arc;

    #[test]
    fn test_append_separator_between_emitted_parts() {
        let parts: Vec<FragmentRef> = vec![
            Arc::new(Expr::new("a = ?", [1])),
            Arc::new(Expr::raw("")),
            Arc::new(Expr::new("b = ?", [2])),
        ];
        let mut buf = String::from("WHERE ");
        let mut args = Vec::new();
        append_to_sql(&parts, &mut buf, " AND ", &mut args).unwrap();
        assert_eq!(buf, "WHERE a = ? AND b = ?");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_append_leading_empty_part() {
        let parts: Vec<FragmentRef> = vec![Arc::new(Expr::raw("")), Arc::new(Expr::raw("x"))];
        let mut buf = String::new();
        let mut args = Vec::new();
        append_to_sql(&parts, &mut buf, ", ", &mut args).unwrap();
        assert_eq!(buf, "x");
    }

    #[test]
    fn test_append_stops_at_first_error() {
        let parts: Vec<FragmentRef> = vec![
            Arc::new(Expr::new("a = ?", [1])),
            Arc::new(Lt::new().with("b", None::<i32>)),
            Arc::new(Expr::new("c = ?", [3])),
        ];
        let mut buf = String::new();
        let mut args = Vec::new();
        assert!(append_to_sql(&parts, &mut buf, ", ", &mut args).is_err());
        assert_eq!(buf, "a = ?");
    }

    #[test]
    fn test_buffer_writes_trailing_space() {
        let mut buf = SqlBuffer::new();
        buf.write_str("CASE ")
            .write_sql(&Expr::raw("status"))
            .write_str("WHEN ")
            .write_sql(&Expr::new("?", [1]))
            .write_str("END");
        let (sql, args) = buf.finish().unwrap();
        assert_eq!(sql, "CASE status WHEN ? END");
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn test_buffer_keeps_first_error() {
        let mut buf = SqlBuffer::new();
        buf.write_sql(&Lt::new().with("a", vec![1]))
            .write_sql(&Lt::new().with("b", None::<i32>))
            .write_sql(&Expr::raw("ignored"));
        assert!(buf.has_error());
        let err = buf.finish().unwrap_err();
        assert!(err.to_string().contains("array or slice"));
    }
}
