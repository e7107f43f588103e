//! Human-readable rendering with arguments inlined.
//!
//! The output is for logs and error messages only. Values are quoted with
//! their `Display` form and nothing is escaped, so it must never be sent to
//! a database.

use crate::placeholder::MARKER;
use crate::Fragment;

/// Render `fragment` with every marker replaced by its quoted argument.
///
/// Never fails: render errors and marker/argument count mismatches are
/// reported inside the returned string.
///
/// ```
/// use sqlweave_query::{debug_sql, Expr};
///
/// let e = Expr::new("name = ? AND age > ?", sqlweave_query::args!["bob", 30]);
/// assert_eq!(debug_sql(&e), "name = 'bob' AND age > '30'");
/// ```
pub fn debug_sql(fragment: &dyn Fragment) -> String {
    let (sql, args) = match fragment.to_sql_nested() {
        Ok(rendered) => rendered,
        Err(e) => return format!("[to_sql error: {e}]"),
    };

    let mut out = String::with_capacity(sql.len() + args.len() * 4);
    let mut rest = sql.as_str();
    let mut used = 0;

    while let Some(i) = rest.find(MARKER) {
        out.push_str(&rest[..i]);
        if rest[i + 1..].starts_with(MARKER) {
            out.push(MARKER);
            rest = &rest[i + 2..];
            continue;
        }
        let Some(value) = args.get(used) else {
            return format!(
                "[debug_sql error: too many placeholders in {rest:?} for {} args]",
                args.len()
            );
        };
        out.push('\'');
        out.push_str(&value.to_string());
        out.push('\'');
        used += 1;
        rest = &rest[i + 1..];
    }

    if used < args.len() {
        return format!(
            "[debug_sql error: not enough placeholders in {rest:?} for {} args]",
            args.len()
        );
    }

    out.push_str(rest);
    out
}
