//! Placeholder styles and the final rewrite pass.
//!
//! Fragments are composed with the canonical marker `?`. Only the outermost
//! statement rewrites markers, once, into the placeholder syntax of the
//! target database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical in-text marker for one bound value.
pub const MARKER: char = '?';

/// Placeholder syntax of the target database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// Anonymous `?` (MySQL, SQLite)
    #[default]
    Question,
    /// Numbered `$1, $2` (PostgreSQL)
    Dollar,
    /// Numbered `:1, :2` (Oracle)
    Colon,
    /// Numbered `@p1, @p2` (SQL Server)
    #[serde(rename = "atp")]
    AtP,
}

impl PlaceholderStyle {
    /// Generate a placeholder for the given parameter index (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => MARKER.to_string(),
            PlaceholderStyle::Dollar => format!("${index}"),
            PlaceholderStyle::Colon => format!(":{index}"),
            PlaceholderStyle::AtP => format!("@p{index}"),
        }
    }

    /// Name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            PlaceholderStyle::Question => "question",
            PlaceholderStyle::Dollar => "dollar",
            PlaceholderStyle::Colon => "colon",
            PlaceholderStyle::AtP => "atp",
        }
    }

    /// Rewrite every canonical marker in `sql` into this style.
    ///
    /// Markers are numbered 1..N left to right. An escaped `??` becomes one
    /// literal `?` and is not counted.
    ///
    /// ```
    /// use sqlweave_query::PlaceholderStyle;
    ///
    /// let sql = PlaceholderStyle::Dollar.replace_placeholders("a = ? AND b ?? c AND d = ?");
    /// assert_eq!(sql, "a = $1 AND b ? c AND d = $2");
    /// ```
    pub fn replace_placeholders(self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut index = 1;
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            if c != MARKER {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&MARKER) {
                chars.next();
                out.push(MARKER);
                continue;
            }
            out.push_str(&self.placeholder(index));
            index += 1;
        }

        out
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceholderStyle {
    type Err = sqlweave_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(PlaceholderStyle::Question),
            "dollar" | "$" => Ok(PlaceholderStyle::Dollar),
            "colon" | ":" => Ok(PlaceholderStyle::Colon),
            "atp" | "@p" => Ok(PlaceholderStyle::AtP),
            other => Err(sqlweave_core::Error::Custom(format!(
                "unknown placeholder style '{other}'"
            ))),
        }
    }
}

/// Render `count` comma-separated markers, e.g. `?,?,?`.
pub fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count.saturating_mul(2));
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push(MARKER);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_keeps_markers() {
        let sql = PlaceholderStyle::Question.replace_placeholders("x = ? AND y = ?");
        assert_eq!(sql, "x = ? AND y = ?");
    }

    #[test]
    fn test_numbered_styles() {
        let sql = "x = ? AND y = ?";
        assert_eq!(
            PlaceholderStyle::Dollar.replace_placeholders(sql),
            "x = $1 AND y = $2"
        );
        assert_eq!(
            PlaceholderStyle::Colon.replace_placeholders(sql),
            "x = :1 AND y = :2"
        );
        assert_eq!(
            PlaceholderStyle::AtP.replace_placeholders(sql),
            "x = @p1 AND y = @p2"
        );
    }

    #[test]
    fn test_escaped_marker_is_not_counted() {
        let sql = "SELECT ?? FROM t WHERE a = ? AND b = '??' AND c = ?";
        assert_eq!(
            PlaceholderStyle::Dollar.replace_placeholders(sql),
            "SELECT ? FROM t WHERE a = $1 AND b = '?' AND c = $2"
        );
        assert_eq!(
            PlaceholderStyle::Question.replace_placeholders("count(??)"),
            "count(?)"
        );
    }

    #[test]
    fn test_counter_runs_past_nine() {
        let sql = vec!["?"; 11].join(",");
        let out = PlaceholderStyle::Dollar.replace_placeholders(&sql);
        assert!(out.ends_with("$10,$11"));
    }

    #[test]
    fn test_non_ascii_text_survives() {
        let sql = "name = ? -- naïve ✓";
        assert_eq!(
            PlaceholderStyle::AtP.replace_placeholders(sql),
            "name = @p1 -- naïve ✓"
        );
    }

    #[test]
    fn test_placeholder_index() {
        assert_eq!(PlaceholderStyle::Dollar.placeholder(3), "$3");
        assert_eq!(PlaceholderStyle::Question.placeholder(3), "?");
    }

    #[test]
    fn test_placeholders_helper() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }

    #[test]
    fn test_parse_and_deserialize() {
        assert_eq!(
            "Dollar".parse::<PlaceholderStyle>().unwrap(),
            PlaceholderStyle::Dollar
        );
        assert!("percent".parse::<PlaceholderStyle>().is_err());

        let style: PlaceholderStyle = serde_json::from_str("\"atp\"").unwrap();
        assert_eq!(style, PlaceholderStyle::AtP);
        assert_eq!(
            serde_json::to_string(&PlaceholderStyle::Colon).unwrap(),
            "\"colon\""
        );
    }
}
