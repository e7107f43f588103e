//! CASE expressions.

use crate::buffer::SqlBuffer;
use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::Fragment;
use sqlweave_core::{Error, Result, StructuralErrorKind, Value};

/// Builder for `CASE [subject] WHEN .. THEN .. [ELSE ..] END`.
///
/// Strings passed to any method are raw SQL; bind values through
/// [`Expr`](crate::Expr).
///
/// ```
/// use sqlweave_query::{CaseBuilder, Expr, Fragment};
///
/// let case = CaseBuilder::new()
///     .when("a = 2", Expr::new("?", ["foo"]))
///     .else_("'none'");
/// assert_eq!(case.to_sql().unwrap().0, "CASE WHEN a = 2 THEN ? ELSE 'none' END");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaseBuilder {
    subject: Option<FragmentRef>,
    whens: Vec<(FragmentRef, FragmentRef)>,
    else_: Option<FragmentRef>,
}

impl CaseBuilder {
    /// A searched CASE with no subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// A simple CASE comparing `subject` against each WHEN value.
    pub fn with_subject(subject: impl IntoFragment) -> Self {
        Self {
            subject: Some(subject.into_fragment()),
            ..Self::default()
        }
    }

    pub fn when(mut self, when: impl IntoFragment, then: impl IntoFragment) -> Self {
        self.whens.push((when.into_fragment(), then.into_fragment()));
        self
    }

    pub fn else_(mut self, value: impl IntoFragment) -> Self {
        self.else_ = Some(value.into_fragment());
        self
    }
}

impl Fragment for CaseBuilder {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        if self.whens.is_empty() {
            return Err(Error::structural(
                StructuralErrorKind::MissingWhen,
                "case expression must contain at least one WHEN clause",
            ));
        }

        let mut buf = SqlBuffer::new();
        buf.write_str("CASE ");
        if let Some(subject) = &self.subject {
            buf.write_sql(subject);
        }
        for (when, then) in &self.whens {
            buf.write_str("WHEN ").write_sql(when);
            buf.write_str("THEN ").write_sql(then);
        }
        if let Some(value) = &self.else_ {
            buf.write_str("ELSE ").write_sql(value);
        }
        buf.write_str("END");
        buf.finish()
    }
}

impl_fragment_conversions!(CaseBuilder);
