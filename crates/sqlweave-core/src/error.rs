//! Error types for statement rendering.

use std::fmt;

/// The primary error type for all rendering operations.
///
/// Rendering is deterministic: retrying a failed render yields the same
/// error, so nothing here is retryable.
#[derive(Debug)]
pub enum Error {
    /// A part or argument cannot be used where it appears
    Composition(CompositionError),
    /// NULL or list value given to a comparison or pattern predicate
    InvalidPredicate(PredicateError),
    /// Statement preconditions unmet (missing table, columns, ...)
    Structural(StructuralError),
    /// A driver value adapter failed to produce its value
    Valuer(ValuerError),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct CompositionError {
    pub message: String,
}

#[derive(Debug)]
pub struct PredicateError {
    /// Column whose value was rejected
    pub column: String,
    pub family: PredicateFamily,
    pub rejected: RejectedValue,
}

/// Predicate map families that only accept scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateFamily {
    /// `<`, `<=`, `>`, `>=`
    Comparison,
    /// `LIKE`, `NOT LIKE`, `ILIKE`, `NOT ILIKE`
    Pattern,
}

impl PredicateFamily {
    const fn describe(self) -> &'static str {
        match self {
            PredicateFamily::Comparison => "less than or greater than operators",
            PredicateFamily::Pattern => "like operators",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedValue {
    Null,
    List,
}

#[derive(Debug)]
pub struct StructuralError {
    pub kind: StructuralErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralErrorKind {
    /// No table / FROM target
    MissingTable,
    /// SELECT without result columns
    MissingColumns,
    /// INSERT without values or SELECT
    MissingValues,
    /// UPDATE without SET clauses
    MissingSet,
    /// CASE without WHEN clauses
    MissingWhen,
}

#[derive(Debug)]
pub struct ValuerError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StructuralError {
    /// Create a structural error of the given kind.
    pub fn new(kind: StructuralErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Error {
    /// Shorthand for a structural error.
    pub fn structural(kind: StructuralErrorKind, message: impl Into<String>) -> Self {
        Error::Structural(StructuralError::new(kind, message))
    }

    /// Shorthand for a composition error.
    pub fn composition(message: impl Into<String>) -> Self {
        Error::Composition(CompositionError {
            message: message.into(),
        })
    }

    /// Is this a statement-level precondition failure?
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural(_))
    }

    /// The structural error kind, if any.
    pub fn structural_kind(&self) -> Option<StructuralErrorKind> {
        match self {
            Error::Structural(e) => Some(e.kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Composition(e) => write!(f, "Composition error: {}", e.message),
            Error::InvalidPredicate(e) => write!(f, "Invalid predicate: {e}"),
            Error::Structural(e) => write!(f, "Structural error: {}", e.message),
            Error::Valuer(e) => write!(f, "Valuer error: {}", e.message),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Valuer(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.rejected {
            RejectedValue::Null => "null",
            RejectedValue::List => "array or slice",
        };
        write!(
            f,
            "cannot use {} with {} (column '{}')",
            what,
            self.family.describe(),
            self.column
        )
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ValuerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<CompositionError> for Error {
    fn from(err: CompositionError) -> Self {
        Error::Composition(err)
    }
}

impl From<PredicateError> for Error {
    fn from(err: PredicateError) -> Self {
        Error::InvalidPredicate(err)
    }
}

impl From<StructuralError> for Error {
    fn from(err: StructuralError) -> Self {
        Error::Structural(err)
    }
}

impl From<ValuerError> for Error {
    fn from(err: ValuerError) -> Self {
        Error::Valuer(err)
    }
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_error_message() {
        let err = Error::from(PredicateError {
            column: "x".to_string(),
            family: PredicateFamily::Comparison,
            rejected: RejectedValue::Null,
        });
        assert_eq!(
            err.to_string(),
            "Invalid predicate: cannot use null with less than or greater than operators (column 'x')"
        );

        let err = Error::from(PredicateError {
            column: "name".to_string(),
            family: PredicateFamily::Pattern,
            rejected: RejectedValue::List,
        });
        assert!(err.to_string().contains("array or slice with like operators"));
    }

    #[test]
    fn test_structural_helpers() {
        let err = Error::structural(
            StructuralErrorKind::MissingTable,
            "update statements must specify a table",
        );
        assert!(err.is_structural());
        assert_eq!(
            err.structural_kind(),
            Some(StructuralErrorKind::MissingTable)
        );
        assert_eq!(
            err.to_string(),
            "Structural error: update statements must specify a table"
        );

        assert!(!Error::composition("bad part").is_structural());
    }

    #[test]
    fn test_valuer_source_is_exposed() {
        let io = std::io::Error::other("driver gone");
        let err = Error::Valuer(ValuerError {
            message: "could not read value".to_string(),
            source: Some(Box::new(io)),
        });
        assert!(std::error::Error::source(&err).is_some());
    }
}
