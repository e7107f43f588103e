//! Core types for sqlweave.
//!
//! This crate provides the foundational pieces shared by the query layer:
//!
//! - `Value`, the dynamically-typed bound parameter
//! - `Error` and `Result` for every rendering operation

pub mod error;
pub mod value;

pub use error::{
    CompositionError, Error, PredicateError, PredicateFamily, RejectedValue, Result,
    StructuralError, StructuralErrorKind, ValuerError,
};
pub use value::Value;
