//! sqlweave - composable, parameterized SQL statements for Rust.
//!
//! sqlweave builds SQL text plus an ordered list of bound values from small
//! composable fragments:
//!
//! - Raw expressions with `?` markers that can nest other fragments
//! - Map-based predicate sugar (`Eq`, `Lt`, `Like`, ...) and `And` / `Or`
//! - Fluent SELECT, INSERT, UPDATE, DELETE and CASE builders
//! - Placeholder styles for every common database (`?`, `$1`, `:1`, `@p1`)
//!
//! Execution is left to whatever database layer receives the output.
//!
//! # Quick Start
//!
//! ```
//! use sqlweave::prelude::*;
//!
//! let active = Eq::new().with("active", true);
//! let recent = Gt::new().with("created_at", 1_700_000_000_i64);
//!
//! let (sql, args) = select(["id", "name"])
//!     .from("users")
//!     .filter(And::new().push(active).push(recent))
//!     .order_by(["name"])
//!     .limit(20)
//!     .placeholder_style(PlaceholderStyle::Dollar)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM users WHERE (active = $1 AND created_at > $2) ORDER BY name LIMIT 20"
//! );
//! assert_eq!(args, vec![Value::Bool(true), Value::BigInt(1_700_000_000)]);
//! ```

pub use sqlweave_core::{
    CompositionError, Error, PredicateError, PredicateFamily, RejectedValue, Result,
    StructuralError, StructuralErrorKind, Value, ValuerError,
};

pub use sqlweave_query::{
    Alias, And, Arg, CaseBuilder, ConcatExpr, DeleteBuilder, Eq, Expr, Fragment, FragmentRef, Gt,
    GtOrEq, ILike, InsertBuilder, IntoFragment, Join, JoinType, Like, Lt, LtOrEq, NotEq,
    NotILike, NotLike, NullsOrder, Or, OrderBy, OrderDirection, PlaceholderStyle, SelectBuilder,
    SqlBuffer, StatementBuilder, StatementConfig, UpdateBuilder, Valuer, append_to_sql, args,
    debug_sql, delete, insert, placeholders, select, update,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        // Composition
        Alias,
        And,
        Arg,
        CaseBuilder,
        ConcatExpr,
        // Statements
        DeleteBuilder,
        Eq,
        // Core types
        Error,
        Expr,
        Fragment,
        Gt,
        GtOrEq,
        ILike,
        InsertBuilder,
        IntoFragment,
        Like,
        Lt,
        LtOrEq,
        NotEq,
        NotILike,
        NotLike,
        Or,
        OrderBy,
        PlaceholderStyle,
        Result,
        SelectBuilder,
        StatementBuilder,
        UpdateBuilder,
        Value,
        Valuer,
        // Helpers
        args,
        debug_sql,
        delete,
        insert,
        select,
        update,
    };
}
