//! Fragment composition and statement builders for sqlweave.
//!
//! `sqlweave-query` is the **query construction layer**. Every clause piece is
//! a [`Fragment`]: something that renders to SQL text plus an ordered list of
//! bound values. Fragments nest freely and flatten into one statement.
//!
//! # Role In The Architecture
//!
//! - **Composition**: [`Expr`] splices nested fragments into `?` markers.
//! - **Predicate sugar**: [`Eq`], [`Lt`], [`Like`] and friends render column
//!   maps; [`And`] / [`Or`] combine fragments.
//! - **Statements**: [`SelectBuilder`], [`InsertBuilder`], [`UpdateBuilder`],
//!   [`DeleteBuilder`] and [`CaseBuilder`].
//! - **Placeholders**: one rewrite pass per statement turns `?` into the
//!   configured [`PlaceholderStyle`].
//!
//! Rendering never touches a database. Most users access these types via the
//! `sqlweave` facade crate.

pub mod arg;
pub mod buffer;
pub mod case;
pub mod clause;
pub mod conj;
pub mod debug;
pub mod delete;
pub mod expr;
pub mod fragment;
pub mod insert;
pub mod join;
pub mod placeholder;
pub mod predicate;
pub mod select;
pub mod statement;
pub mod update;

pub use arg::{Arg, Valuer};
pub use buffer::{SqlBuffer, append_to_sql};
pub use case::CaseBuilder;
pub use clause::{NullsOrder, OrderBy, OrderDirection};
pub use conj::{And, Or};
pub use debug::debug_sql;
pub use delete::DeleteBuilder;
pub use expr::{Alias, ConcatExpr, Expr};
pub use fragment::{Fragment, FragmentRef, IntoFragment};
pub use insert::InsertBuilder;
pub use join::{Join, JoinType};
pub use placeholder::{PlaceholderStyle, placeholders};
pub use predicate::{Eq, Gt, GtOrEq, ILike, Like, Lt, LtOrEq, NotEq, NotILike, NotLike};
pub use select::SelectBuilder;
pub use statement::{StatementBuilder, StatementConfig, delete, insert, select, update};
pub use update::UpdateBuilder;
