//! The fragment contract shared by every composable clause piece.

use sqlweave_core::{Result, Value};
use std::fmt;
use std::sync::Arc;

/// A piece of SQL that renders to text plus its bound arguments.
///
/// Rendering never mutates the fragment, so the same fragment can be
/// rendered any number of times (and from several threads) with identical
/// output.
pub trait Fragment: fmt::Debug + Send + Sync {
    /// Render this fragment into SQL text and the ordered argument list.
    ///
    /// Statement builders apply their placeholder style here; every other
    /// fragment returns canonical `?` markers.
    fn to_sql(&self) -> Result<(String, Vec<Value>)>;

    /// Render this fragment for splicing into a parent fragment.
    ///
    /// Markers must stay canonical (`?`) in this form so the outermost
    /// statement can number them in one pass.
    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        self.to_sql()
    }

    /// Render this fragment where it stands alone as a value, such as the
    /// right-hand side of `SET col = ...` or an entry of `VALUES (...)`.
    fn to_sql_value(&self) -> Result<(String, Vec<Value>)> {
        self.to_sql_nested()
    }

    /// Render this fragment, panicking on failure.
    ///
    /// Use this where a render error is a programming mistake, such as a
    /// statement assembled from constants.
    fn must_sql(&self) -> (String, Vec<Value>) {
        match self.to_sql() {
            Ok(rendered) => rendered,
            Err(e) => panic!("{e}"),
        }
    }
}

/// A shared, immutable fragment.
pub type FragmentRef = Arc<dyn Fragment>;

impl Fragment for FragmentRef {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        (**self).to_sql()
    }

    fn to_sql_nested(&self) -> Result<(String, Vec<Value>)> {
        (**self).to_sql_nested()
    }

    fn to_sql_value(&self) -> Result<(String, Vec<Value>)> {
        (**self).to_sql_value()
    }
}

/// Conversion into a shared fragment.
///
/// Plain strings convert into raw SQL with no arguments; every fragment type
/// in this crate converts into itself.
pub trait IntoFragment {
    fn into_fragment(self) -> FragmentRef;
}

impl IntoFragment for FragmentRef {
    fn into_fragment(self) -> FragmentRef {
        self
    }
}

impl IntoFragment for &str {
    fn into_fragment(self) -> FragmentRef {
        Arc::new(crate::expr::Expr::raw(self))
    }
}

impl IntoFragment for String {
    fn into_fragment(self) -> FragmentRef {
        Arc::new(crate::expr::Expr::raw(self))
    }
}

/// Implements `IntoFragment` and `From<T> for Arg` for fragment types.
macro_rules! impl_fragment_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::fragment::IntoFragment for $ty {
                fn into_fragment(self) -> $crate::fragment::FragmentRef {
                    ::std::sync::Arc::new(self)
                }
            }

            impl From<$ty> for $crate::arg::Arg {
                fn from(fragment: $ty) -> Self {
                    $crate::arg::Arg::Fragment(::std::sync::Arc::new(fragment))
                }
            }
        )*
    };
}

pub(crate) use impl_fragment_conversions;
