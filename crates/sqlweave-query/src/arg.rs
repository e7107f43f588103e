//! Bind arguments.
//!
//! Everything a fragment can bind is an [`Arg`]. The variant is decided when
//! the argument is constructed, so renderers match on a closed set of cases
//! instead of inspecting types at render time.

use crate::fragment::FragmentRef;
use sqlweave_core::{Error, Result, Value};
use std::fmt;
use std::sync::Arc;

/// A driver value adapter: an external type that produces its own bound
/// value, possibly NULL.
pub trait Valuer: fmt::Debug + Send + Sync {
    fn value(&self) -> Result<Value>;
}

/// A bind argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Scalar value or NULL
    Value(Value),
    /// List of values, expanded to one placeholder per element by the
    /// equality predicates
    List(Vec<Value>),
    /// Nested fragment, rendered and spliced in place of its placeholder
    Fragment(FragmentRef),
    /// Value adapter, resolved when the argument is rendered
    Valuer(Arc<dyn Valuer>),
}

/// An argument after value adapters have run.
#[derive(Debug)]
pub(crate) enum Resolved<'a> {
    Null,
    Scalar(Value),
    List(&'a [Value]),
    Fragment(&'a FragmentRef),
}

impl Arg {
    /// Wrap a value adapter.
    pub fn valuer(valuer: impl Valuer + 'static) -> Self {
        Arg::Valuer(Arc::new(valuer))
    }

    /// Build a list argument from any sequence of values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Arg::List(items.into_iter().map(Into::into).collect())
    }

    /// Does this argument hold a nested fragment?
    pub const fn is_fragment(&self) -> bool {
        matches!(self, Arg::Fragment(_))
    }

    /// Run value adapters and classify the argument.
    pub(crate) fn resolve(&self) -> Result<Resolved<'_>> {
        let value = match self {
            Arg::Value(v) => v.clone(),
            Arg::List(items) => return Ok(Resolved::List(items)),
            Arg::Fragment(f) => return Ok(Resolved::Fragment(f)),
            Arg::Valuer(v) => v.value()?,
        };
        Ok(if value.is_null() {
            Resolved::Null
        } else {
            Resolved::Scalar(value)
        })
    }

    /// Convert a non-fragment argument into the value bound for one marker.
    ///
    /// A list bound to a single marker becomes one `Value::Array`.
    pub(crate) fn to_value(&self) -> Result<Value> {
        match self {
            Arg::Value(v) => Ok(v.clone()),
            Arg::List(items) => Ok(Value::Array(items.clone())),
            Arg::Valuer(v) => v.value(),
            Arg::Fragment(f) => Err(Error::composition(format!(
                "{f:?} is a fragment, not a bindable value"
            ))),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<FragmentRef> for Arg {
    fn from(f: FragmentRef) -> Self {
        Arg::Fragment(f)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Arg::Value(Value::Null),
        }
    }
}

macro_rules! impl_scalar_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_arg!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    serde_json::Value,
);

// Only growable and fixed-size arrays are lists. `Vec<u8>` stays a scalar
// (bytes), so `u8` is deliberately absent here.
macro_rules! impl_list_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for Arg {
                fn from(v: Vec<$ty>) -> Self {
                    Arg::List(v.into_iter().map(Value::from).collect())
                }
            }

            impl<const N: usize> From<[$ty; N]> for Arg {
                fn from(v: [$ty; N]) -> Self {
                    Arg::List(v.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

impl_list_arg!(bool, i8, i16, i32, i64, u16, u32, f32, f64, String, &str, Value);

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use sqlweave_query::{Arg, args};
///
/// let bound: Vec<Arg> = args![1, "text", None::<i64>];
/// assert_eq!(bound.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($arg)),+]
    };
}
