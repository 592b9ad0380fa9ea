//! Untyped bind values
//!
//! `SqlValue` is what every condition collects for its `?` placeholders.
//! It also carries the "zero value" notion the conditional filters use to
//! decide whether an input is meaningful.

use serde::{Deserialize, Serialize};
use sqlx::Arguments;
use sqlx::error::BoxDynError;
use sqlx::sqlite::SqliteArguments;

/// Represents a SQL value that can be bound to a query.
///
/// `List` stands for a sequence argument (e.g. a list of ids). When it is
/// bound to a single `?` the placeholder expands to `(?, ?, ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum SqlValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<SqlValue>),
}

impl SqlValue {
    /// True for the zero value of the value's own kind:
    /// `Null`, `false`, `0`, `0.0`, `""` and the empty list.
    pub fn is_zero(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Bool(b) => !*b,
            SqlValue::Int(i) => *i == 0,
            SqlValue::Float(f) => *f == 0.0,
            SqlValue::String(s) => s.is_empty(),
            SqlValue::List(items) => items.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Append this value (and, for lists, every nested scalar) to `out`.
    pub fn flatten_into(self, out: &mut Vec<SqlValue>) {
        match self {
            SqlValue::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            scalar => out.push(scalar),
        }
    }

    /// Bind this value to a set of SQLite arguments.
    pub fn add_to<'q>(&self, args: &mut SqliteArguments<'q>) -> Result<(), BoxDynError> {
        match self {
            SqlValue::Null => args.add(None::<String>),
            SqlValue::Bool(b) => args.add(i64::from(*b)),
            SqlValue::Int(i) => args.add(*i),
            SqlValue::Float(f) => args.add(*f),
            SqlValue::String(s) => args.add(s.clone()),
            SqlValue::List(items) => {
                for item in items {
                    item.add_to(args)?;
                }
                Ok(())
            }
        }
    }
}

/// Collect bind values into SQLite arguments, surfacing encode failures the
/// way sqlx itself reports them.
pub(crate) fn to_arguments<'q>(values: &[SqlValue]) -> Result<SqliteArguments<'q>, sqlx::Error> {
    let mut args = SqliteArguments::default();
    for value in values {
        value.add_to(&mut args).map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::Int(i64::from(v))
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

// SQLite integers are 64-bit signed; anything wider binds as REAL.
macro_rules! wide_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    i64::try_from(v).map_or(SqlValue::Float(v as f64), SqlValue::Int)
                }
            }
        )*
    };
}

wide_int_from!(u64, usize, isize);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::String(v.clone())
    }
}

impl From<&SqlValue> for SqlValue {
    fn from(v: &SqlValue) -> Self {
        v.clone()
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(v: Vec<T>) -> Self {
        SqlValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for SqlValue {
    fn from(v: [T; N]) -> Self {
        SqlValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<SqlValue>> From<&[T]> for SqlValue {
    fn from(v: &[T]) -> Self {
        SqlValue::List(v.iter().cloned().map(Into::into).collect())
    }
}
