//! Row types a session can load

use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

/// Metadata about a database entity (table).
///
/// Rows are decoded through `sqlx::FromRow`, so deriving it is usually all
/// an implementation needs besides the table name.
///
/// ```rust,ignore
/// #[derive(Debug, sqlx::FromRow)]
/// struct Movie {
///     id: i64,
///     title: String,
/// }
///
/// impl DatabaseEntity for Movie {
///     const TABLE_NAME: &'static str = "movies";
/// }
/// ```
pub trait DatabaseEntity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// The SQL table name (e.g., "movies")
    const TABLE_NAME: &'static str;

    /// The primary key column name, used by `DbSession::id`
    const PRIMARY_KEY: &'static str = "id";
}
