//! Conditional session wrapper
//!
//! `Session` wraps a `DbSession` and overrides a few of its methods so that
//! a filter is only added when its input is meaningful. Listing endpoints
//! stop needing one `if` per optional parameter:
//!
//! ```rust,ignore
//! let (movies, total) = Session::new(db.session())
//!     .in_list("library_id", req.library_ids.clone())
//!     .like("title", &req.title)
//!     .equal("year", req.year)
//!     .between("rating", req.rating.as_ref())
//!     .desc("id")
//!     .limit(req.limit, req.offset)
//!     .find_and_count::<Movie>()
//!     .await?;
//! ```
//!
//! Every other chainable `DbSession` method is re-emitted on `Session` by
//! `wrapper-gen` (see `generated.rs`) so chains stay on the wrapper type.
//! Non-chainable methods (execution, SQL inspection) are reached through
//! `Deref`.

mod generated;

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::query::{DbSession, SqlValue};

/// A thin wrapper of `DbSession` that skips filters whose input is empty.
#[derive(Debug, Clone)]
pub struct Session {
    inner: DbSession,
}

/// A closed interval for `Session::between`. Bounds are not validated, so an
/// inverted range simply matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: SqlValue,
    pub end: SqlValue,
}

impl Range {
    pub fn new(start: impl Into<SqlValue>, end: impl Into<SqlValue>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Session {
    /// Wrap an existing session.
    pub fn new(inner: DbSession) -> Self {
        Self { inner }
    }

    /// Give back the wrapped session.
    pub fn into_inner(self) -> DbSession {
        self.inner
    }

    /// Overrides `DbSession::in_list`. Does nothing when no values are given,
    /// when the first value is null, or when the first value is an empty
    /// list. Otherwise every value is forwarded unchanged.
    pub fn in_list(
        self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Session {
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();

        let skip = match values.first() {
            None | Some(SqlValue::Null) => true,
            Some(SqlValue::List(items)) => items.is_empty(),
            Some(_) => false,
        };
        if skip {
            return self;
        }

        Session::new(self.inner.in_list(column, values))
    }

    /// Builds a `column = value` condition unless `value` is null or the zero
    /// value of its kind.
    pub fn equal(self, column: &str, value: impl Into<SqlValue>) -> Session {
        let value = value.into();
        if value.is_zero() {
            return self;
        }

        Session::new(self.inner.where_clause(&format!("{} = ?", column), [value]))
    }

    /// Builds a `column BETWEEN start AND end` condition if a range is given.
    pub fn between(self, column: &str, range: Option<&Range>) -> Session {
        let Some(range) = range else {
            return self;
        };

        Session::new(self.inner.where_clause(
            &format!("{} BETWEEN ? AND ?", column),
            [range.start.clone(), range.end.clone()],
        ))
    }

    /// Builds a `column LIKE %value%` condition with `value` trimmed. Nothing
    /// is added when the trimmed value is empty. `_` and `%` in the value
    /// match literally.
    pub fn like(self, column: &str, value: &str) -> Session {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }

        Session::new(self.inner.where_clause(
            &format!("{} LIKE ? ESCAPE '\\'", column),
            [format!("%{}%", escape_like(value))],
        ))
    }
}

/// Escape the LIKE wildcards. The escape character itself goes first.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('_', "\\_")
        .replace('%', "\\%")
}

impl From<DbSession> for Session {
    fn from(inner: DbSession) -> Self {
        Self::new(inner)
    }
}

impl Deref for Session {
    type Target = DbSession;

    fn deref(&self) -> &DbSession {
        &self.inner
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut DbSession {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DatabaseEntity;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    #[derive(sqlx::FromRow)]
    struct Row {
        #[allow(dead_code)]
        id: i64,
    }

    impl DatabaseEntity for Row {
        const TABLE_NAME: &'static str = "t";
    }

    fn session() -> Session {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy("sqlite::memory:")
            .unwrap();
        Session::new(DbSession::new(pool))
    }

    fn sql(session: &Session) -> (String, Vec<SqlValue>) {
        session.build_select::<Row>()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn test_skipped_inputs_leave_query_untouched() {
        let session = session()
            .in_list("id", Vec::<SqlValue>::new())
            .in_list("id", [SqlValue::Null, SqlValue::from(1)])
            .in_list("id", [Vec::<i64>::new()])
            .equal("id", 0)
            .equal("name", "")
            .equal("flag", false)
            .equal("x", None::<i64>)
            .between("id", None)
            .like("name", "   ");

        assert_eq!(sql(&session), ("SELECT * FROM t".to_string(), Vec::new()));
    }

    #[tokio::test]
    async fn test_conditions_are_added() {
        let range = Range::new(1, 5);
        let session = session()
            .in_list("id", [1, 2])
            .equal("kind", "a")
            .between("score", Some(&range))
            .like("name", "  50%_off ");

        let (sql, values) = sql(&session);
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE id IN (?, ?) AND kind = ? AND score BETWEEN ? AND ? \
             AND name LIKE ? ESCAPE '\\'"
        );
        assert_eq!(
            values,
            vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::from("a"),
                SqlValue::Int(1),
                SqlValue::Int(5),
                SqlValue::from("%50\\%\\_off%"),
            ]
        );
    }

    #[tokio::test]
    async fn test_in_list_forwards_every_value_after_non_empty_first_list() {
        let session = session().in_list(
            "id",
            [
                SqlValue::from(vec![1, 2]),
                SqlValue::from(Vec::<i64>::new()),
                SqlValue::from(3),
            ],
        );
        let (sql, values) = sql(&session);
        assert_eq!(sql, "SELECT * FROM t WHERE id IN (?, ?, ?)");
        assert_eq!(values, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);
    }

    #[tokio::test]
    async fn test_generated_methods_keep_the_wrapper_type() {
        let session: Session = session()
            .equal("kind", "a")
            .desc("id")
            .where_clause("name <> ?", ["b"])
            .limit(5, 0)
            .like("name", "c");

        let (sql, _) = sql(&session);
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE kind = ? AND name <> ? AND name LIKE ? ESCAPE '\\' \
             ORDER BY id DESC LIMIT 5"
        );
    }

    #[test]
    fn test_range_deserializes_from_json() {
        let range: Range = serde_json::from_str(r#"{"start": 2, "end": "z"}"#).unwrap();
        assert_eq!(range, Range::new(2, "z"));
    }
}
