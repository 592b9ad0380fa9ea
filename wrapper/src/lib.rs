//! Session wrapper
//!
//! A thin wrapper of `DbSession` that removes the `if` statements listing
//! queries usually need around optional filters.
//!
//! Without the wrapper:
//!
//! ```rust,ignore
//! let mut query = db.session();
//! if !req.cond_a.is_empty() {
//!     query = query.where_clause("column_a IN ?", [req.cond_a.clone()]);
//! }
//! let cond_c = req.cond_c.trim();
//! if !cond_c.is_empty() {
//!     query = query.where_clause("column_c LIKE ?", [format!("%{}%", cond_c)]);
//! }
//! if req.cond_e != 0 {
//!     query = query.where_clause("column_e = ?", [req.cond_e]);
//! }
//! if let Some(ref range) = req.cond_f {
//!     query = query.where_clause(
//!         "column_f BETWEEN ? AND ?",
//!         [range.start.clone(), range.end.clone()],
//!     );
//! }
//! let (models, count) = query
//!     .desc("id")
//!     .limit(req.limit, req.offset)
//!     .find_and_count::<Model>()
//!     .await?;
//! ```
//!
//! With it:
//!
//! ```rust,ignore
//! let (models, count) = db
//!     .wrapped_session()
//!     .in_list("column_a", [req.cond_a.clone()])
//!     .like("column_c", &req.cond_c)
//!     .where_clause("column_d = ?", [req.cond_d])
//!     .equal("column_e", req.cond_e)
//!     .between("column_f", req.cond_f.as_ref())
//!     .desc("id")
//!     .limit(req.limit, req.offset)
//!     .find_and_count::<Model>()
//!     .await?;
//! ```

pub mod config;
pub mod db;
pub mod query;
pub mod session;

pub use config::Config;
pub use db::Database;
pub use query::{DatabaseEntity, DbSession, SqlValue};
pub use session::{Range, Session};
