//! Query layer
//!
//! The session type that actually talks to SQLite, plus the bind values and
//! entity metadata it works with. `Session` in the sibling module wraps
//! `DbSession`; everything here is usable on its own as well.

mod builder;
mod entity;
mod value;

pub use builder::*;
pub use entity::*;
pub use value::*;
