// Code generated by wrapper-gen. DO NOT EDIT.

#[allow(unused_imports)]
use crate::query::*;

use super::Session;

impl Session {
    pub fn table(self, x0: &str) -> Session {
        Session::new(self.inner.table(x0))
    }

    pub fn select(self, x0: &str) -> Session {
        Session::new(self.inner.select(x0))
    }

    pub fn where_clause(
        self,
        x0: &str,
        x1: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Session {
        Session::new(self.inner.where_clause(x0, x1))
    }

    pub fn and(self, x0: &str, x1: impl IntoIterator<Item = impl Into<SqlValue>>) -> Session {
        Session::new(self.inner.and(x0, x1))
    }

    pub fn or(self, x0: &str, x1: impl IntoIterator<Item = impl Into<SqlValue>>) -> Session {
        Session::new(self.inner.or(x0, x1))
    }

    pub fn not_in(self, x0: &str, x1: impl IntoIterator<Item = impl Into<SqlValue>>) -> Session {
        Session::new(self.inner.not_in(x0, x1))
    }

    pub fn id(self, x0: impl Into<SqlValue>) -> Session {
        Session::new(self.inner.id(x0))
    }

    pub fn asc(self, x0: &str) -> Session {
        Session::new(self.inner.asc(x0))
    }

    pub fn desc(self, x0: &str) -> Session {
        Session::new(self.inner.desc(x0))
    }

    pub fn order_by(self, x0: &str) -> Session {
        Session::new(self.inner.order_by(x0))
    }

    pub fn group_by(self, x0: &str) -> Session {
        Session::new(self.inner.group_by(x0))
    }

    pub fn having(self, x0: &str) -> Session {
        Session::new(self.inner.having(x0))
    }

    pub fn limit(self, x0: i64, x1: i64) -> Session {
        Session::new(self.inner.limit(x0, x1))
    }
}
