//! Chainable query session
//!
//! `DbSession` accumulates conditions, ordering and paging, then executes
//! against an `SqlitePool` using parameterized queries. Every chainable
//! method takes `self` by value and returns `Self`; `wrapper-gen` reads this
//! file and re-emits those methods on `Session`, so keep that shape for
//! anything meant to be chained through the wrapper.

use sqlx::SqlitePool;

use super::entity::DatabaseEntity;
use super::value::{SqlValue, to_arguments};

/// A query session over one connection pool.
#[derive(Debug, Clone)]
pub struct DbSession {
    pool: SqlitePool,
    table: Option<String>,
    columns: Option<String>,
    conditions: Vec<String>,
    values: Vec<SqlValue>,
    id: Option<SqlValue>,
    group_by: Vec<String>,
    having: Option<String>,
    order_clauses: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl DbSession {
    /// Create an empty session on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            table: None,
            columns: None,
            conditions: Vec::new(),
            values: Vec::new(),
            id: None,
            group_by: Vec::new(),
            having: None,
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// The pool this session executes on.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Query this table instead of the entity's `TABLE_NAME`.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(name.to_string());
        self
    }

    /// Select these columns instead of `*`.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    /// Add a raw condition with `?` placeholders.
    pub fn where_clause(
        mut self,
        condition: &str,
        args: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        let (sql, values) = expand_placeholders(condition, args.into_iter().map(Into::into));
        self.conditions.push(sql);
        self.values.extend(values);
        self
    }

    /// Same as `where_clause`; reads better in the middle of a chain.
    pub fn and(
        self,
        condition: &str,
        args: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        self.where_clause(condition, args)
    }

    /// OR a condition with everything added so far. Later conditions are
    /// ANDed with the combined result.
    pub fn or(
        mut self,
        condition: &str,
        args: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        let (sql, values) = expand_placeholders(condition, args.into_iter().map(Into::into));
        if self.conditions.is_empty() {
            self.conditions.push(sql);
        } else {
            let previous = self.conditions.join(" AND ");
            self.conditions = vec![format!("(({}) OR ({}))", previous, sql)];
        }
        self.values.extend(values);
        self
    }

    /// `column IN (...)`. Nested lists are flattened; no values at all
    /// matches nothing.
    pub fn in_list(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        let flat = flatten(values);
        if flat.is_empty() {
            self.conditions.push("0 = 1".to_string());
            return self;
        }
        self.conditions
            .push(format!("{} IN ({})", column, placeholders(flat.len())));
        self.values.extend(flat);
        self
    }

    /// `column NOT IN (...)`. No values adds no condition.
    pub fn not_in(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        let flat = flatten(values);
        if flat.is_empty() {
            return self;
        }
        self.conditions
            .push(format!("{} NOT IN ({})", column, placeholders(flat.len())));
        self.values.extend(flat);
        self
    }

    /// Filter on the entity's primary key.
    pub fn id(mut self, id: impl Into<SqlValue>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn asc(mut self, column: &str) -> Self {
        self.order_clauses.push(format!("{} ASC", column));
        self
    }

    pub fn desc(mut self, column: &str) -> Self {
        self.order_clauses.push(format!("{} DESC", column));
        self
    }

    /// Add a raw ORDER BY fragment (e.g. "name ASC, id DESC").
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_clauses.push(clause.to_string());
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    pub fn having(mut self, condition: &str) -> Self {
        self.having = Some(condition.to_string());
        self
    }

    /// Set limit and offset.
    pub fn limit(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Build the WHERE clause body and its bind values.
    fn where_sql(&self, primary_key: &str) -> (Option<String>, Vec<SqlValue>) {
        let mut clauses = self.conditions.clone();
        let mut values = self.values.clone();

        if let Some(ref id) = self.id {
            let (sql, id_values) = expand_placeholders(
                &format!("{} = ?", primary_key),
                std::iter::once(id.clone()),
            );
            clauses.push(sql);
            values.extend(id_values);
        }

        if clauses.is_empty() {
            (None, values)
        } else {
            (Some(clauses.join(" AND ")), values)
        }
    }

    fn table_name<E: DatabaseEntity>(&self) -> &str {
        self.table.as_deref().unwrap_or(E::TABLE_NAME)
    }

    fn is_grouped(&self) -> bool {
        !self.group_by.is_empty() || self.having.is_some()
    }

    /// SELECT, FROM, WHERE, GROUP BY and HAVING; no ordering or paging.
    fn build_filtered<E: DatabaseEntity>(&self, columns: &str) -> (String, Vec<SqlValue>) {
        let mut sql = format!("SELECT {} FROM {}", columns, self.table_name::<E>());

        let (where_sql, values) = self.where_sql(E::PRIMARY_KEY);
        if let Some(where_sql) = where_sql {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(ref having) = self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }

        (sql, values)
    }

    /// Build the SELECT statement and its bind values.
    pub fn build_select<E: DatabaseEntity>(&self) -> (String, Vec<SqlValue>) {
        let columns = self.columns.as_deref().unwrap_or("*");
        let (mut sql, values) = self.build_filtered::<E>(columns);

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            if offset > 0 {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }

        (sql, values)
    }

    /// Build a COUNT statement. Ordering and paging are ignored; a grouped
    /// query counts its groups.
    pub fn build_count<E: DatabaseEntity>(&self) -> (String, Vec<SqlValue>) {
        if self.is_grouped() {
            let columns = self.columns.as_deref().unwrap_or("*");
            let (inner, values) = self.build_filtered::<E>(columns);
            return (format!("SELECT COUNT(*) FROM ({})", inner), values);
        }
        self.build_filtered::<E>("COUNT(*)")
    }

    /// Build a statement returning one row if anything matches.
    pub fn build_exist<E: DatabaseEntity>(&self) -> (String, Vec<SqlValue>) {
        if self.is_grouped() {
            let columns = self.columns.as_deref().unwrap_or("*");
            let (inner, values) = self.build_filtered::<E>(columns);
            return (format!("SELECT 1 FROM ({}) LIMIT 1", inner), values);
        }
        let (sql, values) = self.build_filtered::<E>("1");
        (format!("{} LIMIT 1", sql), values)
    }

    /// Build a DELETE statement for every row the conditions match.
    pub fn build_delete<E: DatabaseEntity>(&self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("DELETE FROM {}", self.table_name::<E>());

        let (where_sql, values) = self.where_sql(E::PRIMARY_KEY);
        if let Some(where_sql) = where_sql {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        (sql, values)
    }

    /// Execute the query and return all matching rows.
    pub async fn find<E: DatabaseEntity>(&self) -> Result<Vec<E>, sqlx::Error> {
        let (sql, values) = self.build_select::<E>();
        tracing::debug!(sql = %sql, binds = values.len(), "Executing session query");

        let args = to_arguments(&values)?;
        sqlx::query_as_with::<_, E, _>(&sql, args)
            .fetch_all(&self.pool)
            .await
    }

    /// Execute the query and return the first matching row.
    pub async fn get<E: DatabaseEntity>(&self) -> Result<Option<E>, sqlx::Error> {
        let mut session = self.clone();
        session.limit = Some(1);
        let (sql, values) = session.build_select::<E>();
        tracing::debug!(sql = %sql, binds = values.len(), "Executing session query (one)");

        let args = to_arguments(&values)?;
        sqlx::query_as_with::<_, E, _>(&sql, args)
            .fetch_optional(&self.pool)
            .await
    }

    /// Count the rows the conditions match.
    pub async fn count<E: DatabaseEntity>(&self) -> Result<i64, sqlx::Error> {
        let (sql, values) = self.build_count::<E>();
        tracing::debug!(sql = %sql, binds = values.len(), "Executing count query");

        let args = to_arguments(&values)?;
        sqlx::query_scalar_with::<_, i64, _>(&sql, args)
            .fetch_one(&self.pool)
            .await
    }

    /// Fetch the current page together with the total match count.
    pub async fn find_and_count<E: DatabaseEntity>(&self) -> Result<(Vec<E>, i64), sqlx::Error> {
        let total = self.count::<E>().await?;
        let items = self.find::<E>().await?;
        Ok((items, total))
    }

    /// Whether any row matches.
    pub async fn exist<E: DatabaseEntity>(&self) -> Result<bool, sqlx::Error> {
        let (sql, values) = self.build_exist::<E>();
        tracing::debug!(sql = %sql, binds = values.len(), "Executing exist query");

        let args = to_arguments(&values)?;
        let row = sqlx::query_with(&sql, args)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Delete every row the conditions match. Returns the affected row count.
    pub async fn delete<E: DatabaseEntity>(&self) -> Result<u64, sqlx::Error> {
        let (sql, values) = self.build_delete::<E>();
        tracing::debug!(sql = %sql, binds = values.len(), "Executing delete");

        let args = to_arguments(&values)?;
        let result = sqlx::query_with(&sql, args).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Run a raw statement with `?` placeholders on this session's pool.
    pub async fn execute(
        &self,
        sql: &str,
        args: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Result<u64, sqlx::Error> {
        let (sql, values) = expand_placeholders(sql, args.into_iter().map(Into::into));
        tracing::debug!(sql = %sql, binds = values.len(), "Executing raw statement");

        let args = to_arguments(&values)?;
        let result = sqlx::query_with(&sql, args).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn flatten(values: impl IntoIterator<Item = impl Into<SqlValue>>) -> Vec<SqlValue> {
    let mut flat = Vec::new();
    for value in values {
        value.into().flatten_into(&mut flat);
    }
    flat
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Pair every `?` outside a quoted literal with the next argument. A list
/// argument expands its placeholder to `(?, ?, ...)`, an empty list to
/// `(NULL)`. Arguments left over after the last placeholder are kept so the
/// driver reports the mismatch.
fn expand_placeholders(
    condition: &str,
    args: impl Iterator<Item = SqlValue>,
) -> (String, Vec<SqlValue>) {
    let mut args = args.peekable();
    let mut sql = String::with_capacity(condition.len());
    let mut values = Vec::new();
    let mut in_literal = false;

    for c in condition.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                sql.push(c);
            }
            '?' if !in_literal => match args.next() {
                Some(SqlValue::List(items)) => {
                    let mut flat = Vec::new();
                    for item in items {
                        item.flatten_into(&mut flat);
                    }
                    if flat.is_empty() {
                        sql.push_str("(NULL)");
                    } else {
                        sql.push('(');
                        sql.push_str(&placeholders(flat.len()));
                        sql.push(')');
                        values.extend(flat);
                    }
                }
                Some(value) => {
                    sql.push('?');
                    values.push(value);
                }
                None => sql.push('?'),
            },
            _ => sql.push(c),
        }
    }

    values.extend(args);
    (sql, values)
}
