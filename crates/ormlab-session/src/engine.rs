//! The embedded database engine.

use std::path::Path;

use ormlab_core::{Error, Result, Value};

/// A row returned by [`Engine::query`]: column names paired with values.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// The column names of this row.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The values of this row, in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A handle on an embedded SQLite database.
///
/// The engine owns the connection; sessions borrow it and use it
/// sequentially. Foreign key enforcement is switched on at open.
///
/// With `echo` enabled every statement is logged before execution, which
/// is the quickest way to watch what a session actually does.
pub struct Engine {
    conn: rusqlite::Connection,
    echo: bool,
}

impl Engine {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = rusqlite::Connection::open(path).map_err(db_err)?;
        Self::init(conn)
    }

    /// Open a fresh in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory().map_err(db_err)?;
        Self::init(conn)
    }

    fn init(conn: rusqlite::Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON").map_err(db_err)?;
        Ok(Self { conn, echo: false })
    }

    /// Log every statement before executing it.
    #[must_use]
    pub fn echo(mut self, on: bool) -> Self {
        self.echo = on;
        self
    }

    fn log(&self, sql: &str, params: &[Value]) {
        if self.echo {
            tracing::info!(sql, ?params, "engine");
        } else {
            tracing::debug!(sql, ?params, "engine");
        }
    }

    /// Execute a statement that returns no rows. Returns the number of
    /// rows changed.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        self.log(sql, params);
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        stmt.execute(rusqlite::params_from_iter(params.iter().map(to_sql_value)))
            .map_err(db_err)
    }

    /// Execute one or more statements with no parameters (DDL,
    /// transaction control).
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.log(sql, &[]);
        self.conn.execute_batch(sql).map_err(db_err)
    }

    /// Run a query and collect every row.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.log(sql, params);
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter().map(to_sql_value)))
            .map_err(db_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let raw: rusqlite::types::Value = row.get(i).map_err(db_err)?;
                values.push(from_sql_value(raw));
            }
            out.push(Row {
                columns: columns.clone(),
                values,
            });
        }
        Ok(out)
    }

    /// The rowid assigned by the most recent INSERT.
    #[must_use]
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

fn db_err(err: rusqlite::Error) -> Error {
    Error::Database(err.to_string())
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(r) => rusqlite::types::Value::Real(*r),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

fn from_sql_value(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Integer(i),
        rusqlite::types::Value::Real(r) => Value::Real(r),
        rusqlite::types::Value::Text(s) => Value::Text(s),
        rusqlite::types::Value::Blob(b) => Value::Blob(b),
    }
}
