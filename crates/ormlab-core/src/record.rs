//! Runtime row instances.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::field::ColumnDef;
use crate::value::Value;

/// A runtime row instance: a table name, the columns of its shape, and
/// the values currently held.
///
/// A `Record` is what the session tracks. Compile-time shapes convert to
/// and from records through the [`Model`](crate::Model) trait; dynamic
/// shapes mint records directly via
/// [`TableShape::record`](crate::TableShape::record).
///
/// # Example
///
/// ```
/// use ormlab_core::{ColumnDef, Record, SqlType, Value};
///
/// let mut rec = Record::new(
///     "employees",
///     vec![
///         ColumnDef::new("id", SqlType::Integer).primary_key().auto_increment(),
///         ColumnDef::new("name", SqlType::Text),
///     ],
/// );
/// rec.set("name", "something").unwrap();
/// assert_eq!(rec.get("name").unwrap().as_str(), Some("something"));
/// assert!(rec.primary_key().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: String,
    columns: Vec<ColumnDef>,
    values: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record for the given table shape.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.into(),
            columns,
            values: HashMap::new(),
        }
    }

    /// The table this record belongs to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The columns of this record's shape, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Look up a column definition by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Set a column's value. Unknown columns are rejected.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<()> {
        if self.column(column).is_none() {
            return Err(Error::UnknownColumn {
                table: self.table.clone(),
                column: column.to_string(),
            });
        }
        self.values.insert(column.to_string(), value.into());
        Ok(())
    }

    /// Get a column's current value, if one has been set.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Whether a value has been set for this column.
    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Remove a value, returning it.
    pub fn take(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// The name of the primary key column, if the shape declares one.
    #[must_use]
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// The current primary key value, if set and non-null.
    #[must_use]
    pub fn primary_key(&self) -> Option<&Value> {
        let pk_col = self.primary_key_column()?;
        match self.values.get(pk_col) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    /// Column/value pairs suitable for building an INSERT statement.
    ///
    /// Auto-increment columns without an explicit value are skipped so
    /// the database assigns them.
    #[must_use]
    pub fn insert_pairs(&self) -> Vec<(&str, &Value)> {
        self.columns
            .iter()
            .filter(|c| !c.auto_increment || self.values.contains_key(&c.name))
            .filter_map(|c| self.values.get(&c.name).map(|v| (c.name.as_str(), v)))
            .collect()
    }

    /// All column/value pairs that currently hold a value, in column
    /// declaration order.
    #[must_use]
    pub fn value_pairs(&self) -> Vec<(&str, &Value)> {
        self.columns
            .iter()
            .filter_map(|c| self.values.get(&c.name).map(|v| (c.name.as_str(), v)))
            .collect()
    }

    /// Dump the record as a JSON object keyed by column name.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (name, value) in self.value_pairs() {
            let json = match value {
                Value::Null => serde_json::Value::Null,
                Value::Integer(i) => serde_json::Value::from(*i),
                Value::Real(r) => serde_json::Value::from(*r),
                Value::Text(s) => serde_json::Value::from(s.clone()),
                Value::Blob(b) => serde_json::to_value(b)?,
            };
            map.insert(name.to_string(), json);
        }
        Ok(serde_json::Value::Object(map))
    }
}
