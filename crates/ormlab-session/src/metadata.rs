//! Table metadata registry.
//!
//! `Metadata` collects every table definition the application knows
//! about; `create_all` emits the schema in one pass. The session also
//! consults the registry for relationship metadata when applying cascade
//! and orphan rules.

use ormlab_core::{ColumnDef, Model, RelationshipInfo, Result, TableShape};

use crate::ddl::create_table_sql;
use crate::engine::Engine;

/// A registered table: name, columns, relationships.
#[derive(Debug, Clone)]
pub struct TableDef {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Relationships declared on this table.
    pub relationships: Vec<RelationshipInfo>,
}

impl TableDef {
    /// Build a definition from raw parts, with no relationships.
    pub fn from_parts(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
            relationships: Vec::new(),
        }
    }

    /// Build a definition from a compile-time model.
    #[must_use]
    pub fn from_model<M: Model>() -> Self {
        Self {
            name: M::TABLE_NAME.to_string(),
            columns: M::columns(),
            relationships: M::relationships(),
        }
    }

    /// Build a definition from a dynamically generated shape.
    #[must_use]
    pub fn from_shape(shape: &TableShape) -> Self {
        Self {
            name: shape.table_name().to_string(),
            columns: shape.columns().to_vec(),
            relationships: Vec::new(),
        }
    }
}

/// An ordered registry of table definitions.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    tables: Vec<TableDef>,
}

impl Metadata {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compile-time model. Re-registering the same table
    /// replaces the previous definition.
    pub fn register<M: Model>(&mut self) {
        self.insert(TableDef::from_model::<M>());
    }

    /// Register a dynamically generated shape.
    pub fn register_shape(&mut self, shape: &TableShape) {
        self.insert(TableDef::from_shape(shape));
    }

    /// Register a raw table definition.
    pub fn insert(&mut self, table: TableDef) {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    /// Look up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Iterate over registered tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.iter()
    }

    /// Emit `CREATE TABLE IF NOT EXISTS` for every registered table.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn create_all(&self, engine: &Engine) -> Result<()> {
        for table in &self.tables {
            let sql = create_table_sql(table)?;
            tracing::debug!(table = %table.name, "creating table");
            engine.execute_batch(&sql)?;
        }
        Ok(())
    }

    /// Relationships declared by other tables that point at `table`.
    ///
    /// Used by the session to find delete-orphan rules that apply to a
    /// dependent row.
    #[must_use]
    pub fn relationships_into(&self, table: &str) -> Vec<&RelationshipInfo> {
        self.tables
            .iter()
            .flat_map(|t| t.relationships.iter())
            .filter(|rel| rel.related_table == table)
            .collect()
    }
}
