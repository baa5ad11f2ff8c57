//! Column definitions and foreign key metadata.

use serde::{Deserialize, Serialize};

use crate::types::SqlType;

/// Referential action for foreign key constraints (ON DELETE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// No action - raise an error if any references exist.
    #[default]
    NoAction,
    /// Restrict - same as NO ACTION.
    Restrict,
    /// Cascade - automatically delete referencing rows.
    Cascade,
    /// Set referencing columns to NULL.
    SetNull,
}

impl ReferentialAction {
    /// The SQL representation of this action.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
        }
    }
}

/// A foreign key reference carried by a [`ColumnDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// The referenced table.
    pub table: String,
    /// The referenced column.
    pub column: String,
    /// ON DELETE behavior, if declared.
    pub on_delete: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Create a reference to `table.column`.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            on_delete: None,
        }
    }

    /// Set the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }
}

/// A column definition within a record shape.
///
/// Built with the builder pattern:
///
/// ```
/// use ormlab_core::{ColumnDef, SqlType};
///
/// let id = ColumnDef::new("id", SqlType::Integer).primary_key().auto_increment();
/// let name = ColumnDef::new("name", SqlType::Text);
/// assert!(id.primary_key);
/// assert!(!name.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name in the database.
    pub name: String,
    /// SQL type.
    pub sql_type: SqlType,
    /// Whether this column is nullable.
    pub nullable: bool,
    /// Whether this is a primary key column.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Whether this column carries a unique constraint.
    pub unique: bool,
    /// Default value expression (SQL).
    pub default: Option<String>,
    /// Foreign key reference, if any.
    pub foreign_key: Option<ForeignKey>,
}

impl ColumnDef {
    /// Create a new column definition. Columns are NOT NULL by default.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
            foreign_key: None,
        }
    }

    /// Mark as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Add a unique constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set a default value expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Attach a foreign key reference.
    #[must_use]
    pub fn references(mut self, fk: ForeignKey) -> Self {
        self.foreign_key = Some(fk);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_def_builder() {
        let col = ColumnDef::new("id", SqlType::Integer)
            .primary_key()
            .auto_increment();
        assert_eq!(col.name, "id");
        assert!(col.primary_key);
        assert!(col.auto_increment);
        assert!(!col.nullable);
    }

    #[test]
    fn test_foreign_key_builder() {
        let col = ColumnDef::new("parent_id", SqlType::Integer)
            .nullable()
            .references(ForeignKey::new("parents", "id").on_delete(ReferentialAction::Cascade));
        let fk = col.foreign_key.expect("foreign key set");
        assert_eq!(fk.table, "parents");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    }

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::Cascade.as_sql(), "CASCADE");
        assert_eq!(ReferentialAction::default().as_sql(), "NO ACTION");
    }
}
