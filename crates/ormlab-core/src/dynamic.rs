//! Dynamic shape creation at runtime.
//!
//! A [`ShapeTemplate`] holds the columns (and constant attributes) every
//! generated table has in common; [`ShapeTemplate::instantiate`] stamps
//! out one [`TableShape`] per category label with a templated table name.
//! This is the runtime equivalent of generating one model class per entry
//! in a fixed list of labels.

use std::collections::HashMap;

use crate::error::Result;
use crate::field::ColumnDef;
use crate::identifiers::validate_identifier;
use crate::record::Record;
use crate::value::Value;

/// A reusable column template for a family of structurally-identical
/// tables.
///
/// # Example
///
/// ```
/// use ormlab_core::{ColumnDef, ShapeTemplate, SqlType};
///
/// let template = ShapeTemplate::new()
///     .column(ColumnDef::new("id", SqlType::Integer).primary_key().auto_increment())
///     .column(ColumnDef::new("name", SqlType::Text))
///     .column(ColumnDef::new("state", SqlType::Text))
///     .constant("CLASS_VAR", 12_345_678);
///
/// let shapes = template.instantiate_all("Employee", &["CA", "TX", "NY"]).unwrap();
/// assert_eq!(shapes[0].table_name(), "Employee_CA");
/// assert_eq!(shapes[2].label(), "NY");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShapeTemplate {
    columns: Vec<ColumnDef>,
    constants: Vec<(String, Value)>,
}

impl ShapeTemplate {
    /// Create an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column shared by every generated shape.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Attach a constant attribute shared by every generated shape.
    ///
    /// Constants are not columns: they are class-level values carried by
    /// each [`TableShape`] and readable next to query results.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.push((name.into(), value.into()));
        self
    }

    /// The shared columns.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Generate one shape for `label`, named `{prefix}_{label}`.
    ///
    /// Both the prefix and the label are validated as identifier
    /// fragments so a bad label fails here rather than inside DDL.
    pub fn instantiate(&self, prefix: &str, label: &str) -> Result<TableShape> {
        validate_identifier(prefix)?;
        validate_identifier(label)?;
        tracing::debug!(prefix, label, "instantiating table shape");
        Ok(TableShape {
            table_name: format!("{prefix}_{label}"),
            label: label.to_string(),
            columns: self.columns.clone(),
            constants: self.constants.iter().cloned().collect(),
        })
    }

    /// Generate one shape per label, in label order.
    pub fn instantiate_all(&self, prefix: &str, labels: &[&str]) -> Result<Vec<TableShape>> {
        labels
            .iter()
            .map(|label| self.instantiate(prefix, label))
            .collect()
    }
}

/// One generated table definition: a templated name, the shared columns,
/// and the constant attributes from the template.
#[derive(Debug, Clone)]
pub struct TableShape {
    table_name: String,
    label: String,
    columns: Vec<ColumnDef>,
    constants: HashMap<String, Value>,
}

impl TableShape {
    /// The generated table name (`{prefix}_{label}`).
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The label this shape was generated for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The columns of this shape.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Read a constant attribute shared by all shapes of the template.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    /// Mint a fresh, empty [`Record`] with this shape.
    #[must_use]
    pub fn record(&self) -> Record {
        Record::new(self.table_name.clone(), self.columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::SqlType;

    fn employee_template() -> ShapeTemplate {
        ShapeTemplate::new()
            .column(
                ColumnDef::new("id", SqlType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnDef::new("name", SqlType::Text))
            .column(ColumnDef::new("state", SqlType::Text))
            .constant("CLASS_VAR", 12_345_678)
    }

    #[test]
    fn test_instantiate_templated_name() {
        let shape = employee_template().instantiate("Employee", "CA").unwrap();
        assert_eq!(shape.table_name(), "Employee_CA");
        assert_eq!(shape.label(), "CA");
        assert_eq!(shape.columns().len(), 3);
    }

    #[test]
    fn test_constants_shared_across_shapes() {
        let shapes = employee_template()
            .instantiate_all("Employee", &["CA", "TX", "NY"])
            .unwrap();
        assert_eq!(shapes.len(), 3);
        for shape in &shapes {
            assert_eq!(
                shape.constant("CLASS_VAR"),
                Some(&Value::Integer(12_345_678))
            );
        }
    }

    #[test]
    fn test_invalid_label_rejected() {
        let err = employee_template()
            .instantiate("Employee", "not a label")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn test_record_from_shape() {
        let shape = employee_template().instantiate("Employee", "TX").unwrap();
        let mut rec = shape.record();
        rec.set("name", "something").unwrap();
        rec.set("state", shape.label()).unwrap();
        assert_eq!(rec.table(), "Employee_TX");
        assert_eq!(rec.get("state").unwrap().as_str(), Some("TX"));
    }
}
