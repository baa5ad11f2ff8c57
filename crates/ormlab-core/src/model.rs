//! The `Model` trait for compile-time record shapes.

use crate::error::Result;
use crate::field::ColumnDef;
use crate::record::Record;
use crate::relationship::RelationshipInfo;

/// A compile-time record shape.
///
/// Implementations are written by hand: the trait is small enough that a
/// derive macro would hide more than it saves. A model converts to and
/// from the [`Record`] representation the session tracks.
///
/// # Example
///
/// ```
/// use ormlab_core::{ColumnDef, Error, Model, Record, Result, SqlType, Value};
///
/// #[derive(Debug, Clone, Default)]
/// struct Parent {
///     id: Option<i64>,
/// }
///
/// impl Model for Parent {
///     const TABLE_NAME: &'static str = "parents";
///
///     fn columns() -> Vec<ColumnDef> {
///         vec![ColumnDef::new("id", SqlType::Integer).primary_key().auto_increment()]
///     }
///
///     fn to_record(&self) -> Record {
///         let mut rec = Record::new(Self::TABLE_NAME, Self::columns());
///         if let Some(id) = self.id {
///             let _ = rec.set("id", id);
///         }
///         rec
///     }
///
///     fn from_record(rec: &Record) -> Result<Self> {
///         Ok(Parent {
///             id: rec.get("id").and_then(Value::as_i64),
///         })
///     }
/// }
///
/// let rec = Parent { id: Some(3) }.to_record();
/// assert_eq!(rec.table(), "parents");
/// ```
pub trait Model: Sized {
    /// The table this model maps to.
    const TABLE_NAME: &'static str;

    /// The columns of the model's shape, in declaration order.
    fn columns() -> Vec<ColumnDef>;

    /// Relationships declared on this model. Defaults to none.
    fn relationships() -> Vec<RelationshipInfo> {
        Vec::new()
    }

    /// Convert this instance into the record representation.
    fn to_record(&self) -> Record;

    /// Rebuild an instance from a record.
    fn from_record(record: &Record) -> Result<Self>;
}
