//! Shared fixtures for the integration tests: an in-memory engine, the
//! parent/child mapping used by the lifecycle tests, and the `OrderLine`
//! value object paired with them.
#![allow(dead_code)]

use ormlab::prelude::*;

/// A fresh in-memory database.
pub fn memory_engine() -> Engine {
    Engine::in_memory().expect("in-memory engine")
}

/// Metadata with the parent/child mapping registered and created.
pub fn parent_child_metadata(engine: &Engine) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.register::<Parent>();
    metadata.register::<Child>();
    metadata.create_all(engine).expect("create_all");
    metadata
}

#[derive(Debug, Clone, Default)]
pub struct Parent {
    pub id: Option<i64>,
}

impl Model for Parent {
    const TABLE_NAME: &'static str = "parents";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", SqlType::Integer)
                .primary_key()
                .auto_increment(),
        ]
    }

    fn relationships() -> Vec<RelationshipInfo> {
        vec![
            RelationshipInfo::new("child", "children", RelationshipKind::OneToOne)
                .remote_key("parent_id")
                .cascade_delete(true)
                .delete_orphan(true),
        ]
    }

    fn to_record(&self) -> Record {
        let mut rec = Record::new(Self::TABLE_NAME, Self::columns());
        if let Some(id) = self.id {
            let _ = rec.set("id", id);
        }
        rec
    }

    fn from_record(rec: &Record) -> Result<Self> {
        Ok(Parent {
            id: rec.get("id").and_then(Value::as_i64),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Child {
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
}

impl Model for Child {
    const TABLE_NAME: &'static str = "children";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", SqlType::Integer)
                .primary_key()
                .auto_increment(),
            ColumnDef::new("parent_id", SqlType::Integer)
                .nullable()
                .references(ForeignKey::new("parents", "id")),
        ]
    }

    fn to_record(&self) -> Record {
        let mut rec = Record::new(Self::TABLE_NAME, Self::columns());
        if let Some(id) = self.id {
            let _ = rec.set("id", id);
        }
        let _ = rec.set("parent_id", self.parent_id);
        rec
    }

    fn from_record(rec: &Record) -> Result<Self> {
        Ok(Child {
            id: rec.get("id").and_then(Value::as_i64),
            parent_id: rec.get("parent_id").and_then(Value::as_i64),
        })
    }
}

/// An immutable order line: identity is the full value, not a surrogate
/// key. The fields are private so an instance cannot be mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderLine {
    id: String,
    sku: String,
    quantity: i64,
}

impl OrderLine {
    pub fn new(id: impl Into<String>, sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            quantity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

impl Model for OrderLine {
    const TABLE_NAME: &'static str = "order_lines";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", SqlType::Text).primary_key(),
            ColumnDef::new("sku", SqlType::Text),
            ColumnDef::new("quantity", SqlType::Integer),
        ]
    }

    fn to_record(&self) -> Record {
        let mut rec = Record::new(Self::TABLE_NAME, Self::columns());
        let _ = rec.set("id", self.id.as_str());
        let _ = rec.set("sku", self.sku.as_str());
        let _ = rec.set("quantity", self.quantity);
        rec
    }

    fn from_record(rec: &Record) -> Result<Self> {
        Ok(OrderLine {
            id: rec.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            sku: rec.get("sku").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            quantity: rec.get("quantity").and_then(Value::as_i64).unwrap_or_default(),
        })
    }
}

/// Metadata with the order-line mapping registered and created.
pub fn order_line_metadata(engine: &Engine) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.register::<OrderLine>();
    metadata.create_all(engine).expect("create_all");
    metadata
}
