//! A small laboratory for ORM behavior.
//!
//! ormlab is a compact object-relational toolkit over an embedded SQLite
//! store, built to make the classic ORM behaviors easy to observe and
//! test:
//!
//! - **record shapes**, defined statically (implement [`Model`]) or
//!   generated per category label at runtime ([`ShapeTemplate`]);
//! - a **metadata registry** with one-shot schema emission
//!   ([`Metadata::create_all`]);
//! - a **unit-of-work session** whose instances move through the
//!   transient → pending → persistent → deleted → detached lifecycle,
//!   with cascade-delete and delete-orphan relationship rules applied at
//!   flush time.
//!
//! The runnable examples walk through the behaviors end to end:
//! `per_state_models` generates one table per US state from a shared
//! column template, and `cascade_lifecycle` follows a parent/child pair
//! through every lifecycle state.

pub use ormlab_core::{
    ColumnDef, Error, ForeignKey, Model, Record, ReferentialAction, RelationshipInfo,
    RelationshipKind, Result, ShapeTemplate, SqlType, TableShape, Value, quote_ident,
    validate_identifier,
};
pub use ormlab_session::{
    Engine, InstanceId, InstanceState, Inspection, Metadata, Row, Session, SessionDebugInfo,
    TableDef, create_table_sql,
};

/// Everything most applications need, in one import.
pub mod prelude {
    pub use ormlab_core::{
        ColumnDef, Error, ForeignKey, Model, Record, ReferentialAction, RelationshipInfo,
        RelationshipKind, Result, ShapeTemplate, SqlType, TableShape, Value,
    };
    pub use ormlab_session::{
        Engine, InstanceId, InstanceState, Inspection, Metadata, Session, TableDef,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_facade_end_to_end() {
        let engine = Engine::in_memory().unwrap();
        let mut metadata = Metadata::new();
        metadata.insert(TableDef::from_parts(
            "things",
            vec![
                ColumnDef::new("id", SqlType::Integer)
                    .primary_key()
                    .auto_increment(),
                ColumnDef::new("label", SqlType::Text),
            ],
        ));
        metadata.create_all(&engine).unwrap();

        let mut session = Session::new(&engine, &metadata);
        let mut rec = Record::new("things", metadata.table("things").unwrap().columns.clone());
        rec.set("label", "x").unwrap();
        let id = session.add_record(rec).unwrap();
        session.commit().unwrap();
        assert_eq!(session.state(id), InstanceState::Persistent);
    }
}
