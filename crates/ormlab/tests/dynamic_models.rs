//! Per-label generated shapes, end to end on SQLite.

mod fixtures;

use fixtures::memory_engine;
use ormlab::prelude::*;

const STATES: &[&str] = &["CA", "TX", "NY"];

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
fn one_table_per_label() {
    let engine = memory_engine();
    let shapes = employee_template()
        .instantiate_all("Employee", STATES)
        .unwrap();
    let mut metadata = Metadata::new();
    for shape in &shapes {
        metadata.register_shape(shape);
    }
    metadata.create_all(&engine).unwrap();

    let rows = engine
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'Employee_%' ORDER BY name",
            &[],
        )
        .unwrap();
    let names: Vec<&str> = rows.iter().filter_map(|r| r.get("name")?.as_str()).collect();
    assert_eq!(names, vec!["Employee_CA", "Employee_NY", "Employee_TX"]);
}

#[test]
fn inserts_and_queries_roundtrip_per_shape() {
    let engine = memory_engine();
    let shapes = employee_template()
        .instantiate_all("Employee", STATES)
        .unwrap();
    let mut metadata = Metadata::new();
    for shape in &shapes {
        metadata.register_shape(shape);
    }
    metadata.create_all(&engine).unwrap();

    // Inserts work.
    let mut session = Session::new(&engine, &metadata);
    for shape in &shapes {
        let mut employee = shape.record();
        employee.set("name", "something").unwrap();
        employee.set("state", shape.label()).unwrap();
        session.add_record(employee).unwrap();
    }
    session.commit().unwrap();
    session.close().unwrap();

    // Queries work, in a fresh session over the same engine.
    let mut session = Session::new(&engine, &metadata);
    for shape in &shapes {
        let id = session
            .first_of(shape)
            .unwrap()
            .expect("one row per generated table");
        let employee = session.record(id).unwrap();
        assert_eq!(
            employee.get("state").and_then(|v| v.as_str()),
            Some(shape.label())
        );
        assert_eq!(
            shape.constant("CLASS_VAR"),
            Some(&Value::Integer(12_345_678))
        );
        assert_eq!(session.state(id), InstanceState::Persistent);
    }
}

#[test]
fn shapes_share_columns_but_not_rows() {
    let engine = memory_engine();
    let shapes = employee_template()
        .instantiate_all("Employee", &["CA", "TX"])
        .unwrap();
    let mut metadata = Metadata::new();
    for shape in &shapes {
        metadata.register_shape(shape);
    }
    metadata.create_all(&engine).unwrap();

    let mut session = Session::new(&engine, &metadata);
    let mut employee = shapes[0].record();
    employee.set("name", "only in CA").unwrap();
    employee.set("state", "CA").unwrap();
    session.add_record(employee).unwrap();
    session.commit().unwrap();

    assert!(session.first_of(&shapes[0]).unwrap().is_some());
    assert!(session.first_of(&shapes[1]).unwrap().is_none());
}

#[test]
fn invalid_label_is_rejected() {
    let err = employee_template()
        .instantiate("Employee", "not-a-label")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier(_)));
}
