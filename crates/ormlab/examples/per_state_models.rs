//! One table per US state from a shared column template.
//!
//! Builds a `ShapeTemplate` holding the columns every per-state employee
//! table has in common (plus a shared constant attribute), stamps out
//! one `TableShape` per state label, creates the schema, inserts one row
//! per table, and re-queries everything in a fresh session.
//!
//! Run with `RUST_LOG=info` to watch every statement the engine executes.

use ormlab::prelude::*;
use tracing_subscriber::EnvFilter;

const STATES: &[&str] = &["CA", "TX", "NY"];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The set of common attributes every generated shape shares.
    let template = ShapeTemplate::new()
        .column(
            ColumnDef::new("id", SqlType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .column(ColumnDef::new("name", SqlType::Text))
        .column(ColumnDef::new("state", SqlType::Text))
        .constant("CLASS_VAR", 12_345_678);

    // One shape per state label, with templated table names.
    let shapes = template.instantiate_all("Employee", STATES)?;

    let engine = Engine::in_memory()?.echo(true);
    let mut metadata = Metadata::new();
    for shape in &shapes {
        metadata.register_shape(shape);
    }
    metadata.create_all(&engine)?;

    // Inserts work.
    let mut session = Session::new(&engine, &metadata);
    for shape in &shapes {
        let mut employee = shape.record();
        employee.set("name", "something")?;
        employee.set("state", shape.label())?;
        session.add_record(employee)?;
    }
    session.commit()?;
    session.close()?;

    // Queries work.
    let mut session = Session::new(&engine, &metadata);
    for shape in &shapes {
        if let Some(id) = session.first_of(shape)? {
            let employee = session.record(id)?;
            println!(
                "{} {}",
                employee.get("state").map_or("?".to_string(), ToString::to_string),
                shape.constant("CLASS_VAR").map_or("?".to_string(), ToString::to_string),
            );
        }
    }

    Ok(())
}
