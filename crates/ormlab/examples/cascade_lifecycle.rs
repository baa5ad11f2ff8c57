//! Parent/child lifecycle walkthrough.
//!
//! A `Parent` owns at most one `Child` through a one-to-one relationship
//! declared with cascade delete and delete-orphan. The walkthrough
//! follows a child instance through every lifecycle state, printing the
//! session's inspection at each step:
//!
//! - explicit delete: transient → pending → persistent → deleted
//!   (flush), still deleted after rollback, detached after commit;
//! - implicit delete: disassociating the child (foreign key set to
//!   NULL) flushes as a DELETE because the relationship declares
//!   delete-orphan.

use ormlab::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
struct Parent {
    id: Option<i64>,
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
struct Child {
    id: Option<i64>,
    parent_id: Option<i64>,
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

/// The original's `truthy_test`: does the parent currently have a child?
fn truthy_test(session: &mut Session<'_>, parent_pk: i64) -> Result<()> {
    if session.find_by::<Child>("parent_id", parent_pk)?.is_some() {
        println!("parent.child tested Truthy");
    } else {
        println!("parent.child tested Falsy");
    }
    Ok(())
}

fn print_inspection(label: &str, insp: Inspection) {
    println!("\n{label}");
    println!(
        "transient = {}, pending = {}, persistent = {}, deleted = {}, detached = {}, was_deleted = {}",
        insp.transient, insp.pending, insp.persistent, insp.deleted, insp.detached, insp.was_deleted
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = Engine::in_memory()?;
    let mut metadata = Metadata::new();
    metadata.register::<Parent>();
    metadata.register::<Child>();
    metadata.create_all(&engine)?;

    let mut session = Session::new(&engine, &metadata);

    let parent_id = session.add(&Parent::default())?;
    session.commit()?;
    let parent_pk = session
        .record(parent_id)?
        .primary_key()
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MissingPrimaryKey {
            table: Parent::TABLE_NAME.to_string(),
        })?;

    println!("*** Example 1: explicit session delete ***");

    let child = Child {
        id: None,
        parent_id: Some(parent_pk),
    };
    println!("\nInstantiated Child");
    println!(
        "transient = {}",
        session.state_of(&child.to_record()) == InstanceState::Transient
    );

    let child_id = session.add(&child)?;
    print_inspection("Child added to session.", session.inspect(child_id));

    session.commit()?;
    print_inspection("After commit", session.inspect(child_id));
    truthy_test(&mut session, parent_pk)?;

    session.delete(child_id)?;
    session.flush()?;
    print_inspection("After Child deleted and flush", session.inspect(child_id));
    truthy_test(&mut session, parent_pk)?;

    session.rollback()?;
    print_inspection("After Child deleted and rollback", session.inspect(child_id));
    truthy_test(&mut session, parent_pk)?;

    session.delete(child_id)?;
    session.commit()?;
    print_inspection("After Child deleted and commit", session.inspect(child_id));
    truthy_test(&mut session, parent_pk)?;

    println!("\n*** Example 2: implicit session delete through disassociation ***");

    let child2 = Child {
        id: None,
        parent_id: Some(parent_pk),
    };
    let child2_id = session.add(&child2)?;
    session.commit()?;

    session.set(child2_id, "parent_id", Value::Null)?;
    session.flush()?;
    print_inspection(
        "parent_id set to NULL, after flush (without delete-orphan this would be an UPDATE)",
        session.inspect(child2_id),
    );
    truthy_test(&mut session, parent_pk)?;

    session.rollback()?;
    print_inspection(
        "parent_id set to NULL, after flush, and rollback",
        session.inspect(child2_id),
    );
    truthy_test(&mut session, parent_pk)?;

    session.set(child2_id, "parent_id", Value::Null)?;
    session.commit()?;
    print_inspection("parent_id set to NULL, after commit", session.inspect(child2_id));
    truthy_test(&mut session, parent_pk)?;

    Ok(())
}
