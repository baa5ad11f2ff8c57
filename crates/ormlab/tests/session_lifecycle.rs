//! Lifecycle state transitions of the parent/child walkthrough.

mod fixtures;

use fixtures::{Child, Parent, memory_engine, parent_child_metadata};
use ormlab::prelude::*;

fn persisted_parent(session: &mut Session<'_>) -> i64 {
    let parent_id = session.add(&Parent::default()).expect("add parent");
    session.commit().expect("commit parent");
    session
        .record(parent_id)
        .expect("parent record")
        .primary_key()
        .and_then(Value::as_i64)
        .expect("parent pk assigned")
}

#[test]
fn instantiated_child_is_transient() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let session = Session::new(&engine, &metadata);

    let child = Child::default();
    assert_eq!(
        session.state_of(&child.to_record()),
        InstanceState::Transient
    );
}

#[test]
fn added_child_is_pending_until_commit() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);
    let parent_pk = persisted_parent(&mut session);

    let child = Child {
        id: None,
        parent_id: Some(parent_pk),
    };
    let child_id = session.add(&child).unwrap();

    let insp = session.inspect(child_id);
    assert!(!insp.transient);
    assert!(insp.pending);

    session.commit().unwrap();
    let insp = session.inspect(child_id);
    assert!(!insp.pending);
    assert!(insp.persistent);
}

#[test]
fn deleted_child_walkthrough() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);
    let parent_pk = persisted_parent(&mut session);

    let child_id = session
        .add(&Child {
            id: None,
            parent_id: Some(parent_pk),
        })
        .unwrap();
    session.commit().unwrap();

    // After delete and flush: deleted, no longer persistent.
    session.delete(child_id).unwrap();
    session.flush().unwrap();
    let insp = session.inspect(child_id);
    assert!(!insp.persistent);
    assert!(insp.deleted);
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_none()
    );

    // After rollback: the deleted state sticks, but the row is back.
    session.rollback().unwrap();
    let insp = session.inspect(child_id);
    assert!(!insp.persistent);
    assert!(insp.deleted);
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_some()
    );

    // After delete and commit: detached, with the sticky was_deleted flag.
    session.delete(child_id).unwrap();
    session.commit().unwrap();
    let insp = session.inspect(child_id);
    assert!(!insp.deleted);
    assert!(insp.detached);
    assert!(insp.was_deleted);
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_none()
    );
}

#[test]
fn disassociated_child_is_deleted_as_orphan() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);
    let parent_pk = persisted_parent(&mut session);

    let child_id = session
        .add(&Child {
            id: None,
            parent_id: Some(parent_pk),
        })
        .unwrap();
    session.commit().unwrap();

    // parent.child = None, flushed: delete-orphan turns the UPDATE into
    // a DELETE.
    session.set(child_id, "parent_id", Value::Null).unwrap();
    session.flush().unwrap();
    assert!(session.inspect(child_id).deleted);
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_none()
    );

    session.rollback().unwrap();
    assert!(session.inspect(child_id).deleted);
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_some()
    );

    // Disassociate again and commit this time.
    session.set(child_id, "parent_id", Value::Null).unwrap();
    session.commit().unwrap();
    let insp = session.inspect(child_id);
    assert!(insp.detached);
    assert!(insp.was_deleted);
}

#[test]
fn reload_after_rollback_resolves_to_the_same_instance() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);

    let parent_id = session.add(&Parent::default()).unwrap();
    session.commit().unwrap();

    session.delete(parent_id).unwrap();
    session.flush().unwrap();
    session.rollback().unwrap();

    // The restored row maps back to the tracked instance instead of
    // minting a duplicate handle for the same primary key.
    let (reloaded, _) = session.first::<Parent>().unwrap().expect("row restored");
    assert_eq!(reloaded, parent_id);
    let tracked = session.debug_state().tracked;

    session.delete(parent_id).unwrap();
    session.commit().unwrap();
    assert!(session.inspect(parent_id).detached);
    assert!(session.first::<Parent>().unwrap().is_none());
    assert_eq!(session.debug_state().tracked, tracked);
}

#[test]
fn expunged_instance_is_detached() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);
    let parent_pk = persisted_parent(&mut session);

    let child_id = session
        .add(&Child {
            id: None,
            parent_id: Some(parent_pk),
        })
        .unwrap();
    session.commit().unwrap();
    let child_record = session.record(child_id).unwrap().clone();

    session.expunge(child_id);
    let insp = session.inspect(child_id);
    assert!(insp.detached);
    assert!(!insp.was_deleted);
    // The identity entry goes with the instance.
    assert_eq!(session.state_of(&child_record), InstanceState::Transient);
    // The row itself is untouched.
    assert!(
        session
            .find_by::<Child>("parent_id", parent_pk)
            .unwrap()
            .is_some()
    );
}

#[test]
fn first_returns_the_first_row_or_none() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);

    assert!(session.first::<Parent>().unwrap().is_none());

    let parent_pk = persisted_parent(&mut session);
    session.add(&Parent::default()).unwrap();
    session.commit().unwrap();

    let (_, parent) = session.first::<Parent>().unwrap().expect("rows exist");
    assert_eq!(parent.id, Some(parent_pk));
}

#[test]
fn deleting_parent_cascades_to_child() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);

    let parent_id = session.add(&Parent::default()).unwrap();
    session.commit().unwrap();
    let parent_pk = session
        .record(parent_id)
        .unwrap()
        .primary_key()
        .and_then(Value::as_i64)
        .unwrap();

    let child_id = session
        .add(&Child {
            id: None,
            parent_id: Some(parent_pk),
        })
        .unwrap();
    session.commit().unwrap();

    session.delete(parent_id).unwrap();
    session.commit().unwrap();

    // Child row deleted before the parent's own DELETE, tracked copy
    // transitioned with it.
    assert!(session.inspect(child_id).was_deleted);
    assert!(session.inspect(child_id).detached);
    let rows = engine.query("SELECT * FROM children", &[]).unwrap();
    assert!(rows.is_empty());
    let rows = engine.query("SELECT * FROM parents", &[]).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn update_without_disassociation_stays_persistent() {
    let engine = memory_engine();
    let metadata = parent_child_metadata(&engine);
    let mut session = Session::new(&engine, &metadata);
    let parent_pk = persisted_parent(&mut session);

    let other_parent = session.add(&Parent::default()).unwrap();
    session.commit().unwrap();
    let other_pk = session
        .record(other_parent)
        .unwrap()
        .primary_key()
        .and_then(Value::as_i64)
        .unwrap();

    let child_id = session
        .add(&Child {
            id: None,
            parent_id: Some(parent_pk),
        })
        .unwrap();
    session.commit().unwrap();

    // Re-pointing the foreign key is a plain UPDATE, not an orphan.
    session.set(child_id, "parent_id", other_pk).unwrap();
    session.commit().unwrap();
    assert!(session.inspect(child_id).persistent);
    let (_, child) = session
        .find_by::<Child>("parent_id", other_pk)
        .unwrap()
        .expect("child re-pointed");
    assert_eq!(child.parent_id, Some(other_pk));
}
