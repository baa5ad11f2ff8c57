//! Engine, metadata, and session for ormlab.
//!
//! This crate owns everything that touches the embedded database:
//!
//! - [`Engine`]: a SQLite connection wrapper with optional statement
//!   echoing;
//! - [`Metadata`]: the table registry, with `create_all` schema
//!   emission;
//! - [`Session`]: the unit-of-work manager tracking instance lifecycle
//!   (transient, pending, persistent, deleted, detached) and applying
//!   cascade and orphan rules on flush.
//!
//! # Example
//!
//! ```
//! use ormlab_core::{ColumnDef, Record, SqlType};
//! use ormlab_session::{Engine, InstanceState, Metadata, Session, TableDef};
//!
//! let engine = Engine::in_memory().unwrap();
//! let mut metadata = Metadata::new();
//! metadata.insert(TableDef::from_parts(
//!     "notes",
//!     vec![
//!         ColumnDef::new("id", SqlType::Integer).primary_key().auto_increment(),
//!         ColumnDef::new("body", SqlType::Text),
//!     ],
//! ));
//! metadata.create_all(&engine).unwrap();
//!
//! let mut session = Session::new(&engine, &metadata);
//! let mut note = Record::new("notes", metadata.table("notes").unwrap().columns.clone());
//! note.set("body", "hello").unwrap();
//! let id = session.add_record(note).unwrap();
//! assert_eq!(session.state(id), InstanceState::Pending);
//! session.commit().unwrap();
//! assert_eq!(session.state(id), InstanceState::Persistent);
//! ```

pub mod ddl;
pub mod engine;
pub mod metadata;
pub mod session;

pub use ddl::create_table_sql;
pub use engine::{Engine, Row};
pub use metadata::{Metadata, TableDef};
pub use session::{InstanceId, InstanceState, Inspection, Session, SessionDebugInfo};
