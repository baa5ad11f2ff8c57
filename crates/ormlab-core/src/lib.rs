//! Core types for ormlab.
//!
//! `ormlab-core` is the foundation layer: it defines the record-shape
//! primitives (`Value`, `SqlType`, `ColumnDef`, `Record`), the dynamic
//! per-label shape factory (`ShapeTemplate`/`TableShape`), the `Model`
//! trait implemented by compile-time shapes, and relationship metadata
//! consumed by the session when applying cascade and orphan rules.
//!
//! # Who Uses This Crate
//!
//! - `ormlab-session` depends on these types for its engine, metadata
//!   registry, and unit-of-work session.
//! - Applications normally use the `ormlab` facade instead of depending
//!   on this crate directly.

pub mod dynamic;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod model;
pub mod record;
pub mod relationship;
pub mod types;
pub mod value;

pub use dynamic::{ShapeTemplate, TableShape};
pub use error::{Error, Result};
pub use field::{ColumnDef, ForeignKey, ReferentialAction};
pub use identifiers::{quote_ident, validate_identifier};
pub use model::Model;
pub use record::Record;
pub use relationship::{RelationshipInfo, RelationshipKind};
pub use types::SqlType;
pub use value::Value;
