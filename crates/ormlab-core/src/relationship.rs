//! Relationship metadata.
//!
//! Relationships are static metadata on each [`Model`](crate::Model).
//! The session consults them when applying cascade deletes and the
//! orphan rule; no runtime reflection is involved.

/// The type of relationship between two record shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelationshipKind {
    /// One-to-one: a `Parent` has at most one `Child`.
    OneToOne,
    /// One-to-many: one `Parent` has many `Child`ren.
    OneToMany,
    /// Many-to-one: many `Child`ren belong to one `Parent`.
    #[default]
    ManyToOne,
}

/// Metadata about a relationship from one shape to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipInfo {
    /// Name of the relationship.
    pub name: &'static str,
    /// The related shape's table name.
    pub related_table: &'static str,
    /// Kind of relationship.
    pub kind: RelationshipKind,
    /// Foreign key column on the related table pointing back here
    /// (for OneToOne / OneToMany).
    pub remote_key: Option<&'static str>,
    /// Delete dependent rows when the owner is deleted.
    pub cascade_delete: bool,
    /// Delete a dependent row when it is disassociated from its owner
    /// (its foreign key set to NULL) instead of keeping it around.
    pub delete_orphan: bool,
}

impl RelationshipInfo {
    /// Create a new relationship with required fields.
    #[must_use]
    pub const fn new(
        name: &'static str,
        related_table: &'static str,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            name,
            related_table,
            kind,
            remote_key: None,
            cascade_delete: false,
            delete_orphan: false,
        }
    }

    /// Set the foreign key column on the related table.
    #[must_use]
    pub const fn remote_key(mut self, key: &'static str) -> Self {
        self.remote_key = Some(key);
        self
    }

    /// Enable cascade delete behavior.
    #[must_use]
    pub const fn cascade_delete(mut self, value: bool) -> Self {
        self.cascade_delete = value;
        self
    }

    /// Enable delete-orphan behavior.
    #[must_use]
    pub const fn delete_orphan(mut self, value: bool) -> Self {
        self.delete_orphan = value;
        self
    }
}
