//! The unit-of-work session.
//!
//! The session tracks record instances, coordinates flushing changes to
//! the engine, and reports the lifecycle state of everything it has
//! seen. The state machine follows the classic ORM vocabulary:
//!
//! - **transient**: constructed, never added to a session;
//! - **pending**: added, INSERT not yet flushed;
//! - **persistent**: flushed or loaded, tracked in the identity map;
//! - **deleted**: DELETE flushed but not committed;
//! - **detached**: expunged, or deleted and committed.
//!
//! One deliberately preserved quirk: an instance whose DELETE was
//! flushed stays in the deleted state across a rollback, even though the
//! row itself is restored. The row can then be deleted and committed
//! again. This matches the observable behavior the session is modeled
//! on.

use std::collections::HashMap;

use ormlab_core::{ColumnDef, Error, Model, Record, RelationshipInfo, Result, Value, quote_ident};
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, Row};
use crate::metadata::Metadata;

// ============================================================================
// Instance identity and state
// ============================================================================

/// Handle for an instance tracked by a session.
///
/// Ids are session-local and monotonically assigned at `add` time, so a
/// pending instance has an identity before the database assigns its
/// primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

/// Lifecycle state of an instance relative to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    /// Constructed but never added to a session.
    Transient,
    /// Added to the session, INSERT not yet flushed.
    Pending,
    /// Flushed or loaded; present in the identity map.
    Persistent,
    /// DELETE flushed, transaction not yet committed.
    Deleted,
    /// No longer associated with the session.
    Detached,
}

/// Boolean view of an instance's lifecycle, one flag per state, plus the
/// sticky `was_deleted` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// Never added to a session.
    pub transient: bool,
    /// Added, not yet flushed.
    pub pending: bool,
    /// Tracked and flushed/loaded.
    pub persistent: bool,
    /// DELETE flushed, not committed.
    pub deleted: bool,
    /// Detached from the session.
    pub detached: bool,
    /// A DELETE was flushed for this instance at some point.
    pub was_deleted: bool,
}

impl Inspection {
    fn new(state: InstanceState, was_deleted: bool) -> Self {
        Self {
            transient: state == InstanceState::Transient,
            pending: state == InstanceState::Pending,
            persistent: state == InstanceState::Persistent,
            deleted: state == InstanceState::Deleted,
            detached: state == InstanceState::Detached,
            was_deleted,
        }
    }
}

struct TrackedInstance {
    record: Record,
    state: InstanceState,
    was_deleted: bool,
}

/// Counters describing session state, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDebugInfo {
    /// Total tracked instances.
    pub tracked: usize,
    /// Instances pending INSERT.
    pub pending_new: usize,
    /// Instances queued for DELETE.
    pub pending_delete: usize,
    /// Dirty instances pending UPDATE.
    pub pending_dirty: usize,
    /// Whether a transaction is open.
    pub in_transaction: bool,
}

// ============================================================================
// Session
// ============================================================================

/// A unit-of-work session over an [`Engine`].
///
/// Sessions borrow the engine and the metadata registry; create as many
/// as needed, sequentially, from the same engine.
pub struct Session<'e> {
    engine: &'e Engine,
    metadata: &'e Metadata,
    in_transaction: bool,
    instances: HashMap<InstanceId, TrackedInstance>,
    /// (table, primary key) index over persistent instances.
    identity: HashMap<(String, Value), InstanceId>,
    pending_new: Vec<InstanceId>,
    pending_delete: Vec<InstanceId>,
    pending_dirty: Vec<InstanceId>,
    /// Instances INSERTed since the transaction began; dropped on rollback.
    flushed_this_tx: Vec<InstanceId>,
    next_id: u64,
}

impl<'e> Session<'e> {
    /// Create a session bound to an engine and a metadata registry.
    #[must_use]
    pub fn new(engine: &'e Engine, metadata: &'e Metadata) -> Self {
        Self {
            engine,
            metadata,
            in_transaction: false,
            instances: HashMap::new(),
            identity: HashMap::new(),
            pending_new: Vec::new(),
            pending_delete: Vec::new(),
            pending_dirty: Vec::new(),
            flushed_this_tx: Vec::new(),
            next_id: 0,
        }
    }

    fn alloc_id(&mut self) -> InstanceId {
        self.next_id += 1;
        InstanceId(self.next_id)
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    /// Add a model instance to the session. It will be INSERTed on the
    /// next flush.
    pub fn add<M: Model>(&mut self, obj: &M) -> Result<InstanceId> {
        self.add_record(obj.to_record())
    }

    /// Add a record to the session.
    ///
    /// The record's table must be registered in the metadata. If a
    /// persistent instance with the same identity is already tracked,
    /// its session copy is replaced and marked dirty; a deleted instance
    /// is revived instead of re-added.
    #[tracing::instrument(level = "debug", skip(self, record), fields(table = record.table()))]
    pub fn add_record(&mut self, record: Record) -> Result<InstanceId> {
        if self.metadata.table(record.table()).is_none() {
            return Err(Error::UnknownTable(record.table().to_string()));
        }

        if let Some(pk) = record.primary_key() {
            let key = (record.table().to_string(), pk.clone());
            if let Some(&id) = self.identity.get(&key) {
                if let Some(tracked) = self.instances.get_mut(&id) {
                    tracked.record = record;
                    match tracked.state {
                        InstanceState::Deleted => {
                            tracked.state = InstanceState::Persistent;
                            self.pending_delete.retain(|q| q != &id);
                            // The identity entry left with mark_deleted;
                            // a revived instance needs it back.
                            self.identity.insert(key, id);
                        }
                        InstanceState::Persistent => {
                            if !self.pending_dirty.contains(&id) {
                                self.pending_dirty.push(id);
                            }
                        }
                        _ => {}
                    }
                    return Ok(id);
                }
            }
        }

        let id = self.alloc_id();
        tracing::debug!(table = record.table(), ?id, "adding instance");
        self.instances.insert(
            id,
            TrackedInstance {
                record,
                state: InstanceState::Pending,
                was_deleted: false,
            },
        );
        self.pending_new.push(id);
        Ok(id)
    }

    /// Mark an instance for deletion on the next flush.
    ///
    /// A pending instance is simply dropped (it becomes transient
    /// again). Deleting a detached instance is an error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: InstanceId) -> Result<()> {
        let state = self
            .instances
            .get(&id)
            .map(|t| t.state)
            .ok_or(Error::NotTracked)?;
        match state {
            InstanceState::Pending => {
                self.instances.remove(&id);
                self.pending_new.retain(|q| q != &id);
                Ok(())
            }
            InstanceState::Persistent | InstanceState::Deleted => {
                if !self.pending_delete.contains(&id) {
                    self.pending_delete.push(id);
                }
                self.pending_dirty.retain(|q| q != &id);
                Ok(())
            }
            InstanceState::Detached | InstanceState::Transient => Err(Error::NotTracked),
        }
    }

    /// Set a column on a tracked instance. Persistent instances are
    /// marked dirty and UPDATEd (or orphan-deleted) on the next flush.
    pub fn set(&mut self, id: InstanceId, column: &str, value: impl Into<Value>) -> Result<()> {
        let tracked = self.instances.get_mut(&id).ok_or(Error::NotTracked)?;
        tracked.record.set(column, value)?;
        // Deleted instances stay dirty-trackable so a rolled-back orphan
        // disassociation can be flushed again.
        if matches!(
            tracked.state,
            InstanceState::Persistent | InstanceState::Deleted
        ) && !self.pending_dirty.contains(&id)
        {
            self.pending_dirty.push(id);
        }
        Ok(())
    }

    /// Detach an instance from the session.
    pub fn expunge(&mut self, id: InstanceId) {
        if let Some(tracked) = self.instances.get_mut(&id) {
            tracked.state = InstanceState::Detached;
            if let Some(pk) = tracked.record.primary_key() {
                let key = (tracked.record.table().to_string(), pk.clone());
                self.identity.remove(&key);
            }
        }
        self.pending_new.retain(|q| q != &id);
        self.pending_delete.retain(|q| q != &id);
        self.pending_dirty.retain(|q| q != &id);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// The lifecycle state of an instance. Unknown handles (including
    /// pending instances dropped by `delete` or `rollback`) report
    /// transient.
    #[must_use]
    pub fn state(&self, id: InstanceId) -> InstanceState {
        self.instances
            .get(&id)
            .map_or(InstanceState::Transient, |t| t.state)
    }

    /// The lifecycle state of an untracked record, resolved through the
    /// identity index. Records the session has never seen are transient.
    #[must_use]
    pub fn state_of(&self, record: &Record) -> InstanceState {
        let Some(pk) = record.primary_key() else {
            return InstanceState::Transient;
        };
        let key = (record.table().to_string(), pk.clone());
        self.identity
            .get(&key)
            .map_or(InstanceState::Transient, |id| self.state(*id))
    }

    /// Boolean lifecycle view of an instance.
    #[must_use]
    pub fn inspect(&self, id: InstanceId) -> Inspection {
        let was_deleted = self.instances.get(&id).is_some_and(|t| t.was_deleted);
        Inspection::new(self.state(id), was_deleted)
    }

    /// Whether the session tracks this instance (in any state).
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    /// The session's copy of a tracked record.
    pub fn record(&self, id: InstanceId) -> Result<&Record> {
        self.instances
            .get(&id)
            .map(|t| &t.record)
            .ok_or(Error::NotTracked)
    }

    /// Counters for logging and assertions.
    #[must_use]
    pub fn debug_state(&self) -> SessionDebugInfo {
        SessionDebugInfo {
            tracked: self.instances.len(),
            pending_new: self.pending_new.len(),
            pending_delete: self.pending_delete.len(),
            pending_dirty: self.pending_dirty.len(),
            in_transaction: self.in_transaction,
        }
    }

    /// Whether a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a model instance by primary key. The identity map is
    /// consulted before the database.
    pub fn get<M: Model>(&mut self, pk: impl Into<Value>) -> Result<Option<(InstanceId, M)>> {
        let pk = pk.into();
        let key = (M::TABLE_NAME.to_string(), pk.clone());
        if let Some(&id) = self.identity.get(&key) {
            let tracked = self.instances.get(&id).ok_or(Error::NotTracked)?;
            if tracked.state == InstanceState::Persistent {
                return Ok(Some((id, M::from_record(&tracked.record)?)));
            }
            return Ok(None);
        }

        let pk_col = primary_key_column(&M::columns()).ok_or_else(|| Error::MissingPrimaryKey {
            table: M::TABLE_NAME.to_string(),
        })?;
        self.fetch_typed::<M>(Some((&pk_col, &pk)))
    }

    /// The first row of a model's table, if any.
    pub fn first<M: Model>(&mut self) -> Result<Option<(InstanceId, M)>> {
        self.fetch_typed::<M>(None)
    }

    /// The first row matching `column = value`, if any.
    pub fn find_by<M: Model>(
        &mut self,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<Option<(InstanceId, M)>> {
        let columns = M::columns();
        if !columns.iter().any(|c| c.name == column) {
            return Err(Error::UnknownColumn {
                table: M::TABLE_NAME.to_string(),
                column: column.to_string(),
            });
        }
        let value = value.into();
        self.fetch_typed::<M>(Some((column, &value)))
    }

    /// The first row of a dynamically generated shape's table, if any.
    pub fn first_of(&mut self, shape: &ormlab_core::TableShape) -> Result<Option<InstanceId>> {
        self.fetch_one(shape.table_name(), shape.columns(), None)
    }

    fn fetch_typed<M: Model>(
        &mut self,
        filter: Option<(&str, &Value)>,
    ) -> Result<Option<(InstanceId, M)>> {
        let columns = M::columns();
        match self.fetch_one(M::TABLE_NAME, &columns, filter)? {
            Some(id) => {
                let obj = M::from_record(self.record(id)?)?;
                Ok(Some((id, obj)))
            }
            None => Ok(None),
        }
    }

    fn fetch_one(
        &mut self,
        table: &str,
        columns: &[ColumnDef],
        filter: Option<(&str, &Value)>,
    ) -> Result<Option<InstanceId>> {
        let mut sql = format!("SELECT * FROM {}", quote_ident(table));
        let mut params: Vec<Value> = Vec::new();
        if let Some((column, value)) = filter {
            sql.push_str(&format!(" WHERE {} = ?1", quote_ident(column)));
            params.push(value.clone());
        }
        sql.push_str(" LIMIT 1");

        let rows = self.engine.query(&sql, &params)?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let record = record_from_row(table, columns, row)?;

        // Identity map wins over a fresh load.
        if let Some(pk) = record.primary_key() {
            let key = (table.to_string(), pk.clone());
            if let Some(&id) = self.identity.get(&key) {
                return Ok(Some(id));
            }
        }

        let id = self.alloc_id();
        if let Some(pk) = record.primary_key() {
            self.identity.insert((table.to_string(), pk.clone()), id);
        }
        self.instances.insert(
            id,
            TrackedInstance {
                record,
                state: InstanceState::Persistent,
                was_deleted: false,
            },
        );
        Ok(Some(id))
    }

    // ========================================================================
    // Unit of work
    // ========================================================================

    fn begin(&mut self) -> Result<()> {
        if !self.in_transaction {
            tracing::debug!("beginning transaction");
            self.engine.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }

    /// Flush pending changes to the database without committing.
    ///
    /// Deletes run first (cascading to dependent rows), then inserts
    /// (backfilling auto-increment primary keys), then updates, with
    /// dirty orphans converted to deletes.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn flush(&mut self) -> Result<()> {
        tracing::debug!(
            inserts = self.pending_new.len(),
            deletes = self.pending_delete.len(),
            updates = self.pending_dirty.len(),
            "flushing"
        );
        self.begin()?;

        self.flush_deletes()?;
        self.flush_inserts()?;
        self.flush_updates()?;

        Ok(())
    }

    fn flush_deletes(&mut self) -> Result<()> {
        let deletes = std::mem::take(&mut self.pending_delete);
        for id in deletes {
            let (table, pk) = {
                let tracked = self.instances.get(&id).ok_or(Error::NotTracked)?;
                let pk = tracked
                    .record
                    .primary_key()
                    .ok_or_else(|| Error::MissingPrimaryKey {
                        table: tracked.record.table().to_string(),
                    })?
                    .clone();
                (tracked.record.table().to_string(), pk)
            };

            self.cascade_delete(&table, &pk)?;

            let pk_col = self
                .instances
                .get(&id)
                .and_then(|t| t.record.primary_key_column().map(ToString::to_string))
                .ok_or(Error::NotTracked)?;
            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1",
                quote_ident(&table),
                quote_ident(&pk_col)
            );
            self.engine.execute(&sql, &[pk.clone()])?;
            self.mark_deleted(id, &table, &pk);
        }
        Ok(())
    }

    /// Delete dependent rows of relationships that cascade, before their
    /// owner's own DELETE.
    fn cascade_delete(&mut self, table: &str, pk: &Value) -> Result<()> {
        let rels: Vec<RelationshipInfo> = self
            .metadata
            .table(table)
            .map(|t| {
                t.relationships
                    .iter()
                    .filter(|rel| rel.cascade_delete)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        for rel in rels {
            let Some(fk) = rel.remote_key else { continue };
            tracing::debug!(
                owner = table,
                dependent = rel.related_table,
                fk,
                "cascading delete"
            );
            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1",
                quote_ident(rel.related_table),
                quote_ident(fk)
            );
            self.engine.execute(&sql, &[pk.clone()])?;

            // Tracked dependents transition with their rows.
            let dependent_ids: Vec<InstanceId> = self
                .instances
                .iter()
                .filter(|(_, t)| {
                    t.record.table() == rel.related_table
                        && t.state == InstanceState::Persistent
                        && t.record.get(fk) == Some(pk)
                })
                .map(|(id, _)| *id)
                .collect();
            for dep_id in dependent_ids {
                let (dep_table, dep_pk) = {
                    let t = self.instances.get(&dep_id).ok_or(Error::NotTracked)?;
                    (
                        t.record.table().to_string(),
                        t.record.primary_key().cloned(),
                    )
                };
                if let Some(dep_pk) = dep_pk {
                    self.mark_deleted(dep_id, &dep_table, &dep_pk);
                }
                self.pending_dirty.retain(|q| q != &dep_id);
            }
        }
        Ok(())
    }

    fn mark_deleted(&mut self, id: InstanceId, table: &str, pk: &Value) {
        if let Some(tracked) = self.instances.get_mut(&id) {
            tracked.state = InstanceState::Deleted;
            tracked.was_deleted = true;
        }
        // Another instance may own the entry (a reload after rollback);
        // only remove it when it points at the one being deleted.
        let key = (table.to_string(), pk.clone());
        if self.identity.get(&key) == Some(&id) {
            self.identity.remove(&key);
        }
    }

    fn flush_inserts(&mut self) -> Result<()> {
        let inserts = std::mem::take(&mut self.pending_new);
        for id in inserts {
            let (sql, params, table) = {
                let tracked = self.instances.get(&id).ok_or(Error::NotTracked)?;
                let pairs = tracked.record.insert_pairs();
                let table = tracked.record.table().to_string();
                let sql = if pairs.is_empty() {
                    format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&table))
                } else {
                    let columns: Vec<String> =
                        pairs.iter().map(|(c, _)| quote_ident(c)).collect();
                    let placeholders: Vec<String> =
                        (1..=pairs.len()).map(|i| format!("?{i}")).collect();
                    format!(
                        "INSERT INTO {} ({}) VALUES ({})",
                        quote_ident(&table),
                        columns.join(", "),
                        placeholders.join(", ")
                    )
                };
                let params: Vec<Value> = pairs.into_iter().map(|(_, v)| v.clone()).collect();
                (sql, params, table)
            };

            self.engine.execute(&sql, &params)?;
            let rowid = self.engine.last_insert_rowid();

            let tracked = self.instances.get_mut(&id).ok_or(Error::NotTracked)?;
            let auto_pk = tracked
                .record
                .columns()
                .iter()
                .find(|c| c.primary_key && c.auto_increment)
                .map(|c| c.name.clone());
            if let Some(pk_col) = auto_pk {
                if !tracked.record.has(&pk_col) {
                    tracked.record.set(&pk_col, rowid)?;
                }
            }
            tracked.state = InstanceState::Persistent;
            if let Some(pk) = tracked.record.primary_key() {
                self.identity.insert((table, pk.clone()), id);
            }
            self.flushed_this_tx.push(id);
        }
        Ok(())
    }

    fn flush_updates(&mut self) -> Result<()> {
        let dirty = std::mem::take(&mut self.pending_dirty);
        for id in dirty {
            if self.flush_orphan(id)? {
                continue;
            }

            let (sql, params) = {
                let tracked = self.instances.get(&id).ok_or(Error::NotTracked)?;
                if tracked.state != InstanceState::Persistent {
                    continue;
                }
                let table = tracked.record.table().to_string();
                let pk_col = tracked.record.primary_key_column().ok_or_else(|| {
                    Error::MissingPrimaryKey {
                        table: table.clone(),
                    }
                })?;
                let pk = tracked
                    .record
                    .primary_key()
                    .ok_or_else(|| Error::MissingPrimaryKey {
                        table: table.clone(),
                    })?
                    .clone();

                let pairs: Vec<(&str, &Value)> = tracked
                    .record
                    .value_pairs()
                    .into_iter()
                    .filter(|(c, _)| *c != pk_col)
                    .collect();
                if pairs.is_empty() {
                    continue;
                }
                let assignments: Vec<String> = pairs
                    .iter()
                    .enumerate()
                    .map(|(i, (c, _))| format!("{} = ?{}", quote_ident(c), i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE {} = ?{}",
                    quote_ident(&table),
                    assignments.join(", "),
                    quote_ident(pk_col),
                    pairs.len() + 1
                );
                let mut params: Vec<Value> = pairs.into_iter().map(|(_, v)| v.clone()).collect();
                params.push(pk);
                (sql, params)
            };
            self.engine.execute(&sql, &params)?;
        }
        Ok(())
    }

    /// If a dirty instance has been disassociated from a delete-orphan
    /// relationship (its foreign key is NULL), flush it as a DELETE.
    /// Returns true when the instance was handled here.
    fn flush_orphan(&mut self, id: InstanceId) -> Result<bool> {
        let orphan = {
            let Some(tracked) = self.instances.get(&id) else {
                return Ok(false);
            };
            if !matches!(
                tracked.state,
                InstanceState::Persistent | InstanceState::Deleted
            ) {
                return Ok(false);
            }
            let table = tracked.record.table();
            self.metadata
                .relationships_into(table)
                .iter()
                .filter(|rel| rel.delete_orphan)
                .filter_map(|rel| rel.remote_key)
                .any(|fk| tracked.record.get(fk) == Some(&Value::Null))
        };
        if !orphan {
            return Ok(false);
        }

        let (table, pk_col, pk) = {
            let tracked = self.instances.get(&id).ok_or(Error::NotTracked)?;
            let table = tracked.record.table().to_string();
            let pk_col = tracked
                .record
                .primary_key_column()
                .ok_or_else(|| Error::MissingPrimaryKey {
                    table: table.clone(),
                })?
                .to_string();
            let pk = tracked
                .record
                .primary_key()
                .ok_or_else(|| Error::MissingPrimaryKey {
                    table: table.clone(),
                })?
                .clone();
            (table, pk_col, pk)
        };

        tracing::debug!(table = %table, "deleting orphaned instance");
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_ident(&table),
            quote_ident(&pk_col)
        );
        self.engine.execute(&sql, &[pk.clone()])?;
        self.mark_deleted(id, &table, &pk);
        Ok(true)
    }

    /// Flush pending changes and commit the transaction. Deleted
    /// instances become detached.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit(&mut self) -> Result<()> {
        self.flush()?;
        if self.in_transaction {
            tracing::debug!("committing transaction");
            self.engine.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        for tracked in self.instances.values_mut() {
            if tracked.state == InstanceState::Deleted {
                tracked.state = InstanceState::Detached;
            }
        }
        self.flushed_this_tx.clear();
        Ok(())
    }

    /// Roll back the transaction.
    ///
    /// Pending instances are dropped (transient again) and instances
    /// inserted during this transaction are untracked, since their rows
    /// no longer exist. Instances already flushed as deleted keep the
    /// deleted state even though their rows are restored.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rollback(&mut self) -> Result<()> {
        if self.in_transaction {
            tracing::debug!("rolling back transaction");
            self.engine.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
        }

        for id in std::mem::take(&mut self.pending_new) {
            self.instances.remove(&id);
        }
        for id in std::mem::take(&mut self.flushed_this_tx) {
            if let Some(tracked) = self.instances.remove(&id) {
                if let Some(pk) = tracked.record.primary_key() {
                    self.identity
                        .remove(&(tracked.record.table().to_string(), pk.clone()));
                }
            }
        }
        // Rolled-back deletes get their rows back, so their identity
        // entries return with them; reloads then resolve to the existing
        // handle instead of minting a duplicate.
        for (id, tracked) in &self.instances {
            if tracked.state == InstanceState::Deleted {
                if let Some(pk) = tracked.record.primary_key() {
                    self.identity
                        .entry((tracked.record.table().to_string(), pk.clone()))
                        .or_insert(*id);
                }
            }
        }
        self.pending_delete.clear();
        self.pending_dirty.clear();
        Ok(())
    }

    /// Close the session: roll back any open transaction and detach
    /// every tracked instance.
    pub fn close(&mut self) -> Result<()> {
        if self.in_transaction {
            self.engine.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
        }
        for tracked in self.instances.values_mut() {
            tracked.state = InstanceState::Detached;
        }
        self.identity.clear();
        self.pending_new.clear();
        self.pending_delete.clear();
        self.pending_dirty.clear();
        self.flushed_this_tx.clear();
        Ok(())
    }
}

fn primary_key_column(columns: &[ColumnDef]) -> Option<String> {
    columns
        .iter()
        .find(|c| c.primary_key)
        .map(|c| c.name.clone())
}

fn record_from_row(table: &str, columns: &[ColumnDef], row: &Row) -> Result<Record> {
    let mut record = Record::new(table, columns.to_vec());
    for col in columns {
        if let Some(value) = row.get(&col.name) {
            record.set(&col.name, value.clone())?;
        }
    }
    Ok(record)
}
