//! Port abstraction for the hosted data gateway's table CRUD surface.
//!
//! Every entity store talks to its table exclusively through this port.
//! Production backs it with the REST adapter; tests use [`FixtureGateway`]
//! or a scripted double, which is what keeps the reconciliation
//! properties testable without a network.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entity::{AdminRecord, EntityId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by data gateway adapters.
    pub enum GatewayError {
        /// The gateway could not be reached or the connection dropped.
        Transport { message: String } => "gateway transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "gateway request timed out: {message}",
        /// Row-level security or the role claim denied the operation.
        PermissionDenied { message: String } => "gateway denied the operation: {message}",
        /// A uniqueness or referential constraint rejected the mutation.
        Constraint { message: String } => "gateway constraint violation: {message}",
        /// The targeted row does not exist server-side.
        NotFound { message: String } => "gateway row not found: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "gateway response could not be decoded: {message}",
        /// The request was malformed.
        InvalidRequest { message: String } => "gateway rejected the request: {message}",
    }
}

/// Table-scoped CRUD port for one entity type.
///
/// Mutations return the server's row (with assigned id, defaults, and
/// timestamps) so stores can patch their local copy without re-fetching
/// the whole collection.
#[async_trait]
pub trait EntityGateway<E: AdminRecord>: Send + Sync {
    /// Fetch the full collection in stable server order.
    async fn list(&self) -> Result<Vec<E>, GatewayError>;

    /// Insert a new row and return it as stored.
    async fn insert(&self, draft: &E::Draft) -> Result<E, GatewayError>;

    /// Apply a partial update to `id` and return the merged row.
    async fn patch(&self, id: &EntityId, patch: &E::Patch) -> Result<E, GatewayError>;

    /// Delete the row with `id`.
    async fn delete(&self, id: &EntityId) -> Result<(), GatewayError>;
}

/// Builds a row from a draft the way the server would on insert.
pub type DraftMaterialiser<E> =
    fn(EntityId, &<E as AdminRecord>::Draft, DateTime<Utc>) -> E;

/// Merges a patch into a row the way the server would on update.
pub type PatchMerger<E> = fn(&E, &<E as AdminRecord>::Patch, DateTime<Utc>) -> E;

/// Deterministic in-memory gateway for tests and local development.
///
/// Behaves like the hosted gateway's table surface: it assigns ids,
/// merges patches server-side, and can be scripted to fail — either the
/// next `list`/`insert` call, or every mutation touching a rejected id
/// (simulating row-level security).
pub struct FixtureGateway<E: AdminRecord> {
    rows: Mutex<Vec<E>>,
    make: DraftMaterialiser<E>,
    merge: PatchMerger<E>,
    rejected_ids: Mutex<BTreeSet<EntityId>>,
    next_list_failure: Mutex<Option<GatewayError>>,
    next_insert_failure: Mutex<Option<GatewayError>>,
    next_id: AtomicU64,
    list_calls: AtomicU64,
}

impl<E: AdminRecord> FixtureGateway<E> {
    /// Create an empty fixture with the entity type's draft/patch
    /// semantics (e.g. `AdminUser::from_draft` / `AdminUser::apply_patch`).
    pub fn new(make: DraftMaterialiser<E>, merge: PatchMerger<E>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            make,
            merge,
            rejected_ids: Mutex::new(BTreeSet::new()),
            next_list_failure: Mutex::new(None),
            next_insert_failure: Mutex::new(None),
            next_id: AtomicU64::new(1),
            list_calls: AtomicU64::new(0),
        }
    }

    /// Number of `list` calls observed, successful or not.
    pub fn list_call_count(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Seed the table with existing rows.
    pub fn seed(&self, rows: impl IntoIterator<Item = E>) {
        self.rows.lock().expect("fixture rows poisoned").extend(rows);
    }

    /// Reject every future mutation touching `id` with a permission error.
    pub fn reject_id(&self, id: EntityId) {
        self.rejected_ids
            .lock()
            .expect("fixture rejections poisoned")
            .insert(id);
    }

    /// Fail the next `list` call with `error`.
    pub fn fail_next_list(&self, error: GatewayError) {
        *self
            .next_list_failure
            .lock()
            .expect("fixture failures poisoned") = Some(error);
    }

    /// Fail the next `insert` call with `error`.
    pub fn fail_next_insert(&self, error: GatewayError) {
        *self
            .next_insert_failure
            .lock()
            .expect("fixture failures poisoned") = Some(error);
    }

    /// Snapshot of the current server-side rows.
    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().expect("fixture rows poisoned").clone()
    }

    fn check_rejection(&self, id: &EntityId) -> Result<(), GatewayError> {
        let rejected = self
            .rejected_ids
            .lock()
            .expect("fixture rejections poisoned");
        if rejected.contains(id) {
            return Err(GatewayError::permission_denied(format!(
                "row-level security rejected {id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: AdminRecord> EntityGateway<E> for FixtureGateway<E> {
    async fn list(&self) -> Result<Vec<E>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self
            .next_list_failure
            .lock()
            .expect("fixture failures poisoned")
            .take()
        {
            return Err(error);
        }
        Ok(self.rows())
    }

    async fn insert(&self, draft: &E::Draft) -> Result<E, GatewayError> {
        if let Some(error) = self
            .next_insert_failure
            .lock()
            .expect("fixture failures poisoned")
            .take()
        {
            return Err(error);
        }

        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = EntityId::new(format!("srv-{sequence}")).unwrap_or_else(|_| EntityId::random());
        let row = (self.make)(id, draft, Utc::now());
        self.rows
            .lock()
            .expect("fixture rows poisoned")
            .push(row.clone());
        Ok(row)
    }

    async fn patch(&self, id: &EntityId, patch: &E::Patch) -> Result<E, GatewayError> {
        self.check_rejection(id)?;
        let mut rows = self.rows.lock().expect("fixture rows poisoned");
        let Some(slot) = rows.iter_mut().find(|row| row.id() == id) else {
            return Err(GatewayError::not_found(format!("{} {id}", E::KIND)));
        };
        let merged = (self.merge)(slot, patch, Utc::now());
        *slot = merged.clone();
        Ok(merged)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), GatewayError> {
        self.check_rejection(id)?;
        let mut rows = self.rows.lock().expect("fixture rows poisoned");
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(GatewayError::not_found(format!("{} {id}", E::KIND)));
        }
        Ok(())
    }
}
