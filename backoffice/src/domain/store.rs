//! Per-entity-type state container mediating all gateway access.
//!
//! An [`EntityStore`] owns the authoritative local copy of one
//! collection and is the only place gateway calls for that entity type
//! are made. The update strategy is local patch, not re-fetch: a
//! successful single mutation touches exactly one row of the local
//! collection, so a list of N entities never pays an O(N) reload for an
//! O(1) change.
//!
//! Mutations take `&mut self`, which is what serialises rapid
//! same-id writes: a second update cannot be issued while the first is
//! still being awaited through the same store, so a stale success
//! handler can never overwrite a newer row.

use std::sync::Arc;

use tracing::{debug, warn};

use super::entity::{AdminRecord, EntityId};
use super::error::DomainError;
use super::ports::{EntityGateway, GatewayError, Notification, Notifier};

/// Lifecycle of a collection load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load attempted yet.
    Idle,
    /// A load is in flight.
    Loading,
    /// The collection mirrors the last successful fetch.
    Ready,
    /// The most recent load failed.
    Errored,
}

/// One failed id inside a bulk mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    /// The id whose mutation failed.
    pub id: EntityId,
    /// Why it failed.
    pub error: DomainError,
}

/// Aggregate result of a bulk mutation. Partial failure is data, not an
/// exception: callers present it, they do not catch it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Ids whose mutation was applied.
    pub succeeded: Vec<EntityId>,
    /// Ids whose mutation failed, with the reason.
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Number of ids that succeeded.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of ids that failed.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert a gateway adapter failure into a domain error.
pub(crate) fn map_gateway_error(error: GatewayError) -> DomainError {
    match error {
        GatewayError::Transport { message } => {
            DomainError::service_unavailable(format!("gateway unreachable: {message}"))
        }
        GatewayError::Timeout { message } => {
            DomainError::service_unavailable(format!("gateway timed out: {message}"))
        }
        GatewayError::PermissionDenied { message } => DomainError::forbidden(message),
        GatewayError::Constraint { message } => DomainError::conflict(message),
        GatewayError::NotFound { message } => DomainError::not_found(message),
        GatewayError::Decode { message } => {
            DomainError::internal(format!("gateway response invalid: {message}"))
        }
        GatewayError::InvalidRequest { message } => DomainError::invalid_request(message),
    }
}

/// Client-side cache of one entity type's collection.
pub struct EntityStore<E: AdminRecord, G: EntityGateway<E>> {
    gateway: Arc<G>,
    notifier: Arc<dyn Notifier>,
    collection: Vec<E>,
    state: LoadState,
    stale: bool,
    loaded_once: bool,
}

impl<E: AdminRecord, G: EntityGateway<E>> EntityStore<E, G> {
    /// Create an empty store over `gateway`, raising toasts on `notifier`.
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            collection: Vec::new(),
            state: LoadState::Idle,
            stale: false,
            loaded_once: false,
        }
    }

    /// The cached collection in fetch order.
    pub fn collection(&self) -> &[E] {
        &self.collection
    }

    /// Current load lifecycle state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// `true` when the collection shown is older than the last load
    /// attempt (the "stale data" indicator after a failed re-load).
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Look up a cached entity by id.
    pub fn find(&self, id: &EntityId) -> Option<&E> {
        self.collection.iter().find(|entity| entity.id() == id)
    }

    /// `true` when `id` is present in the cached collection.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.find(id).is_some()
    }

    /// Fetch the full collection from the gateway.
    ///
    /// On failure the previous collection is kept and flagged stale
    /// rather than blanked; no toast is raised (the stale indicator is
    /// the user-visible signal).
    pub async fn load(&mut self) -> Result<(), DomainError> {
        self.state = LoadState::Loading;
        match self.gateway.list().await {
            Ok(rows) => {
                debug!(kind = E::KIND, count = rows.len(), "collection loaded");
                self.collection = rows;
                self.state = LoadState::Ready;
                self.stale = false;
                self.loaded_once = true;
                Ok(())
            }
            Err(error) => {
                warn!(kind = E::KIND, %error, "collection load failed");
                self.state = LoadState::Errored;
                self.stale = self.loaded_once;
                Err(map_gateway_error(error))
            }
        }
    }

    /// Insert a new entity and append the gateway's row to the
    /// collection.
    pub async fn create(&mut self, draft: &E::Draft) -> Result<E, DomainError> {
        match self.gateway.insert(draft).await {
            Ok(entity) => {
                self.collection.push(entity.clone());
                self.notifier.notify(Notification::success(
                    "Created",
                    format!("The {} was created.", E::KIND),
                ));
                Ok(entity)
            }
            Err(error) => {
                warn!(kind = E::KIND, %error, "create failed");
                let error = map_gateway_error(error);
                self.notifier
                    .notify(Notification::destructive("Create failed", error.message()));
                Err(error)
            }
        }
    }

    /// Patch `id` and replace the single cached row with the gateway's
    /// merged result.
    ///
    /// An id absent from the cache is a hard failure surfaced before any
    /// network call: silently dropping an intended edit would be
    /// misleading.
    pub async fn update(&mut self, id: &EntityId, patch: &E::Patch) -> Result<E, DomainError> {
        if !self.contains(id) {
            let error = DomainError::not_found(format!("{} {id} is no longer present", E::KIND));
            self.notifier
                .notify(Notification::destructive("Update failed", error.message()));
            return Err(error);
        }

        match self.gateway.patch(id, patch).await {
            Ok(merged) => {
                self.replace(merged.clone());
                self.notifier.notify(Notification::success(
                    "Saved",
                    format!("The {} was updated.", E::KIND),
                ));
                Ok(merged)
            }
            Err(error) => {
                warn!(kind = E::KIND, %id, %error, "update failed");
                let error = map_gateway_error(error);
                self.notifier
                    .notify(Notification::destructive("Update failed", error.message()));
                Err(error)
            }
        }
    }

    /// Delete `id`, pruning it from the collection.
    ///
    /// Idempotent from the caller's perspective: an id absent from the
    /// cache is a silent no-op success, and a row already gone
    /// server-side is treated as deleted.
    pub async fn remove(&mut self, id: &EntityId) -> Result<(), DomainError> {
        if !self.contains(id) {
            return Ok(());
        }

        match self.gateway.delete(id).await {
            Ok(()) | Err(GatewayError::NotFound { .. }) => {
                self.prune(id);
                self.notifier.notify(Notification::success(
                    "Deleted",
                    format!("The {} was deleted.", E::KIND),
                ));
                Ok(())
            }
            Err(error) => {
                warn!(kind = E::KIND, %id, %error, "delete failed");
                let error = map_gateway_error(error);
                self.notifier
                    .notify(Notification::destructive("Delete failed", error.message()));
                Err(error)
            }
        }
    }

    /// Patch every id in `ids` independently and gather the results.
    ///
    /// Per-id calls are issued concurrently and all settle before the
    /// outcome is reported; one bad row never blocks the rest. No toast
    /// is raised here — the bulk executor owns the one consolidated
    /// notification.
    pub async fn bulk_update(&mut self, ids: &[EntityId], patch: &E::Patch) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        let mut pending: Vec<EntityId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.contains(id) {
                pending.push(id.clone());
            } else {
                outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error: DomainError::not_found(format!(
                        "{} {id} is no longer present",
                        E::KIND
                    )),
                });
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let results = futures_util::future::join_all(pending.iter().map(|id| {
            let gateway = Arc::clone(&gateway);
            async move { (id.clone(), gateway.patch(id, patch).await) }
        }))
        .await;

        for (id, result) in results {
            match result {
                Ok(merged) => {
                    self.replace(merged);
                    outcome.succeeded.push(id);
                }
                Err(error) => {
                    warn!(kind = E::KIND, %id, %error, "bulk update failed for id");
                    outcome.failed.push(BulkFailure {
                        id,
                        error: map_gateway_error(error),
                    });
                }
            }
        }

        debug!(
            kind = E::KIND,
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "bulk update settled"
        );
        outcome
    }

    /// Delete every id in `ids` independently and gather the results.
    ///
    /// Carries the same idempotency as [`EntityStore::remove`]: ids
    /// already absent count as succeeded.
    pub async fn bulk_remove(&mut self, ids: &[EntityId]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        let mut pending: Vec<EntityId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.contains(id) {
                pending.push(id.clone());
            } else {
                outcome.succeeded.push(id.clone());
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let results = futures_util::future::join_all(pending.iter().map(|id| {
            let gateway = Arc::clone(&gateway);
            async move { (id.clone(), gateway.delete(id).await) }
        }))
        .await;

        for (id, result) in results {
            match result {
                Ok(()) | Err(GatewayError::NotFound { .. }) => {
                    self.prune(&id);
                    outcome.succeeded.push(id);
                }
                Err(error) => {
                    warn!(kind = E::KIND, %id, %error, "bulk delete failed for id");
                    outcome.failed.push(BulkFailure {
                        id,
                        error: map_gateway_error(error),
                    });
                }
            }
        }

        debug!(
            kind = E::KIND,
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "bulk delete settled"
        );
        outcome
    }

    fn replace(&mut self, entity: E) {
        if let Some(slot) = self
            .collection
            .iter_mut()
            .find(|existing| existing.id() == entity.id())
        {
            *slot = entity;
        }
    }

    fn prune(&mut self, id: &EntityId) {
        self.collection.retain(|entity| entity.id() != id);
    }
}

#[cfg(test)]
mod tests {
    //! Reconciliation behaviour of the entity store against a scripted
    //! gateway.

    use super::*;
    use crate::domain::ports::{FixtureGateway, RecordingNotifier, ToastVariant};
    use crate::domain::user::{
        AccountStatus, AdminUser, Email, PersonName, UserDraft, UserPatch, UserRole,
    };

    type UserStore = EntityStore<AdminUser, FixtureGateway<AdminUser>>;

    fn draft(email: &str, role: UserRole) -> UserDraft {
        UserDraft {
            email: Email::new(email).expect("valid email"),
            full_name: PersonName::new("Store Test").expect("valid name"),
            role,
        }
    }

    async fn seeded_store(count: usize) -> (UserStore, Arc<FixtureGateway<AdminUser>>, Arc<RecordingNotifier>) {
        let gateway = Arc::new(FixtureGateway::new(
            AdminUser::from_draft,
            AdminUser::apply_patch,
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let mut store = EntityStore::new(Arc::clone(&gateway), notifier.clone());
        for n in 0..count {
            gateway
                .insert(&draft(&format!("user{n}@example.com"), UserRole::Member))
                .await
                .expect("seed insert");
        }
        store.load().await.expect("initial load");
        (store, gateway, notifier)
    }

    #[tokio::test]
    async fn load_replaces_the_collection_and_clears_staleness() {
        let (store, _gateway, _notifier) = seeded_store(3).await;
        assert_eq!(store.state(), LoadState::Ready);
        assert_eq!(store.collection().len(), 3);
        assert!(!store.is_stale());
    }

    #[tokio::test]
    async fn failed_reload_keeps_the_last_good_collection_and_flags_stale() {
        let (mut store, gateway, notifier) = seeded_store(2).await;
        let baseline = notifier.count();

        gateway.fail_next_list(GatewayError::transport("connection reset"));
        let err = store.load().await.expect_err("reload must fail");

        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
        assert_eq!(store.state(), LoadState::Errored);
        assert!(store.is_stale(), "stale indicator must be set");
        assert_eq!(store.collection().len(), 2, "last good data is kept");
        assert_eq!(notifier.count(), baseline, "load failures raise no toast");
    }

    #[tokio::test]
    async fn first_load_failure_is_errored_but_not_stale() {
        let gateway = Arc::new(FixtureGateway::new(
            AdminUser::from_draft,
            AdminUser::apply_patch,
        ));
        gateway.fail_next_list(GatewayError::timeout("deadline"));
        let notifier = Arc::new(RecordingNotifier::new());
        let mut store: UserStore = EntityStore::new(Arc::clone(&gateway), notifier);

        assert!(store.load().await.is_err());
        assert_eq!(store.state(), LoadState::Errored);
        assert!(!store.is_stale(), "nothing good to be stale relative to");
    }

    #[tokio::test]
    async fn create_appends_the_gateway_row_with_its_assigned_id() {
        let (mut store, _gateway, notifier) = seeded_store(1).await;

        let created = store
            .create(&draft("new@example.com", UserRole::Editor))
            .await
            .expect("create succeeds");

        assert_eq!(store.collection().len(), 2);
        assert!(!created.id().as_ref().is_empty(), "id is server-assigned");
        let toast = notifier.seen().pop().expect("one toast");
        assert_eq!(toast.variant, ToastVariant::Success);
    }

    #[tokio::test]
    async fn failed_create_leaves_the_collection_unchanged() {
        let (mut store, gateway, notifier) = seeded_store(1).await;
        gateway.fail_next_insert(GatewayError::constraint("duplicate email"));

        let err = store
            .create(&draft("dup@example.com", UserRole::Member))
            .await
            .expect_err("create must fail");

        assert_eq!(err.code(), crate::domain::ErrorCode::Conflict);
        assert_eq!(store.collection().len(), 1);
        let toast = notifier.seen().pop().expect("one toast");
        assert_eq!(toast.variant, ToastVariant::Destructive);
    }

    #[tokio::test]
    async fn update_changes_exactly_one_row_without_a_refetch() {
        let (mut store, gateway, _notifier) = seeded_store(3).await;
        let before: Vec<AdminUser> = store.collection().to_vec();
        let target = before.get(1).expect("seeded row").id().clone();
        let list_calls = gateway.list_call_count();

        let merged = store
            .update(&target, &UserPatch::role(UserRole::Admin))
            .await
            .expect("update succeeds");

        assert_eq!(merged.role(), UserRole::Admin);
        assert_eq!(gateway.list_call_count(), list_calls, "no collection refetch");
        for (index, row) in store.collection().iter().enumerate() {
            let original = before.get(index).expect("same length");
            if row.id() == &target {
                assert_eq!(row.role(), UserRole::Admin);
                assert_eq!(row.email(), original.email());
            } else {
                assert_eq!(row, original, "untouched rows are value-identical");
            }
        }
    }

    #[tokio::test]
    async fn update_of_a_missing_id_fails_before_the_network() {
        let (mut store, _gateway, notifier) = seeded_store(1).await;
        let ghost = EntityId::random();

        let err = store
            .update(&ghost, &UserPatch::role(UserRole::Admin))
            .await
            .expect_err("update must fail");

        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
        let toast = notifier.seen().pop().expect("exactly one toast");
        assert_eq!(toast.variant, ToastVariant::Destructive);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_silent_for_absent_ids() {
        let (mut store, _gateway, notifier) = seeded_store(2).await;
        let target = store.collection().first().expect("seeded row").id().clone();
        let baseline = notifier.count();

        store.remove(&target).await.expect("first delete succeeds");
        assert_eq!(store.collection().len(), 1);
        assert_eq!(notifier.count(), baseline + 1, "one success toast");

        store.remove(&target).await.expect("second delete is a no-op");
        assert_eq!(store.collection().len(), 1);
        assert_eq!(notifier.count(), baseline + 1, "no-op raises no toast");
    }

    #[tokio::test]
    async fn rows_already_gone_server_side_still_count_as_deleted() {
        let (mut store, gateway, _notifier) = seeded_store(2).await;
        let target = store.collection().first().expect("seeded row").id().clone();
        // Delete server-side behind the store's back, then through it.
        gateway.delete(&target).await.expect("server-side delete");

        store.remove(&target).await.expect("delete treated as done");
        assert_eq!(store.collection().len(), 1);
    }

    #[tokio::test]
    async fn bulk_update_applies_survivors_and_reports_each_failure() {
        let (mut store, gateway, notifier) = seeded_store(3).await;
        let ids: Vec<EntityId> = store.collection().iter().map(|u| u.id().clone()).collect();
        let blocked = ids.get(1).expect("second id").clone();
        gateway.reject_id(blocked.clone());
        let baseline = notifier.count();

        let outcome = store
            .bulk_update(&ids, &UserPatch::role(UserRole::Admin))
            .await;

        assert_eq!(outcome.success_count(), 2);
        assert_eq!(outcome.failure_count(), 1);
        let failure = outcome.failed.first().expect("one failure");
        assert_eq!(failure.id, blocked);
        assert_eq!(failure.error.code(), crate::domain::ErrorCode::Forbidden);

        for row in store.collection() {
            let expected = if row.id() == &blocked {
                UserRole::Member
            } else {
                UserRole::Admin
            };
            assert_eq!(row.role(), expected);
        }
        assert_eq!(notifier.count(), baseline, "store-level bulk raises no toast");
    }

    #[tokio::test]
    async fn bulk_update_reports_locally_missing_ids_as_not_found() {
        let (mut store, _gateway, _notifier) = seeded_store(1).await;
        let known = store.collection().first().expect("row").id().clone();
        let ghost = EntityId::random();

        let outcome = store
            .bulk_update(&[known, ghost.clone()], &UserPatch::status(AccountStatus::Suspended))
            .await;

        assert_eq!(outcome.success_count(), 1);
        let failure = outcome.failed.first().expect("ghost failure");
        assert_eq!(failure.id, ghost);
        assert_eq!(failure.error.code(), crate::domain::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn bulk_remove_counts_absent_ids_as_succeeded() {
        let (mut store, _gateway, _notifier) = seeded_store(2).await;
        let present = store.collection().first().expect("row").id().clone();
        let ghost = EntityId::random();

        let outcome = store.bulk_remove(&[present.clone(), ghost]).await;

        assert_eq!(outcome.success_count(), 2);
        assert!(outcome.is_clean());
        assert!(!store.contains(&present));
        assert_eq!(store.collection().len(), 1);
    }
}
