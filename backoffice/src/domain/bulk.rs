//! Bulk actions applied to the current selection.
//!
//! The executor is the only caller of the store's bulk operations. It
//! owns the consolidated user feedback (one toast per bulk action, never
//! one per row) and the retry affordance: ids that failed stay selected.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::entity::AdminRecord;
use super::error::DomainError;
use super::listing::ListingController;
use super::ports::{EntityGateway, Notification, Notifier};
use super::store::{BulkFailure, EntityStore};

/// A mutation applied to every selected id.
#[derive(Clone)]
pub enum BulkAction<E: AdminRecord> {
    /// Patch every selected row with the same partial update
    /// (role change, status change, recategorisation).
    Update(E::Patch),
    /// Delete every selected row.
    Delete,
}

/// Consolidated outcome of a bulk action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    /// Ids applied successfully.
    pub success_count: usize,
    /// Ids that failed.
    pub failure_count: usize,
    /// Per-id failure detail, for inspection or retry.
    pub errors: Vec<BulkFailure>,
}

impl BulkReport {
    /// `true` when every id succeeded.
    pub fn is_clean(&self) -> bool {
        self.failure_count == 0
    }
}

/// Applies one action to every id in the selection.
pub struct BulkActionExecutor {
    notifier: Arc<dyn Notifier>,
}

impl BulkActionExecutor {
    /// Create an executor raising consolidated toasts on `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Apply `action` to every selected id.
    ///
    /// Each id is treated independently; the report is not produced
    /// until every per-id call has settled. Succeeded ids are
    /// deselected; failed ids stay selected so the user can retry or
    /// inspect them. An empty selection is a no-op.
    pub async fn execute<E, G>(
        &self,
        store: &mut EntityStore<E, G>,
        listing: &mut ListingController,
        action: BulkAction<E>,
    ) -> BulkReport
    where
        E: AdminRecord,
        G: EntityGateway<E>,
    {
        let ids = listing.selected_ids();
        if ids.is_empty() {
            return BulkReport::default();
        }

        let outcome = match action {
            BulkAction::Update(patch) => store.bulk_update(&ids, &patch).await,
            BulkAction::Delete => store.bulk_remove(&ids).await,
        };

        listing.deselect(&outcome.succeeded);
        // Deletions also shrink the collection; drop any selection the
        // collection no longer backs.
        listing.sync_with(store.collection());

        let report = BulkReport {
            success_count: outcome.success_count(),
            failure_count: outcome.failure_count(),
            errors: outcome.failed,
        };

        debug!(
            kind = E::KIND,
            succeeded = report.success_count,
            failed = report.failure_count,
            "bulk action settled"
        );
        self.notifier.notify(Self::consolidated_toast::<E>(&report, ids.len()));
        report
    }

    /// Serialise the selected entities as a pretty JSON document.
    ///
    /// Export is local: it reads the cached collection and never touches
    /// the gateway. Rows appear in collection order.
    pub fn export_selected<E, G>(
        &self,
        store: &EntityStore<E, G>,
        listing: &ListingController,
    ) -> Result<String, DomainError>
    where
        E: AdminRecord + Serialize,
        G: EntityGateway<E>,
    {
        let rows: Vec<&E> = store
            .collection()
            .iter()
            .filter(|entity| listing.is_selected(entity.id()))
            .collect();
        serde_json::to_string_pretty(&rows)
            .map_err(|err| DomainError::internal(format!("export serialisation failed: {err}")))
    }

    fn consolidated_toast<E: AdminRecord>(report: &BulkReport, requested: usize) -> Notification {
        if report.is_clean() {
            Notification::success(
                "Bulk action complete",
                format!("Applied to {requested} {}(s).", E::KIND),
            )
        } else {
            Notification::destructive(
                "Bulk action partially failed",
                format!(
                    "Applied to {} of {requested} {}(s); {} failed and remain selected.",
                    report.success_count,
                    E::KIND,
                    report.failure_count
                ),
            )
        }
    }
}
