//! Selection and filter state for one list screen.
//!
//! The controller owns UI-local state only: which ids are checked and
//! which predicate is active. It derives everything else — the visible
//! subset and the header tri-state — from the collection it is handed,
//! and it never talks to the gateway.

use std::collections::BTreeSet;

use selection::{SelectionSet, TriState};

use super::entity::{AdminRecord, EntityId};
use super::filter::{FilterPredicate, Filterable, visible_subset};

/// Selection and filter controller for a list screen.
#[derive(Debug, Clone, Default)]
pub struct ListingController {
    selection: SelectionSet<EntityId>,
    filter: FilterPredicate,
}

impl ListingController {
    /// Create a controller with no selection and an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active filter predicate. The selection is untouched;
    /// bulk actions still apply to rows selected before the narrowing.
    pub fn set_filter(&mut self, filter: FilterPredicate) {
        self.filter = filter;
    }

    /// The active filter predicate.
    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    /// Flip the selection state of `id`.
    pub fn toggle_select(&mut self, id: EntityId) {
        self.selection.toggle(id);
    }

    /// `true` when `id` is currently selected.
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selection.contains(id)
    }

    /// Select exactly the rows visible under the active filter.
    ///
    /// Deliberately not the full collection: bulk actions apply to what
    /// the user can see.
    pub fn select_all_visible<E>(&mut self, collection: &[E])
    where
        E: AdminRecord + Filterable,
    {
        let visible_ids = visible_subset(collection, &self.filter)
            .into_iter()
            .map(|entity| entity.id().clone());
        self.selection.replace_with(visible_ids);
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove `ids` from the selection (e.g. ids that succeeded in a
    /// bulk action, leaving failed ids selected for retry).
    pub fn deselect(&mut self, ids: &[EntityId]) {
        for id in ids {
            self.selection.remove(id);
        }
    }

    /// Selected ids in stable order.
    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.selection.to_vec()
    }

    /// Number of selected ids.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Drop selected ids that are no longer in `collection`.
    ///
    /// Call after any collection change; deletes must never leave
    /// dangling selections behind.
    pub fn sync_with<E: AdminRecord>(&mut self, collection: &[E]) {
        let known: BTreeSet<EntityId> = collection
            .iter()
            .map(|entity| entity.id().clone())
            .collect();
        self.selection.retain(&known);
    }

    /// The visible subset of `collection` under the active filter, in
    /// collection order.
    pub fn visible<'a, E: Filterable>(&self, collection: &'a [E]) -> Vec<&'a E> {
        visible_subset(collection, &self.filter)
    }

    /// Header checkbox state over the currently visible rows.
    pub fn tri_state<E>(&self, collection: &[E]) -> TriState
    where
        E: AdminRecord + Filterable,
    {
        let visible_ids: Vec<EntityId> = self
            .visible(collection)
            .into_iter()
            .map(|entity| entity.id().clone())
            .collect();
        self.selection.tri_state(visible_ids.iter())
    }
}
