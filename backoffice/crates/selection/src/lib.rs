//! Selection-set primitives for list screens with bulk actions.
//!
//! A [`SelectionSet`] tracks which row identifiers are currently checked.
//! It is deliberately dependency-light and pure: it never talks to a
//! backend, and every operation is deterministic so list controllers can
//! be tested without fixtures. The companion [`TriState`] models the
//! header checkbox of a list view (none / some / all visible rows
//! selected).
//!
//! Identifiers are generic; the only requirement is a total order so the
//! set iterates deterministically.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Header checkbox state for a list of visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    /// No visible row is selected.
    Unselected,
    /// Some, but not all, visible rows are selected.
    Partial,
    /// Every visible row is selected (and at least one row is visible).
    All,
}

/// Set of selected row identifiers.
///
/// ## Invariants
/// - Membership is a plain set: toggling twice restores the original state.
/// - Callers keep the set a subset of their collection by invoking
///   [`SelectionSet::retain`] whenever rows disappear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet<I: Ord> {
    ids: BTreeSet<I>,
}

impl<I: Ord + Clone> Default for SelectionSet<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Ord + Clone> SelectionSet<I> {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Number of selected identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `true` when `id` is currently selected.
    #[must_use]
    pub fn contains(&self, id: &I) -> bool {
        self.ids.contains(id)
    }

    /// Flip the selection state of `id`, returning the new state.
    pub fn toggle(&mut self, id: I) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Select `id`, returning `true` when it was newly selected.
    pub fn insert(&mut self, id: I) -> bool {
        self.ids.insert(id)
    }

    /// Deselect `id`, returning `true` when it was selected.
    pub fn remove(&mut self, id: &I) -> bool {
        self.ids.remove(id)
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with exactly the given identifiers.
    ///
    /// Used by "select all" so the selection matches the visible subset
    /// rather than growing across filter changes.
    pub fn replace_with(&mut self, ids: impl IntoIterator<Item = I>) {
        self.ids = ids.into_iter().collect();
    }

    /// Drop every selected identifier absent from `known`.
    ///
    /// Keeps the selection a subset of the live collection after rows are
    /// deleted or a reload shrinks the list.
    pub fn retain(&mut self, known: &BTreeSet<I>) {
        self.ids.retain(|id| known.contains(id));
    }

    /// Iterate the selected identifiers in sorted order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.ids.iter()
    }

    /// Collect the selected identifiers in sorted order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<I> {
        self.ids.iter().cloned().collect()
    }

    /// Header checkbox state for the given visible identifiers.
    ///
    /// An empty visible list is [`TriState::Unselected`]: there is nothing
    /// for the header checkbox to act on.
    #[must_use]
    pub fn tri_state<'a>(&self, visible: impl IntoIterator<Item = &'a I>) -> TriState
    where
        I: 'a,
    {
        let mut total = 0_usize;
        let mut selected = 0_usize;
        for id in visible {
            total += 1;
            if self.ids.contains(id) {
                selected += 1;
            }
        }

        if total == 0 || selected == 0 {
            TriState::Unselected
        } else if selected == total {
            TriState::All
        } else {
            TriState::Partial
        }
    }
}
