//! Presentation contract for entity listings.
//!
//! A rendering layer consumes a [`ListView`] and emits [`ListEvent`]s
//! back to whatever owns the store and listing controller. Building a
//! view borrows the collection and never touches a gateway, so it is
//! cheap to rebuild after every state change.

use super::entity::{AdminRecord, EntityId};
use super::filter::Filterable;
use super::listing::ListingController;
use super::store::LoadState;
use selection::TriState;

/// One visible row and its selection flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a, E> {
    /// The entity backing this row.
    pub entity: &'a E,
    /// Whether the row's checkbox is ticked.
    pub selected: bool,
}

/// Everything a listing surface needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a, E> {
    /// Rows passing the active filter, in collection order.
    pub rows: Vec<Row<'a, E>>,
    /// State of the header checkbox over the visible rows.
    pub header: TriState,
    /// Load state of the backing collection.
    pub state: LoadState,
    /// Whether the data shown may be out of date after a failed reload.
    pub stale: bool,
    /// How many rows are selected across the whole collection, not just
    /// the visible subset.
    pub selected_count: usize,
}

/// Interactions a listing surface reports upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The row's checkbox was toggled.
    ToggleSelect(EntityId),
    /// The header checkbox was toggled.
    ToggleSelectAll,
    /// The row's edit affordance was activated.
    Edit(EntityId),
    /// The row's delete affordance was activated.
    Delete(EntityId),
}

/// Assemble the view for one frame.
pub fn build_list_view<'a, E>(
    collection: &'a [E],
    listing: &ListingController,
    state: LoadState,
    stale: bool,
) -> ListView<'a, E>
where
    E: AdminRecord + Filterable,
{
    let rows = listing
        .visible(collection)
        .into_iter()
        .map(|entity| Row {
            entity,
            selected: listing.is_selected(entity.id()),
        })
        .collect();
    ListView {
        rows,
        header: listing.tri_state(collection),
        state,
        stale,
        selected_count: listing.selected_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::FilterPredicate;
    use crate::domain::user::tests_support::sample_users;

    #[test]
    fn rows_follow_the_active_filter() {
        let users = sample_users(3);
        let mut listing = ListingController::new();
        listing.set_filter(FilterPredicate::all().with_search("user1"));

        let view = build_list_view(&users, &listing, LoadState::Ready, false);

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.header, TriState::Unselected);
    }

    #[test]
    fn selection_flags_and_header_reflect_the_controller() {
        let users = sample_users(2);
        let mut listing = ListingController::new();
        let first = users.first().expect("seeded user").id().clone();
        listing.toggle_select(first.clone());

        let view = build_list_view(&users, &listing, LoadState::Ready, true);

        assert!(view.stale);
        assert_eq!(view.selected_count, 1);
        assert_eq!(view.header, TriState::Partial);
        let row = view
            .rows
            .iter()
            .find(|row| row.entity.id() == &first)
            .expect("selected row visible");
        assert!(row.selected);
        assert!(view.rows.iter().filter(|row| !row.selected).count() == 1);
    }
}
