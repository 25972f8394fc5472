//! Derived collection counts for dashboard surfaces.
//!
//! Counts are always recomputed from the cached collection, never
//! fetched or stored separately, so they cannot drift from the rows the
//! user is looking at.

use std::collections::BTreeMap;

use super::filter::{FacetValue, Filterable};

/// Totals for one collection, broken down by one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Number of rows in the collection.
    pub total: usize,
    /// Rows per facet value, sorted by value.
    pub by_facet: BTreeMap<String, usize>,
}

/// Count rows per value of `facet_key`.
///
/// Set-valued facets contribute one count per member, so a post in two
/// categories is counted under both. Rows where the entity does not
/// expose the facet contribute to `total` only.
pub fn summarise<E: Filterable>(collection: &[E], facet_key: &str) -> CollectionSummary {
    let mut by_facet = BTreeMap::new();
    for entity in collection {
        match entity.facet(facet_key) {
            Some(FacetValue::Scalar(value)) => {
                *by_facet.entry(value.to_owned()).or_insert(0) += 1;
            }
            Some(FacetValue::Set(values)) => {
                for value in values {
                    *by_facet.entry(value.to_owned()).or_insert(0) += 1;
                }
            }
            None => {}
        }
    }
    CollectionSummary {
        total: collection.len(),
        by_facet,
    }
}
