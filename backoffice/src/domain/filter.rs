//! Filter predicates narrowing a collection to its visible subset.
//!
//! A predicate combines a free-text search term with zero or more
//! categorical facet constraints. Applying a predicate is pure: the same
//! collection and predicate always yield the same visible subset, and
//! re-applying a predicate to its own output is a fixed point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A facet value exposed by an entity for categorical filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetValue<'a> {
    /// Single-valued facet (e.g. a role or status). Matches by equality.
    Scalar(&'a str),
    /// Many-to-many facet (e.g. category membership). Matches by
    /// containment.
    Set(Vec<&'a str>),
}

impl FacetValue<'_> {
    fn matches(&self, wanted: &str) -> bool {
        match self {
            Self::Scalar(value) => *value == wanted,
            Self::Set(values) => values.iter().any(|value| *value == wanted),
        }
    }
}

/// An entity that list screens can search and facet over.
pub trait Filterable {
    /// Text fields the free-text search term is matched against.
    fn search_haystacks(&self) -> Vec<&str>;

    /// Facet value for `key`, or `None` when the entity does not expose
    /// that facet. A constraint on an unexposed facet never matches.
    fn facet(&self, key: &str) -> Option<FacetValue<'_>>;
}

/// Active search term and facet constraints for one list screen.
///
/// An empty predicate matches everything. Facet keys absent from the
/// map are unconstrained (the UI's "all" option clears the entry rather
/// than storing a sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterPredicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    facets: BTreeMap<String, String>,
}

impl FilterPredicate {
    /// Predicate matching every entity.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the free-text search term; blank input clears it.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    /// Constrain facet `key` to `value`.
    #[must_use]
    pub fn with_facet(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.facets.insert(key.into(), value.into());
        self
    }

    /// Remove the constraint on facet `key` (the UI's "all" option).
    #[must_use]
    pub fn without_facet(mut self, key: &str) -> Self {
        self.facets.remove(key);
        self
    }

    /// `true` when no search term and no facet constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_none() && self.facets.is_empty()
    }

    /// Decide whether `entity` belongs to the visible subset.
    pub fn matches<E: Filterable>(&self, entity: &E) -> bool {
        self.matches_search(entity) && self.matches_facets(entity)
    }

    fn matches_search<E: Filterable>(&self, entity: &E) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();
        entity
            .search_haystacks()
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    fn matches_facets<E: Filterable>(&self, entity: &E) -> bool {
        self.facets.iter().all(|(key, wanted)| {
            entity
                .facet(key)
                .is_some_and(|value| value.matches(wanted))
        })
    }
}

/// Derive the visible subset of `collection` under `predicate`.
///
/// The result preserves collection order and borrows from it; nothing is
/// stored independently.
pub fn visible_subset<'a, E: Filterable>(
    collection: &'a [E],
    predicate: &FilterPredicate,
) -> Vec<&'a E> {
    collection
        .iter()
        .filter(|entity| predicate.matches(*entity))
        .collect()
}

#[cfg(test)]
mod tests {
    //! Purity and matching semantics for filter predicates.

    use super::*;
    use rstest::rstest;

    struct Sample {
        name: &'static str,
        role: &'static str,
        tags: Vec<&'static str>,
    }

    impl Filterable for Sample {
        fn search_haystacks(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn facet(&self, key: &str) -> Option<FacetValue<'_>> {
            match key {
                "role" => Some(FacetValue::Scalar(self.role)),
                "tag" => Some(FacetValue::Set(self.tags.clone())),
                _ => None,
            }
        }
    }

    fn collection() -> Vec<Sample> {
        vec![
            Sample {
                name: "Ada Lovelace",
                role: "admin",
                tags: vec!["founding"],
            },
            Sample {
                name: "Grace Hopper",
                role: "editor",
                tags: vec!["compilers", "navy"],
            },
            Sample {
                name: "Radia Perlman",
                role: "editor",
                tags: vec![],
            },
        ]
    }

    #[rstest]
    #[case::case_insensitive_substring("ada", &["Ada Lovelace"])]
    #[case::matches_anywhere("PER", &["Radia Perlman"])]
    #[case::no_match("zeppelin", &[])]
    fn search_matches_case_insensitive_substrings(
        #[case] term: &str,
        #[case] expected: &[&str],
    ) {
        let rows = collection();
        let predicate = FilterPredicate::all().with_search(term);
        let names: Vec<&str> = visible_subset(&rows, &predicate)
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn scalar_facets_match_by_equality_and_sets_by_containment() {
        let rows = collection();

        let editors = FilterPredicate::all().with_facet("role", "editor");
        assert_eq!(visible_subset(&rows, &editors).len(), 2);

        let navy = FilterPredicate::all().with_facet("tag", "navy");
        let names: Vec<&str> = visible_subset(&rows, &navy)
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, vec!["Grace Hopper"]);
    }

    #[test]
    fn unknown_facet_keys_never_match() {
        let rows = collection();
        let predicate = FilterPredicate::all().with_facet("department", "ops");
        assert!(visible_subset(&rows, &predicate).is_empty());
    }

    #[test]
    fn constraints_combine_conjunctively() {
        let rows = collection();
        let predicate = FilterPredicate::all()
            .with_search("grace")
            .with_facet("role", "editor");
        assert_eq!(visible_subset(&rows, &predicate).len(), 1);

        let contradictory = FilterPredicate::all()
            .with_search("grace")
            .with_facet("role", "admin");
        assert!(visible_subset(&rows, &contradictory).is_empty());
    }

    #[test]
    fn blank_search_terms_and_cleared_facets_are_unconstrained() {
        let predicate = FilterPredicate::all()
            .with_search("   ")
            .with_facet("role", "admin")
            .without_facet("role");
        assert!(predicate.is_unconstrained());
        assert_eq!(visible_subset(&collection(), &predicate).len(), 3);
    }

    #[test]
    fn reapplying_a_predicate_to_its_output_is_a_fixed_point() {
        let rows = collection();
        let predicate = FilterPredicate::all().with_facet("role", "editor");

        let first: Vec<Sample> = rows
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        let second = visible_subset(&first, &predicate);
        assert_eq!(second.len(), first.len());
    }
}
