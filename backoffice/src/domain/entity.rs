//! Core record identity shared by every managed entity type.
//!
//! Identifiers are assigned by the data gateway and treated as opaque
//! strings locally. The gateway remains the source of truth; nothing in
//! this crate mints production identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`EntityId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityIdError {
    /// The identifier was empty once trimmed.
    Empty,
    /// The identifier carried surrounding whitespace.
    Untrimmed,
}

impl fmt::Display for EntityIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "entity id must not be empty"),
            Self::Untrimmed => write!(f, "entity id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for EntityIdError {}

/// Opaque, gateway-assigned record identifier.
///
/// ## Invariants
/// - Non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Validate and construct an [`EntityId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EntityIdError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a random identifier for fixtures and tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, EntityIdError> {
        if id.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if id.trim() != id {
            return Err(EntityIdError::Untrimmed);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A record type managed by an entity store.
///
/// Each implementor names its wire table via the gateway bindings and
/// supplies a draft shape (fields for inserts) and a patch shape
/// (all-optional partial update). The gateway assigns ids and
/// timestamps; the merged row it returns replaces the local copy.
pub trait AdminRecord: Clone + Send + Sync + 'static {
    /// Fields supplied when creating a record. Serialised as the insert
    /// payload.
    type Draft: serde::Serialize + Send + Sync + 'static;
    /// Partial field set for updates. Serialised as the patch payload.
    type Patch: serde::Serialize + Clone + Send + Sync + 'static;

    /// Human-readable singular label used in notifications and traces.
    const KIND: &'static str;

    /// Stable gateway-assigned identifier.
    fn id(&self) -> &EntityId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_untrimmed_ids() {
        assert_eq!(EntityId::new(""), Err(EntityIdError::Empty));
        assert_eq!(EntityId::new(" abc "), Err(EntityIdError::Untrimmed));
    }

    #[test]
    fn random_ids_are_unique_and_valid() {
        let a = EntityId::random();
        let b = EntityId::random();
        assert_ne!(a, b);
        assert!(EntityId::new(a.as_ref()).is_ok());
    }

    #[test]
    fn serde_round_trips_as_a_plain_string() {
        let id = EntityId::new("post-42").expect("valid id");
        let json = serde_json::to_string(&id).expect("id serialises");
        assert_eq!(json, "\"post-42\"");
        let decoded: EntityId = serde_json::from_str(&json).expect("id deserialises");
        assert_eq!(decoded, id);
    }
}
