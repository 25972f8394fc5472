//! PostgREST-style table gateway.
//!
//! One generic reqwest adapter implements `EntityGateway` for every
//! entity; the per-entity differences (table name, select clause, row
//! shape) live in a [`TableBinding`] implemented beside the row DTOs.

use serde::de::DeserializeOwned;

use crate::domain::entity::AdminRecord;

mod client;
mod dto;

pub use client::RestGateway;
pub use dto::{CategoryTable, PostTable, UserTable};

/// Per-entity binding between a REST table and its domain aggregate.
///
/// Row validation happens during deserialisation: DTO fields use the
/// domain's validated newtypes, so a row that fails validation fails to
/// decode and surfaces as a decode error rather than a half-valid
/// aggregate.
pub trait TableBinding: Send + Sync + 'static {
    /// Domain aggregate this table stores.
    type Entity: AdminRecord;
    /// Wire shape of one row.
    type Row: DeserializeOwned + Send;

    /// Table name under `/rest/v1/`.
    const TABLE: &'static str;
    /// Select clause; bindings with embedded resources override this.
    const SELECT: &'static str = "*";

    /// Assemble the domain aggregate from a decoded row.
    fn into_domain(row: Self::Row) -> Self::Entity;
}
