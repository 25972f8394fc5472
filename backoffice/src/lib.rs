//! Back-office data layer: entity stores, list filtering, and bulk actions.
//!
//! The crate centralises every call to the hosted data gateway behind the
//! ports in [`domain::ports`], keeps per-entity collections reconciled in
//! [`domain::store`], and derives the visible/selected subsets that the
//! admin list screens render. Presentation code receives entities and
//! emits events; it never talks to the gateway directly.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use config::BackofficeSettings;
