//! Outbound adapters implementing domain ports for the REST gateway.
//!
//! This module follows the hexagonal architecture pattern, providing
//! concrete implementations of the domain port traits:
//!
//! - **rest**: PostgREST-style table gateways, one generic adapter
//!   parameterised by a per-entity table binding
//! - **functions**: HTTP invoker for the gateway's serverless functions
//! - **session**: auth API adapter for the current-user snapshot
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod functions;
pub mod rest;
pub mod session;

pub use functions::HttpFunctionInvoker;
pub use rest::{CategoryTable, PostTable, RestGateway, TableBinding, UserTable};
pub use session::RestSessionGateway;
