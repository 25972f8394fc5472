//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Presentation code never imports these; only stores and services do.
//! Each port ships a deterministic fixture or recording double beside
//! the trait so the reconciliation logic is testable without adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod functions;
mod gateway;
mod notifier;
mod session;

pub use functions::{FunctionError, FunctionInvoker};
pub use gateway::{DraftMaterialiser, EntityGateway, FixtureGateway, GatewayError, PatchMerger};
pub use notifier::{Notification, Notifier, NullNotifier, RecordingNotifier, ToastVariant};
pub use session::{FixtureSessionGateway, SessionError, SessionGateway};

#[cfg(test)]
pub use functions::MockFunctionInvoker;
#[cfg(test)]
pub use session::MockSessionGateway;
