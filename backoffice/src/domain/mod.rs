//! Domain types and client-side state machinery.
//!
//! Purpose: Define the validated aggregates the admin screens manage and
//! the stateful components that reconcile them against the gateway: the
//! entity store, the listing controller, and the bulk action executor.
//! Keep aggregates immutable and document invariants and serialisation
//! contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - DomainError / ErrorCode — failure payload every operation resolves to.
//! - EntityId, AdminRecord — identity and the per-entity contract.
//! - AdminUser, BlogPost, Category and their draft/patch structs.
//! - EntityStore, ListingController, BulkActionExecutor — state machinery.
//! - AuthState, ContactService — session snapshot and contact intake.

pub mod auth;
pub mod bulk;
pub mod category;
pub mod contact;
pub mod entity;
pub mod error;
pub mod filter;
pub mod listing;
pub mod ports;
pub mod post;
pub mod slug;
pub mod store;
pub mod summary;
pub mod user;
pub mod view;

pub use self::auth::{AuthSnapshot, AuthState, SessionUser};
pub use self::bulk::{BulkAction, BulkActionExecutor, BulkReport};
pub use self::category::{Category, CategoryDraft, CategoryPatch};
pub use self::contact::{ContactForm, ContactRequest, ContactService, ContactValidationError};
pub use self::entity::{AdminRecord, EntityId, EntityIdError};
pub use self::error::{DomainError, ErrorCode};
pub use self::filter::{FilterPredicate, Filterable, visible_subset};
pub use self::listing::ListingController;
pub use self::post::{BlogPost, PostDraft, PostPatch, PostStatus, PostValidationError, Slug, Title};
pub use self::store::{BulkFailure, BulkOutcome, EntityStore, LoadState};
pub use self::summary::{CollectionSummary, summarise};
pub use self::user::{
    AccountStatus, AdminUser, Email, PersonName, UserDraft, UserPatch, UserRole,
    UserValidationError,
};
pub use self::view::{ListEvent, ListView, Row, build_list_view};

/// Convenient result alias for store and service operations.
pub type DomainResult<T> = Result<T, DomainError>;
