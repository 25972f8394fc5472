//! Admin user data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entity::{AdminRecord, EntityId};
use super::filter::{FacetValue, Filterable};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email address was empty once trimmed.
    EmptyEmail,
    /// Email address did not match the accepted shape.
    InvalidEmail,
    /// Full name was empty once trimmed.
    EmptyName,
    /// Full name exceeded the maximum length.
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@host"),
            Self::EmptyName => write!(f, "full name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose: the gateway's auth service owns real
        // deliverability checks. This only rejects obviously broken input
        // before a round trip.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a person's full name.
pub const PERSON_NAME_MAX: usize = 80;

/// Validated human-readable full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role claim controlling back-office permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access including user management.
    Admin,
    /// Content management access.
    Editor,
    /// Read-only dashboard access.
    Member,
}

impl UserRole {
    /// Stable wire/facet representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account may sign in.
    Active,
    /// Sign-in blocked by an administrator.
    Suspended,
}

impl AccountStatus {
    /// Stable wire/facet representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Back-office user account.
///
/// ## Invariants
/// - `email` matches the accepted address shape.
/// - `full_name` is non-blank and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    id: EntityId,
    email: Email,
    full_name: PersonName,
    role: UserRole,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields supplied when inviting a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    /// Sign-in email address.
    pub email: Email,
    /// Display name.
    pub full_name: PersonName,
    /// Initial role claim.
    pub role: UserRole,
}

/// Partial update for a user record; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<PersonName>,
    /// Replacement role claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Replacement account status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

impl UserPatch {
    /// Patch changing only the role.
    #[must_use]
    pub fn role(role: UserRole) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    /// Patch changing only the account status.
    #[must_use]
    pub fn status(status: AccountStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl AdminUser {
    /// Build a user from validated components.
    #[expect(clippy::too_many_arguments, reason = "plain aggregate constructor")]
    pub fn new(
        id: EntityId,
        email: Email,
        full_name: PersonName,
        role: UserRole,
        status: AccountStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            role,
            status,
            created_at,
            updated_at,
        }
    }

    /// Materialise a draft the way the gateway would on insert.
    ///
    /// Production rows come back from the gateway; this exists for test
    /// doubles standing in for it.
    pub fn from_draft(id: EntityId, draft: &UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email.clone(),
            full_name: draft.full_name.clone(),
            role: draft.role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch the way the gateway would, bumping `updated_at`.
    pub fn apply_patch(&self, patch: &UserPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: patch.full_name.clone().unwrap_or_else(|| self.full_name.clone()),
            role: patch.role.unwrap_or(self.role),
            status: patch.status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Sign-in email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub fn full_name(&self) -> &PersonName {
        &self.full_name
    }

    /// Role claim.
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Account status.
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Creation timestamp assigned by the gateway.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-update timestamp assigned by the gateway.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AdminRecord for AdminUser {
    type Draft = UserDraft;
    type Patch = UserPatch;

    const KIND: &'static str = "user";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Filterable for AdminUser {
    fn search_haystacks(&self) -> Vec<&str> {
        vec![self.email.as_ref(), self.full_name.as_ref()]
    }

    fn facet(&self, key: &str) -> Option<FacetValue<'_>> {
        match key {
            "role" => Some(FacetValue::Scalar(self.role.as_str())),
            "status" => Some(FacetValue::Scalar(self.status.as_str())),
            _ => None,
        }
    }
}
