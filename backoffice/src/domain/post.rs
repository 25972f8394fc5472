//! Blog post data model for the CMS list screens.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{AdminRecord, EntityId};
use super::filter::{FacetValue, Filterable};
use super::slug::{derive_slug, is_valid_slug};

/// Validation errors returned by the post value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title was empty once trimmed.
    EmptyTitle,
    /// Title exceeded the maximum length.
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Slug was empty or contained disallowed characters.
    InvalidSlug,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::InvalidSlug => write!(
                f,
                "slug may only contain lowercase letters, digits, and hyphens",
            ),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Maximum allowed length for a post or category title.
pub const TITLE_MAX: usize = 160;

/// Validated post/category title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`] from owned input.
    pub fn new(title: impl Into<String>) -> Result<Self, PostValidationError> {
        Self::from_owned(title.into())
    }

    fn from_owned(title: String) -> Result<Self, PostValidationError> {
        if title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a [`Slug`] from owned input.
    pub fn new(slug: impl Into<String>) -> Result<Self, PostValidationError> {
        Self::from_owned(slug.into())
    }

    /// Derive a slug from a title, for the editor's "generate" button.
    pub fn from_title(title: &Title) -> Result<Self, PostValidationError> {
        derive_slug(title.as_ref())
            .map(Self)
            .ok_or(PostValidationError::InvalidSlug)
    }

    fn from_owned(slug: String) -> Result<Self, PostValidationError> {
        if !is_valid_slug(&slug) {
            return Err(PostValidationError::InvalidSlug);
        }
        Ok(Self(slug))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Publication lifecycle state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Visible only in the back office.
    Draft,
    /// Live on the marketing site.
    Published,
    /// Removed from the site but retained.
    Archived,
}

impl PostStatus {
    /// Stable wire/facet representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blog post managed by the CMS screens.
///
/// ## Invariants
/// - `title` is non-blank and bounded; `slug` is valid kebab-case.
/// - `category_ids` holds the many-to-many category memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    id: EntityId,
    title: Title,
    slug: Slug,
    excerpt: String,
    status: PostStatus,
    category_ids: Vec<EntityId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a post. New posts start as drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    /// Headline shown in lists and on the site.
    pub title: Title,
    /// URL slug.
    pub slug: Slug,
    /// Teaser paragraph.
    pub excerpt: String,
    /// Initial category memberships.
    pub category_ids: Vec<EntityId>,
}

/// Partial update for a post; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    /// Replacement headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Replacement slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    /// Replacement teaser paragraph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Replacement lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    /// Replacement category memberships (whole set, not a delta).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<EntityId>>,
}

impl PostPatch {
    /// Patch changing only the lifecycle state.
    #[must_use]
    pub fn status(status: PostStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl BlogPost {
    /// Build a post from validated components.
    #[expect(clippy::too_many_arguments, reason = "plain aggregate constructor")]
    pub fn new(
        id: EntityId,
        title: Title,
        slug: Slug,
        excerpt: String,
        status: PostStatus,
        category_ids: Vec<EntityId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            slug,
            excerpt,
            status,
            category_ids,
            created_at,
            updated_at,
        }
    }

    /// Materialise a draft the way the gateway would on insert.
    pub fn from_draft(id: EntityId, draft: &PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            excerpt: draft.excerpt.clone(),
            status: PostStatus::Draft,
            category_ids: draft.category_ids.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch the way the gateway would, bumping `updated_at`.
    pub fn apply_patch(&self, patch: &PostPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            slug: patch.slug.clone().unwrap_or_else(|| self.slug.clone()),
            excerpt: patch.excerpt.clone().unwrap_or_else(|| self.excerpt.clone()),
            status: patch.status.unwrap_or(self.status),
            category_ids: patch
                .category_ids
                .clone()
                .unwrap_or_else(|| self.category_ids.clone()),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Headline.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// URL slug.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Teaser paragraph.
    pub fn excerpt(&self) -> &str {
        self.excerpt.as_str()
    }

    /// Lifecycle state.
    pub fn status(&self) -> PostStatus {
        self.status
    }

    /// Category memberships.
    pub fn category_ids(&self) -> &[EntityId] {
        &self.category_ids
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

impl AdminRecord for BlogPost {
    type Draft = PostDraft;
    type Patch = PostPatch;

    const KIND: &'static str = "post";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Filterable for BlogPost {
    fn search_haystacks(&self) -> Vec<&str> {
        vec![self.title.as_ref(), self.excerpt.as_str()]
    }

    fn facet(&self, key: &str) -> Option<FacetValue<'_>> {
        match key {
            "status" => Some(FacetValue::Scalar(self.status.as_str())),
            "category" => Some(FacetValue::Set(
                self.category_ids.iter().map(EntityId::as_ref).collect(),
            )),
            _ => None,
        }
    }
}
