//! Blog category data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{AdminRecord, EntityId};
use super::filter::{FacetValue, Filterable};
use super::post::{Slug, Title};

/// Blog category grouping posts on the marketing site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: EntityId,
    name: Title,
    slug: Slug,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    /// Display name.
    pub name: Title,
    /// URL slug.
    pub slug: Slug,
    /// Short description shown on listing pages.
    pub description: String,
}

/// Partial update for a category; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Title>,
    /// Replacement slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    /// Replacement description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Build a category from validated components.
    pub fn new(
        id: EntityId,
        name: Title,
        slug: Slug,
        description: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            description,
            created_at,
            updated_at,
        }
    }

    /// Materialise a draft the way the gateway would on insert.
    pub fn from_draft(id: EntityId, draft: &CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch the way the gateway would, bumping `updated_at`.
    pub fn apply_patch(&self, patch: &CategoryPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            slug: patch.slug.clone().unwrap_or_else(|| self.slug.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Display name.
    pub fn name(&self) -> &Title {
        &self.name
    }

    /// URL slug.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Short description.
    pub fn description(&self) -> &str {
        self.description.as_str()
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

impl AdminRecord for Category {
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const KIND: &'static str = "category";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Filterable for Category {
    fn search_haystacks(&self) -> Vec<&str> {
        vec![self.name.as_ref(), self.description.as_str()]
    }

    fn facet(&self, _key: &str) -> Option<FacetValue<'_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_uses_gateway_timestamps() {
        let name = Title::new("Branding").expect("valid name");
        let slug = Slug::from_title(&name).expect("derivable slug");
        let draft = CategoryDraft {
            name,
            slug,
            description: "Identity work".to_owned(),
        };
        let now = Utc::now();

        let category = Category::from_draft(EntityId::new("c1").expect("valid id"), &draft, now);
        assert_eq!(category.created_at(), now);
        assert_eq!(category.updated_at(), now);
        assert_eq!(category.slug().as_ref(), "branding");
    }

    #[test]
    fn categories_search_over_name_and_description() {
        let name = Title::new("Branding").expect("valid name");
        let slug = Slug::from_title(&name).expect("derivable slug");
        let now = Utc::now();
        let category = Category::new(
            EntityId::new("c1").expect("valid id"),
            name,
            slug,
            "Identity work".to_owned(),
            now,
            now,
        );

        assert_eq!(category.search_haystacks(), vec!["Branding", "Identity work"]);
        assert_eq!(category.facet("anything"), None);
    }
}
