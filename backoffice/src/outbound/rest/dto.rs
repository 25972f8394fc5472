//! Row DTOs and table bindings for the REST gateway.
//!
//! DTO fields reuse the domain's validated newtypes, so validation
//! happens while the row decodes. The bindings map each decoded row into
//! its aggregate in one pass.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TableBinding;
use crate::domain::category::Category;
use crate::domain::entity::EntityId;
use crate::domain::post::{BlogPost, PostStatus, Slug, Title};
use crate::domain::user::{AccountStatus, AdminUser, Email, PersonName, UserRole};

#[derive(Debug, Deserialize)]
pub struct UserRowDto {
    id: EntityId,
    email: Email,
    full_name: PersonName,
    role: UserRole,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Binding for the `admin_users` table.
pub struct UserTable;

impl TableBinding for UserTable {
    type Entity = AdminUser;
    type Row = UserRowDto;

    const TABLE: &'static str = "admin_users";

    fn into_domain(row: Self::Row) -> AdminUser {
        AdminUser::new(
            row.id,
            row.email,
            row.full_name,
            row.role,
            row.status,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct PostRowDto {
    id: EntityId,
    title: Title,
    slug: Slug,
    #[serde(default)]
    excerpt: String,
    status: PostStatus,
    #[serde(default)]
    post_categories: Vec<PostCategoryRefDto>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostCategoryRefDto {
    category_id: EntityId,
}

/// Binding for the `posts` table with its category join embedded.
pub struct PostTable;

impl TableBinding for PostTable {
    type Entity = BlogPost;
    type Row = PostRowDto;

    const TABLE: &'static str = "posts";
    const SELECT: &'static str = "*,post_categories(category_id)";

    fn into_domain(row: Self::Row) -> BlogPost {
        let category_ids = row
            .post_categories
            .into_iter()
            .map(|link| link.category_id)
            .collect();
        BlogPost::new(
            row.id,
            row.title,
            row.slug,
            row.excerpt,
            row.status,
            category_ids,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRowDto {
    id: EntityId,
    name: Title,
    slug: Slug,
    #[serde(default)]
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Binding for the `categories` table.
pub struct CategoryTable;

impl TableBinding for CategoryTable {
    type Entity = Category;
    type Row = CategoryRowDto;

    const TABLE: &'static str = "categories";

    fn into_domain(row: Self::Row) -> Category {
        Category::new(
            row.id,
            row.name,
            row.slug,
            row.description,
            row.created_at,
            row.updated_at,
        )
    }
}
