use std::sync::LazyLock;

use chrono::Utc;
use db::models::user::{self, ActiveModel, Column, Entity, Model};
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, Set,
};
use serde::Serialize;
use validator::Validate;

use crate::error::ServiceError;

pub use db::models::user::Model as User;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 50;
/// Highest page whose row offset still fits the database's signed 64-bit OFFSET.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

const REQUIRED_MESSAGE: &str = "Name and email are required";
const DUPLICATE_EMAIL: &str = "Email already exists";

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Normalized create/update payload: trimmed name, lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, message = "Name and email are required"))]
    pub name: String,

    #[validate(regex(path = *EMAIL_SHAPE, message = "Invalid email format"))]
    pub email: String,
}

impl UserInput {
    /// Normalizes raw request fields and validates them.
    ///
    /// The email shape is checked on the value as sent, so surrounding
    /// whitespace makes it malformed.
    pub fn parse(name: Option<&str>, email: Option<&str>) -> Result<Self, ServiceError> {
        let name = name.map(str::trim).unwrap_or_default();
        let email = email.unwrap_or_default();

        if name.is_empty() || email.trim().is_empty() {
            return Err(ServiceError::Validation(REQUIRED_MESSAGE.into()));
        }

        let input = Self {
            name: name.to_string(),
            email: email.to_lowercase(),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Page/limit pair after defaults and the page-size cap are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Missing or non-positive values fall back to page 1 / [`DEFAULT_PAGE_SIZE`];
    /// the limit is capped at [`MAX_PAGE_SIZE`] and the page at [`MAX_PAGE`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .map(|p| (p as u64).min(MAX_PAGE))
            .unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .map(|l| (l as u64).min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, limit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

/// What a delete reports back about the removed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest-first page of users plus the pagination block.
    pub async fn list(&self, request: PageRequest) -> Result<UserPage, ServiceError> {
        let paginator = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, request.limit);

        let total = paginator.num_items().await?;
        let pagination = Pagination::new(request, total);

        // Pages past the end are empty; skip the query.
        let users = if request.page > pagination.total_pages {
            Vec::new()
        } else {
            paginator.fetch_page(request.page - 1).await?
        };

        Ok(UserPage { users, pagination })
    }

    pub async fn find(&self, id: i64) -> Result<User, ServiceError> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))
    }

    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let now = Utc::now();
        let active = ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = active
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE_EMAIL))?;

        tracing::info!(id = user.id, email = %user.email, "New user created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, input: UserInput) -> Result<User, ServiceError> {
        let mut active: user::ActiveModel = self.find(id).await?.into_active_model();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.updated_at = Set(Utc::now());

        let user: Model = active
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE_EMAIL))?;

        tracing::info!(id = user.id, email = %user.email, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<DeletedUser, ServiceError> {
        let user = self.find(id).await?;
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("User not found".into()));
        }

        tracing::info!(id = user.id, email = %user.email, "User deleted");
        Ok(DeletedUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }
}
