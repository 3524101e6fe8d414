//! Persistence for users and advertisements.
//!
//! Handlers only see [`Store`]; the running service uses [`PgStore`] and the
//! tests use [`MemoryStore`]. Each call is its own unit of work: it takes
//! what it needs from the pool and gives it back before returning.

use std::fmt;

use async_trait::async_trait;

use crate::{adverts::repo_types::Advertisement, users::repo_types::User};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0} already taken")]
    Conflict(UniqueField),
    #[error("owner does not exist")]
    MissingOwner,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial user update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AdvertisementChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Applies every supplied change in one write.
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    /// Also removes the user's advertisements.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;

    async fn insert_advertisement(&self, new: NewAdvertisement) -> StoreResult<Advertisement>;
    async fn advertisement_by_id(&self, id: i64) -> StoreResult<Option<Advertisement>>;
    /// Applies every supplied change in one write.
    async fn update_advertisement(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> StoreResult<Advertisement>;
    async fn delete_advertisement(&self, id: i64) -> StoreResult<()>;
}
