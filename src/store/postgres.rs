use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    AdvertisementChanges, NewAdvertisement, NewUser, Store, StoreError, StoreResult, UniqueField,
    UserChanges,
};
use crate::{adverts::repo_types::Advertisement, users::repo_types::User};

const USER_COLUMNS: &str = "id, username, email, password_hash, creation_time";
const ADVERTISEMENT_COLUMNS: &str = "id, title, description, creation_date, user_id";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns constraint violations into the store's own error kinds.
fn map_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some(name) if name.contains("email") => UniqueField::Email,
                _ => UniqueField::Username,
            };
            debug!(constraint = ?db.constraint(), "unique violation");
            return StoreError::Conflict(field);
        }
        if db.is_foreign_key_violation() {
            return StoreError::MissingOwner;
        }
    }
    StoreError::Database(e.into())
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_advertisement(&self, new: NewAdvertisement) -> StoreResult<Advertisement> {
        sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            INSERT INTO advertisements (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING {ADVERTISEMENT_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn advertisement_by_id(&self, id: i64) -> StoreResult<Option<Advertisement>> {
        sqlx::query_as::<_, Advertisement>(&format!(
            "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update_advertisement(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> StoreResult<Advertisement> {
        sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            UPDATE advertisements
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING {ADVERTISEMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_advertisement(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
