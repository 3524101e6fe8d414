use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{
    AdvertisementChanges, NewAdvertisement, NewUser, Store, StoreError, StoreResult, UniqueField,
    UserChanges,
};
use crate::{adverts::repo_types::Advertisement, users::repo_types::User};

/// Process-local store with the same constraints as the SQL schema:
/// unique username and email, owner must exist, deleting a user deletes
/// their advertisements.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    advertisements: BTreeMap<i64, Advertisement>,
    last_user_id: i64,
    last_advertisement_id: i64,
}

impl Tables {
    fn check_unique(
        &self,
        id: Option<i64>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != id) {
            if username == Some(user.username.as_str()) {
                return Err(StoreError::Conflict(UniqueField::Username));
            }
            if email == Some(user.email.as_str()) {
                return Err(StoreError::Conflict(UniqueField::Email));
            }
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tables = self.inner.lock().await;
        tables.check_unique(None, Some(new.username.as_str()), Some(new.email.as_str()))?;
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            creation_time: OffsetDateTime::now_utc(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.inner.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut tables = self.inner.lock().await;
        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        tables.check_unique(Some(id), changes.username.as_deref(), changes.email.as_deref())?;
        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.inner.lock().await;
        tables.users.remove(&id).ok_or(StoreError::NotFound)?;
        tables.advertisements.retain(|_, adv| adv.user_id != id);
        Ok(())
    }

    async fn insert_advertisement(&self, new: NewAdvertisement) -> StoreResult<Advertisement> {
        let mut tables = self.inner.lock().await;
        if !tables.users.contains_key(&new.user_id) {
            return Err(StoreError::MissingOwner);
        }
        tables.last_advertisement_id += 1;
        let adv = Advertisement {
            id: tables.last_advertisement_id,
            title: new.title,
            description: new.description,
            creation_date: OffsetDateTime::now_utc(),
            user_id: new.user_id,
        };
        tables.advertisements.insert(adv.id, adv.clone());
        Ok(adv)
    }

    async fn advertisement_by_id(&self, id: i64) -> StoreResult<Option<Advertisement>> {
        Ok(self.inner.lock().await.advertisements.get(&id).cloned())
    }

    async fn update_advertisement(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> StoreResult<Advertisement> {
        let mut tables = self.inner.lock().await;
        let adv = tables
            .advertisements
            .get_mut(&id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = changes.title {
            adv.title = title;
        }
        if let Some(description) = changes.description {
            adv.description = description;
        }
        Ok(adv.clone())
    }

    async fn delete_advertisement(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.inner.lock().await;
        tables
            .advertisements
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn enforces_unique_username_and_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("ann", "ann@x.io")).await.unwrap();

        let err = store.insert_user(new_user("ann", "other@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Username)));
        let err = store.insert_user(new_user("bob", "ann@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Email)));
    }

    #[tokio::test]
    async fn update_may_keep_own_values() {
        let store = MemoryStore::new();
        let ann = store.insert_user(new_user("ann", "ann@x.io")).await.unwrap();
        store.insert_user(new_user("bob", "bob@x.io")).await.unwrap();

        let changes = UserChanges {
            username: Some("ann".into()),
            ..Default::default()
        };
        assert!(store.update_user(ann.id, changes).await.is_ok());

        let changes = UserChanges {
            email: Some("bob@x.io".into()),
            ..Default::default()
        };
        let err = store.update_user(ann.id, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Email)));
    }

    #[tokio::test]
    async fn advertisement_needs_an_existing_owner() {
        let store = MemoryStore::new();
        let err = store
            .insert_advertisement(NewAdvertisement {
                title: "t".into(),
                description: "d".into(),
                user_id: 42,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingOwner));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = MemoryStore::new();
        let ann = store.insert_user(new_user("ann", "ann@x.io")).await.unwrap();
        let adv = store
            .insert_advertisement(NewAdvertisement {
                title: "bike".into(),
                description: "red".into(),
                user_id: ann.id,
            })
            .await
            .unwrap();

        store.delete_user(ann.id).await.unwrap();
        assert!(store.advertisement_by_id(adv.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_user(ann.id).await,
            Err(StoreError::NotFound)
        ));
    }
}
