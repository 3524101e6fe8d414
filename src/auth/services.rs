use tracing::warn;

use super::password::{hash_password, verify_password};
use crate::{
    error::ApiError,
    store::{NewUser, Store, StoreError, UniqueField},
    users::repo_types::User,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified against when the email is unknown, so both login failures cost
/// one argon2 run with the default parameters.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$YWRib2FyZC1sb2dpbi1zYWx0\
                          $bm90LWEtcmVhbC1wYXNzd29yZC1oYXNoLXZhbHVlISE";

/// Hashes the password and stores the new user.
pub async fn create_user(
    store: &dyn Store,
    username: String,
    email: String,
    password: &str,
) -> Result<User, ApiError> {
    let password_hash = hash_password(password)?;
    store
        .insert_user(NewUser {
            username: username.clone(),
            email: email.clone(),
            password_hash,
        })
        .await
        .map_err(|e| conflict_or(e, Some(&username), Some(&email)))
}

/// Looks the user up by email and checks the password. Unknown email and
/// wrong password fail the same way.
pub async fn authenticate(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let Some(user) = store.user_by_email(email).await? else {
        verify_password(password, DUMMY_HASH)?;
        warn!("login with unknown email");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    }
    Ok(user)
}

pub fn check_ownership(owner_id: i64, caller_id: i64, what: &str) -> Result<(), ApiError> {
    if owner_id != caller_id {
        warn!(owner_id, caller_id, "ownership check failed");
        return Err(ApiError::Authorization(format!(
            "You don't have permission to edit this {what}"
        )));
    }
    Ok(())
}

/// Names the submitted value that hit a unique constraint, e.g. `"ann is busy"`.
pub fn conflict_or(e: StoreError, username: Option<&str>, email: Option<&str>) -> ApiError {
    let value = match &e {
        StoreError::Conflict(UniqueField::Username) => username,
        StoreError::Conflict(UniqueField::Email) => email,
        _ => None,
    };
    match value {
        Some(value) => ApiError::Conflict(format!("{value} is busy")),
        None => e.into(),
    }
}
