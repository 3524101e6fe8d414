use serde::Deserialize;
use validator::Validate;

use crate::validation::{not_blank, EMAIL_RE};

pub const MIN_PASSWORD_LEN: u64 = 8;

/// Body of `POST /register/`. Fields are `Option` so that a missing one is
/// reported with the rest instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(required(message = "Field required"), custom(function = "not_blank"))]
    pub username: Option<String>,
    #[validate(
        required(message = "Field required"),
        regex(path = *EMAIL_RE, message = "Email is invalid")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Field required"),
        length(min = MIN_PASSWORD_LEN, message = "Password is too short")
    )]
    pub password: Option<String>,
}

/// Body of `PATCH /user/{id}`; only supplied fields are checked and applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(custom(function = "not_blank"))]
    pub username: Option<String>,
    #[validate(regex(path = *EMAIL_RE, message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LEN, message = "Password is too short"))]
    pub password: Option<String>,
}
