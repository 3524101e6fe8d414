use serde::Deserialize;
use validator::Validate;

use crate::{
    store::{AdvertisementChanges, NewAdvertisement},
    validation::not_blank,
};

pub const MAX_TITLE_LEN: u64 = 200;
pub const MAX_DESCRIPTION_LEN: u64 = 5000;

/// Body of `POST /adv/`. Any owner field in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdvertisement {
    #[validate(
        required(message = "Field required"),
        custom(function = "not_blank"),
        length(max = MAX_TITLE_LEN, message = "Must be at most 200 characters")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Field required"),
        custom(function = "not_blank"),
        length(max = MAX_DESCRIPTION_LEN, message = "Must be at most 5000 characters")
    )]
    pub description: Option<String>,
}

/// Body of `PATCH /adv/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAdvertisement {
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TITLE_LEN, message = "Must be at most 200 characters")
    )]
    pub title: Option<String>,
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_DESCRIPTION_LEN, message = "Must be at most 5000 characters")
    )]
    pub description: Option<String>,
}

impl CreateAdvertisement {
    /// Call after `validate`, which guarantees both fields are present.
    pub fn owned_by(self, user_id: i64) -> NewAdvertisement {
        NewAdvertisement {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            user_id,
        }
    }
}

impl From<UpdateAdvertisement> for AdvertisementChanges {
    fn from(u: UpdateAdvertisement) -> Self {
        Self {
            title: u.title,
            description: u.description,
        }
    }
}
