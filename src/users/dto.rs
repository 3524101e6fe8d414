use serde::Serialize;
use time::OffsetDateTime;

use crate::users::repo_types::User;

/// Public view of a user. `token` is only present on responses that issue one.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, token: Option<String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            creation_time: user.creation_time,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn user() -> User {
        User {
            id: 7,
            username: "ann".into(),
            email: "ann@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            creation_time: datetime!(2024-03-01 12:00 UTC),
        }
    }

    #[test]
    fn never_serializes_password() {
        let json = serde_json::to_value(UserResponse::new(user(), None)).unwrap();
        assert_eq!(json["creation_time"], "2024-03-01T12:00:00Z");
        assert!(json.get("token").is_none());
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn includes_token_when_issued() {
        let json = serde_json::to_value(UserResponse::new(user(), Some("t0k".into()))).unwrap();
        assert_eq!(json["token"], "t0k");
        assert_eq!(json["id"], 7);
    }
}
