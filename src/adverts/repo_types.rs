use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Advertisement record; serialized as-is in responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Advertisement {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_date: OffsetDateTime,
    pub user_id: i64, // owner
}
