use serde::Deserialize;
use validator::Validate;

/// Body of `POST /login/`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Field required"))]
    pub email: Option<String>,
    #[validate(required(message = "Field required"))]
    pub password: Option<String>,
}
