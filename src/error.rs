use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;
use validator::ValidationErrors;

use crate::{
    store::StoreError,
    validation::{field_errors, FieldError},
};

/// Every failure a handler can report. Rendered as
/// `{"status":"error","description":...}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn description(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::Internal(_) => json!("Internal server error"),
            other => json!(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound("Resource doesn't exist".into()),
            StoreError::Conflict(field) => ApiError::Conflict(format!("{field} is busy")),
            StoreError::MissingOwner => ApiError::Authentication("User doesn't exist".into()),
            StoreError::Database(e) => ApiError::Internal(e),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::Validation(field_errors(&e))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    description: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let body = ErrorBody {
            status: "error",
            description: self.description(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `{"status":"success"}`, returned by the delete endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UniqueField;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_render_as_a_list() {
        let (status, body) = render(ApiError::Validation(vec![FieldError::new(
            "password",
            "Password is too short",
        )]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["description"][0]["field"], "password");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = render(ApiError::Internal(anyhow::anyhow!("pool timed out"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["description"], "Internal server error");
    }

    #[test]
    fn store_conflict_maps_to_409() {
        let err = ApiError::from(StoreError::Conflict(UniqueField::Email));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "email is busy");
    }

    #[test]
    fn missing_owner_is_an_authentication_failure() {
        let err = ApiError::from(StoreError::MissingOwner);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
