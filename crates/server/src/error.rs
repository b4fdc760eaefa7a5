use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::ServiceError;
use log::error;
use reports::ReportError;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors returned by handlers, rendered as `{"code", "message"}` JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Report(#[from] ReportError),
    /// No usable principal on the request
    #[error("{0}")]
    Unauthenticated(String),
    /// Authenticated, but the role may not use this endpoint
    #[error("{0}")]
    Forbidden(String),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::Service(ServiceError::Db(err))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Service(err) => {
                let status = match err {
                    ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                    ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
                    ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                    ServiceError::Conflict(_) | ServiceError::State(_) => StatusCode::CONFLICT,
                    ServiceError::LimitReached { .. } => StatusCode::FORBIDDEN,
                    ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind())
            }
            Self::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            code: code.to_owned(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::not_found("court", 3), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::unauthorized("nope"), StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT, "CONFLICT"),
            (ServiceError::State("cancelled".into()), StatusCode::CONFLICT, "INVALID_STATE"),
            (
                ServiceError::LimitReached { limit: 1 },
                StatusCode::FORBIDDEN,
                "PLAN_LIMIT_REACHED",
            ),
        ];

        for (err, status, code) in cases {
            let (actual, body) = render(err.into()).await;
            assert_eq!(actual, status);
            assert_eq!(body["code"], code);
        }
    }

    #[tokio::test]
    async fn test_conflict_message_is_kept() {
        let err = ServiceError::Conflict("court 1 is already booked from a to b".into());
        let (_, body) = render(err.into()).await;
        assert_eq!(body["message"], "conflict: court 1 is already booked from a to b");
    }

    #[tokio::test]
    async fn test_database_errors_are_hidden() {
        let (status, body) = render(DbErr::Custom("password=hunter2".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_auth_errors() {
        let (status, body) = render(ApiError::Unauthenticated("missing token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = render(ApiError::Forbidden("staff only".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
