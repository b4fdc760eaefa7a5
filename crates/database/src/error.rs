use sea_orm::DbErr;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the catalog and booking services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("plan limit reached: at most {limit} venues")]
    LimitReached { limit: u64 },
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable, caller-facing name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::State(_) => "INVALID_STATE",
            Self::LimitReached { .. } => "PLAN_LIMIT_REACHED",
            Self::Db(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::not_found("reservation", 42);
        assert_eq!(err.to_string(), "reservation 42 not found");
        assert_eq!(err.kind(), "NOT_FOUND");

        let err = ServiceError::LimitReached { limit: 2 };
        assert_eq!(err.to_string(), "plan limit reached: at most 2 venues");
    }

    #[test]
    fn test_db_errors_convert() {
        let err: ServiceError = DbErr::Custom("boom".to_owned()).into();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(err.kind(), "INTERNAL_ERROR");
    }
}
