use crate::error::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use models::{Principal, Role};
use serde::Deserialize;

/// JWT claims issued by the identity provider.
///
/// `sub` carries the numeric user id and `role` one of the panel roles.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalClaims {
    pub sub: String,
    pub role: String,
}

impl PrincipalClaims {
    pub fn principal(&self) -> Result<Principal, ApiError> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthenticated(format!("invalid subject {:?}", self.sub)))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| ApiError::Unauthenticated(err.to_string()))?;

        Ok(Principal::new(id, role))
    }
}

/// The authenticated caller, taken from the claims the auth layer verified
#[derive(Debug, Clone, Copy)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<PrincipalClaims>()
            .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".to_owned()))?;

        claims.principal().map(Self)
    }
}

/// Reject callers that are neither owners nor admins
pub fn require_staff(actor: &Principal) -> Result<(), ApiError> {
    if actor.role.is_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "this action requires the propietario or admin role".to_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn claims(sub: &str, role: &str) -> PrincipalClaims {
        PrincipalClaims {
            sub: sub.to_owned(),
            role: role.to_owned(),
        }
    }

    async fn whoami(CurrentPrincipal(actor): CurrentPrincipal) -> String {
        format!("{}:{}", actor.id, actor.role)
    }

    #[test]
    fn test_claims_to_principal() {
        let principal = claims("42", "propietario").principal().unwrap();
        assert_eq!(principal, Principal::new(42, Role::Propietario));

        assert!(claims("abc", "admin").principal().is_err());
        assert!(claims("7", "superuser").principal().is_err());
    }

    #[test]
    fn test_require_staff() {
        assert!(require_staff(&Principal::new(1, Role::Admin)).is_ok());
        assert!(require_staff(&Principal::new(1, Role::Propietario)).is_ok());
        assert!(matches!(
            require_staff(&Principal::new(1, Role::Usuario)),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_extractor_reads_verified_claims() {
        let app = Router::new().route("/me", get(whoami));

        let request = Request::builder()
            .uri("/me")
            .extension(claims("9", "admin"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"9:admin");

        let request = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
