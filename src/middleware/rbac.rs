// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::AppRole,
};

/// Define qual papel uma rota exige.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> AppRole;
}

/// Guardião por papel: recusa a requisição quando o papel do perfil é outro.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let required = T::role();
        if user.role() != required {
            tracing::warn!(
                profile_id = %user.profile_id(),
                role = ?user.role(),
                required = ?required,
                "acesso negado por papel"
            );
            return Err(AppError::Forbidden(required));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct ImporterOnly;
impl RoleDef for ImporterOnly {
    fn role() -> AppRole { AppRole::Importer }
}

pub struct ExporterOnly;
impl RoleDef for ExporterOnly {
    fn role() -> AppRole { AppRole::Exporter }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Profile;
    use axum::http::Request;
    use chrono::Utc;
    use uuid::Uuid;

    fn parts_with(role: Option<AppRole>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(role) = role {
            let now = Utc::now();
            parts.extensions.insert(AuthenticatedUser {
                user_id: Uuid::new_v4(),
                token_id: Uuid::new_v4(),
                profile: Profile {
                    id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                    name: "Teste".into(),
                    role,
                    created_at: now,
                    updated_at: now,
                },
            });
        }
        parts
    }

    #[tokio::test]
    async fn test_matching_role_passes() {
        let mut parts = parts_with(Some(AppRole::Importer));
        let guard = RequireRole::<ImporterOnly>::from_request_parts(&mut parts, &()).await;
        assert!(guard.is_ok());
    }

    #[tokio::test]
    async fn test_exporter_is_refused_on_importer_route() {
        let mut parts = parts_with(Some(AppRole::Exporter));
        let guard = RequireRole::<ImporterOnly>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(guard, Err(AppError::Forbidden(AppRole::Importer))));
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let mut parts = parts_with(None);
        let guard = RequireRole::<ExporterOnly>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(guard, Err(AppError::InvalidToken)));
    }
}
