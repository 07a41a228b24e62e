use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::{
    common::i18n::{I18nStore, DEFAULT_LANG},
    middleware::i18n::Locale,
    models::auth::AppRole,
};

// Recursos que podem não ser encontrados (viram a chave de tradução)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Profile,
    Product,
    Image,
    QuoteRequest,
    Quote,
    Route,
}

impl Resource {
    fn message_key(self) -> &'static str {
        match self {
            Resource::Profile => "not_found_profile",
            Resource::Product => "not_found_product",
            Resource::Image => "not_found_image",
            Resource::QuoteRequest => "not_found_quote_request",
            Resource::Quote => "not_found_quote",
            Resource::Route => "not_found_route",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito ao papel {0:?}")]
    Forbidden(AppRole),

    #[error("Não encontrado: {0:?}")]
    NotFound(Resource),

    // Regra de negócio violada; a mensagem segue para o cliente como está.
    #[error("{0}")]
    BusinessRule(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),
}

// O erro já pronto para o cliente (status + mensagem traduzida)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Erro de validação de um único campo, no mesmo formato do `validator`.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut err = validator::ValidationError::new(code);
        err.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, err);
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden(AppRole::Importer) => "forbidden_importer",
            AppError::Forbidden(AppRole::Exporter) => "forbidden_exporter",
            AppError::NotFound(resource) => resource.message_key(),
            _ => "internal_error",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, nunca na resposta.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let error = match self {
            AppError::BusinessRule(message) => message.clone(),
            other => store.translate(&locale.0, other.message_key()).to_string(),
        };

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado onde não há Locale à mão (middlewares e extratores): responde em português.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let locale = Locale(DEFAULT_LANG.to_string());
        self.to_api_error(&locale, &I18nStore::new()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden(AppRole::Importer).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound(Resource::Quote).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BusinessRule("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_friendly_auth_messages() {
        let store = I18nStore::new();
        let pt = Locale("pt".to_string());

        let dup = AppError::EmailAlreadyExists.to_api_error(&pt, &store);
        assert_eq!(dup.error, "Este e-mail já está em uso. Tente fazer login.");

        let bad = AppError::InvalidCredentials.to_api_error(&pt, &store);
        assert_eq!(bad.error, "E-mail ou senha incorretos.");
    }

    #[test]
    fn test_validation_details_are_listed_per_field() {
        let store = I18nStore::new();
        let err = AppError::field("quantity", "range", "A quantidade deve ser maior que zero.");
        let api = err.to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "One or more fields are invalid.");
        let details = api.details.unwrap();
        assert_eq!(details["quantity"][0], "A quantidade deve ser maior que zero.");
    }

    #[test]
    fn test_internal_errors_are_hidden() {
        let store = I18nStore::new();
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"));
        let api = err.to_api_error(&en(), &store);
        assert_eq!(api.error, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }

    #[test]
    fn test_business_rule_message_passes_through() {
        let store = I18nStore::new();
        let err = AppError::BusinessRule("O responsável precisa ser um exportador.".into());
        let api = err.to_api_error(&en(), &store);
        assert_eq!(api.error, "O responsável precisa ser um exportador.");
    }
}
