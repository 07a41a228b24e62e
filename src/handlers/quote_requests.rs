// src/handlers/quote_requests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::non_empty,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ImporterOnly, RequireRole},
    },
    models::{
        auth::Profile,
        quote::{ImporterQuoteRequestDetail, QuoteRequest, QuoteRequestListEntry},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequestPayload {
    #[validate(required(message = "O campo 'productId' é obrigatório."))]
    pub product_id: Option<Uuid>,

    // Ausente = pedido aberto para todos os exportadores
    pub assigned_to_id: Option<Uuid>,

    #[validate(length(max = 2000, message = "As observações devem ter no máximo 2000 caracteres."))]
    pub notes: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/importer/exporters",
    tag = "Quote Requests",
    responses(
        (status = 200, description = "Exportadores disponíveis para atribuição", body = Vec<Profile>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_exporters(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<ImporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let exporters = app_state.quote_service
        .list_exporters()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(exporters))
}

#[utoipa::path(
    post,
    path = "/api/importer/quote-requests",
    tag = "Quote Requests",
    request_body = CreateQuoteRequestPayload,
    responses(
        (status = 201, description = "Pedido criado; produto enviado para cotação", body = QuoteRequest),
        (status = 400, description = "Dados inválidos ou responsável não é exportador"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_quote_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Json(payload): Json<CreateQuoteRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product_id = payload.product_id
        .ok_or_else(|| {
            AppError::field("product_id", "required", "O campo 'productId' é obrigatório.")
                .to_api_error(&locale, &app_state.i18n_store)
        })?;
    let notes = non_empty(payload.notes);

    let request = app_state.quote_service
        .create_request(user.profile_id(), product_id, payload.assigned_to_id, notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/importer/quote-requests",
    tag = "Quote Requests",
    responses(
        (status = 200, description = "Pedidos do importador, mais novos primeiro", body = Vec<QuoteRequestListEntry>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_quote_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state.quote_service
        .list_importer_requests(user.profile_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/importer/quote-requests/{id}",
    tag = "Quote Requests",
    params(
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Pedido com cotações ordenadas por preço", body = ImporterQuoteRequestDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_quote_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state.quote_service
        .importer_request_detail(user.profile_id(), request_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}
