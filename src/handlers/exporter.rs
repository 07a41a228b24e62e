// src/handlers/exporter.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{non_empty, validate_not_blank, validate_unit_price},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ExporterOnly, RequireRole},
    },
    models::quote::{ExporterQuoteRequestDetail, Incoterm, Quote, QuoteFields, QuoteRequestListEntry},
};

// ---
// Payload: cotação enviada pelo exportador
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome da fábrica é obrigatório."))]
    pub factory_name: String,

    pub factory_location: Option<String>,
    pub incoterm: Option<Incoterm>,

    #[validate(custom(function = "validate_unit_price"))]
    pub price_per_unit_usd: Decimal,

    #[validate(range(min = 1, message = "O MOQ deve ser maior que zero."))]
    pub moq: i32,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub available_stock: Option<i32>,

    #[validate(range(min = 0, message = "O prazo não pode ser negativo."))]
    pub lead_time_days: Option<i32>,

    pub competitor_links: Option<String>,
    pub certifications: Option<String>,
    pub remarks: Option<String>,
}

impl From<QuotePayload> for QuoteFields {
    fn from(payload: QuotePayload) -> Self {
        QuoteFields {
            factory_name: payload.factory_name.trim().to_string(),
            factory_location: non_empty(payload.factory_location),
            incoterm: payload.incoterm,
            price_per_unit_usd: payload.price_per_unit_usd,
            moq: payload.moq,
            available_stock: payload.available_stock,
            lead_time_days: payload.lead_time_days,
            competitor_links: non_empty(payload.competitor_links),
            certifications: non_empty(payload.certifications),
            remarks: non_empty(payload.remarks),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/exporter/quote-requests",
    tag = "Exporter",
    responses(
        (status = 200, description = "Pedidos abertos a todos ou atribuídos a mim", body = Vec<QuoteRequestListEntry>),
        (status = 403, description = "Apenas exportadores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state.quote_service
        .list_exporter_requests(user.profile_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/exporter/quote-requests/{id}",
    tag = "Exporter",
    params(
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Pedido, produto e minhas cotações", body = ExporterQuoteRequestDetail),
        (status = 404, description = "Pedido não encontrado ou não visível")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state.quote_service
        .exporter_request_detail(user.profile_id(), request_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/exporter/quote-requests/{id}/quotes",
    tag = "Exporter",
    request_body = QuotePayload,
    params(
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 201, description = "Cotação enviada; pedido concluído", body = Quote),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pedido não encontrado ou não visível")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fields = QuoteFields::from(payload);

    let quote = app_state.quote_service
        .submit_quote(user.profile_id(), request_id, &fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quote)))
}

#[utoipa::path(
    put,
    path = "/api/exporter/quotes/{id}",
    tag = "Exporter",
    request_body = QuotePayload,
    params(
        ("id" = Uuid, Path, description = "ID da cotação")
    ),
    responses(
        (status = 200, description = "Cotação atualizada", body = Quote),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fields = QuoteFields::from(payload);

    let quote = app_state.quote_service
        .update_quote(user.profile_id(), quote_id, &fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quote))
}

#[utoipa::path(
    delete,
    path = "/api/exporter/quotes/{id}",
    tag = "Exporter",
    params(
        ("id" = Uuid, Path, description = "ID da cotação")
    ),
    responses(
        (status = 204, description = "Cotação excluída"),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.quote_service
        .delete_quote(user.profile_id(), quote_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_payload_requires_positive_price_and_moq() {
        let payload: QuotePayload = serde_json::from_value(json!({
            "factoryName": "Ningbo Toys",
            "pricePerUnitUsd": 0,
            "moq": 0
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price_per_unit_usd"));
        assert!(fields.contains_key("moq"));
    }

    #[test]
    fn test_quote_payload_rejects_blank_factory_name() {
        let payload: QuotePayload = serde_json::from_value(json!({
            "factoryName": "   ",
            "pricePerUnitUsd": 2.5,
            "moq": 100
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("factory_name"));
    }

    #[test]
    fn test_quote_payload_rejects_price_outside_column() {
        for price in [json!(1.23456), json!(0.00004), json!(12345678901.5)] {
            let payload: QuotePayload = serde_json::from_value(json!({
                "factoryName": "Ningbo Toys",
                "pricePerUnitUsd": price,
                "moq": 100
            }))
            .unwrap();

            let errors = payload.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("price_per_unit_usd"), "{price}");
        }
    }

    #[test]
    fn test_quote_payload_maps_to_fields() {
        let payload: QuotePayload = serde_json::from_value(json!({
            "factoryName": " Ningbo Toys ",
            "incoterm": "FOB",
            "pricePerUnitUsd": 1.1,
            "moq": 500,
            "remarks": ""
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        let fields = QuoteFields::from(payload);
        assert_eq!(fields.factory_name, "Ningbo Toys");
        assert_eq!(fields.incoterm, Some(Incoterm::Fob));
        assert_eq!(fields.moq, 500);
        assert_eq!(fields.remarks, None);
    }
}
