// src/handlers/simulations.rs

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
        validation::{validate_not_negative, validate_positive},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ImporterOnly, RequireRole},
    },
    models::simulation::{ShipmentParams, SimulationCreated, SimulationHistory},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 1000)]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub freight_usd: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub insurance_usd: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub other_costs_usd: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub tax_rate_percent: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 5.0)]
    pub exchange_rate: Decimal,
}

impl From<&SimulationPayload> for ShipmentParams {
    fn from(payload: &SimulationPayload) -> Self {
        ShipmentParams {
            quantity: payload.quantity,
            freight_usd: payload.freight_usd,
            insurance_usd: payload.insurance_usd,
            other_costs_usd: payload.other_costs_usd,
            tax_rate_percent: payload.tax_rate_percent,
            exchange_rate: payload.exchange_rate,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/importer/quotes/{id}/simulations",
    tag = "Cost Simulation",
    params(
        ("id" = Uuid, Path, description = "ID da cotação")
    ),
    responses(
        (status = 200, description = "Cotação e histórico de simulações (mais recente primeiro)", body = SimulationHistory),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_simulations(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state.simulation_service
        .history(user.profile_id(), quote_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(history))
}

#[utoipa::path(
    post,
    path = "/api/importer/quotes/{id}/simulations",
    tag = "Cost Simulation",
    request_body = SimulationPayload,
    params(
        ("id" = Uuid, Path, description = "ID da cotação")
    ),
    responses(
        (status = 201, description = "Simulação calculada e registrada", body = SimulationCreated),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_simulation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<SimulationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state.simulation_service
        .simulate(user.profile_id(), quote_id, ShipmentParams::from(&payload))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_costs_default_to_zero() {
        let payload: SimulationPayload = serde_json::from_value(json!({
            "quantity": 1000,
            "exchangeRate": 5
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        let params = ShipmentParams::from(&payload);
        assert_eq!(params.freight_usd, Decimal::ZERO);
        assert_eq!(params.tax_rate_percent, Decimal::ZERO);
        assert_eq!(params.exchange_rate, Decimal::from(5));
    }

    #[test]
    fn test_zero_quantity_and_exchange_rate_are_rejected() {
        let payload: SimulationPayload = serde_json::from_value(json!({
            "quantity": 0,
            "freightUsd": -10,
            "exchangeRate": 0
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("quantity"));
        assert!(fields.contains_key("freight_usd"));
        assert!(fields.contains_key("exchange_rate"));
    }
}
