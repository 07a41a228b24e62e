// src/models/simulation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::quote::Quote;

// Registro imutável de uma simulação (histórico por cotação)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCostSimulation {
    pub id: Uuid,
    pub quote_id: Uuid,
    #[schema(example = 1000)]
    pub quantity: i32,
    #[schema(example = "300.00")]
    pub freight_usd: Decimal,
    #[schema(example = "50.00")]
    pub insurance_usd: Decimal,
    pub other_costs_usd: Decimal,
    #[schema(example = "10.0")]
    pub tax_rate_percent: Decimal,
    #[schema(example = "5.00")]
    pub exchange_rate: Decimal,
    pub estimated_total_cost_usd: Decimal,
    pub estimated_total_cost_brl: Decimal,
    pub estimated_unit_cost_usd: Decimal,
    pub estimated_unit_cost_brl: Decimal,
    pub created_at: DateTime<Utc>,
}

// Parâmetros de embarque informados pelo importador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipmentParams {
    pub quantity: i32,
    pub freight_usd: Decimal,
    pub insurance_usd: Decimal,
    pub other_costs_usd: Decimal,
    pub tax_rate_percent: Decimal,
    pub exchange_rate: Decimal,
}

// Resultado do cálculo (função pura, antes de persistir)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub subtotal_usd: Decimal,
    pub total_before_tax_usd: Decimal,
    pub estimated_total_cost_usd: Decimal,
    pub estimated_total_cost_brl: Decimal,
    pub estimated_unit_cost_usd: Decimal,
    pub estimated_unit_cost_brl: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationCreated {
    pub simulation: QuoteCostSimulation,
    // Quantidade abaixo do MOQ (aceita quando a regra é apenas indicativa)
    pub below_moq: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationHistory {
    pub quote: Quote,
    pub simulations: Vec<QuoteCostSimulation>,
}
