// src/db/simulation_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::simulation::{CostBreakdown, QuoteCostSimulation, ShipmentParams},
};

// Histórico de simulações: apenas INSERT e SELECT, nunca UPDATE/DELETE
#[derive(Clone)]
pub struct SimulationRepository {
    pool: PgPool,
}

impl SimulationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_simulation<'e, E>(
        &self,
        executor: E,
        quote_id: Uuid,
        params: &ShipmentParams,
        costs: &CostBreakdown,
    ) -> Result<QuoteCostSimulation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let simulation = sqlx::query_as::<_, QuoteCostSimulation>(
            r#"
            INSERT INTO quote_cost_simulations (
                quote_id, quantity, freight_usd, insurance_usd, other_costs_usd,
                tax_rate_percent, exchange_rate,
                estimated_total_cost_usd, estimated_total_cost_brl,
                estimated_unit_cost_usd, estimated_unit_cost_brl
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(quote_id)
        .bind(params.quantity)
        .bind(params.freight_usd)
        .bind(params.insurance_usd)
        .bind(params.other_costs_usd)
        .bind(params.tax_rate_percent)
        .bind(params.exchange_rate)
        .bind(costs.estimated_total_cost_usd)
        .bind(costs.estimated_total_cost_brl)
        .bind(costs.estimated_unit_cost_usd)
        .bind(costs.estimated_unit_cost_brl)
        .fetch_one(executor)
        .await?;

        Ok(simulation)
    }

    /// Histórico da cotação, mais recente primeiro.
    pub async fn list_for_quote(&self, quote_id: Uuid) -> Result<Vec<QuoteCostSimulation>, AppError> {
        let simulations = sqlx::query_as::<_, QuoteCostSimulation>(
            "SELECT * FROM quote_cost_simulations WHERE quote_id = $1 ORDER BY created_at DESC",
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(simulations)
    }
}
