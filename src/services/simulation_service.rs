// src/services/simulation_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{QuoteRepository, SimulationRepository},
    models::{
        quote::Quote,
        simulation::{CostBreakdown, ShipmentParams, SimulationCreated, SimulationHistory},
    },
};
use sqlx::PgPool;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Calcula o custo de importação (landed cost) de uma cotação.
///
/// ```text
/// subtotal          = preço unitário * quantidade
/// total_antes_imp.  = subtotal + frete + seguro + outros
/// total_usd         = total_antes_imp. * (1 + imposto% / 100)
/// total_brl         = total_usd * câmbio
/// unitário_usd/brl  = total / quantidade
/// ```
///
/// A quantidade é validada antes de qualquer conta: zero ou negativa é erro de
/// validação, nunca uma divisão por zero. Estouro aritmético também vira erro.
pub fn compute_landed_cost(
    price_per_unit_usd: Decimal,
    params: &ShipmentParams,
) -> Result<CostBreakdown, AppError> {
    if params.quantity <= 0 {
        return Err(AppError::field(
            "quantity",
            "range",
            "A quantidade deve ser maior que zero.",
        ));
    }

    let quantity = Decimal::from(params.quantity);
    let overflow = || AppError::field("quantity", "overflow", "Valores grandes demais para simular.");

    let subtotal_usd = price_per_unit_usd.checked_mul(quantity).ok_or_else(overflow)?;
    let total_before_tax_usd = subtotal_usd
        .checked_add(params.freight_usd)
        .and_then(|v| v.checked_add(params.insurance_usd))
        .and_then(|v| v.checked_add(params.other_costs_usd))
        .ok_or_else(overflow)?;

    let tax_factor = params
        .tax_rate_percent
        .checked_div(ONE_HUNDRED)
        .and_then(|v| v.checked_add(Decimal::ONE))
        .ok_or_else(overflow)?;

    let estimated_total_cost_usd = total_before_tax_usd.checked_mul(tax_factor).ok_or_else(overflow)?;
    let estimated_total_cost_brl = estimated_total_cost_usd
        .checked_mul(params.exchange_rate)
        .ok_or_else(overflow)?;

    let estimated_unit_cost_usd = estimated_total_cost_usd.checked_div(quantity).ok_or_else(overflow)?;
    let estimated_unit_cost_brl = estimated_total_cost_brl.checked_div(quantity).ok_or_else(overflow)?;

    Ok(CostBreakdown {
        subtotal_usd,
        total_before_tax_usd,
        estimated_total_cost_usd,
        estimated_total_cost_brl,
        estimated_unit_cost_usd,
        estimated_unit_cost_brl,
    })
}

#[derive(Clone)]
pub struct SimulationService {
    quote_repo: QuoteRepository,
    simulation_repo: SimulationRepository,
    pool: PgPool,
    enforce_moq: bool,
}

impl SimulationService {
    pub fn new(
        quote_repo: QuoteRepository,
        simulation_repo: SimulationRepository,
        pool: PgPool,
        enforce_moq: bool,
    ) -> Self {
        Self { quote_repo, simulation_repo, pool, enforce_moq }
    }

    /// Checa a quantidade contra o MOQ da cotação. Devolve `true` quando está abaixo
    /// e a regra é apenas indicativa.
    pub fn check_moq(&self, quote: &Quote, quantity: i32) -> Result<bool, AppError> {
        let below_moq = quantity < quote.moq;
        if below_moq && self.enforce_moq {
            return Err(AppError::field(
                "quantity",
                "below_moq",
                "A quantidade não pode ser menor que o MOQ da cotação.",
            ));
        }
        Ok(below_moq)
    }

    async fn quote_for_importer(&self, importer_id: Uuid, quote_id: Uuid) -> Result<Quote, AppError> {
        self.quote_repo
            .find_quote_for_importer(&self.pool, importer_id, quote_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Quote))
    }

    /// Calcula e grava uma nova simulação. Cada chamada gera um novo registro no histórico.
    pub async fn simulate(
        &self,
        importer_id: Uuid,
        quote_id: Uuid,
        params: ShipmentParams,
    ) -> Result<SimulationCreated, AppError> {
        let quote = self.quote_for_importer(importer_id, quote_id).await?;

        let costs = compute_landed_cost(quote.price_per_unit_usd, &params)?;
        let below_moq = self.check_moq(&quote, params.quantity)?;

        let simulation = self.simulation_repo
            .insert_simulation(&self.pool, quote.id, &params, &costs)
            .await?;

        tracing::info!(
            quote_id = %quote.id,
            quantity = params.quantity,
            total_brl = %costs.estimated_total_cost_brl,
            below_moq,
            "simulação registrada"
        );

        Ok(SimulationCreated { simulation, below_moq })
    }

    pub async fn history(&self, importer_id: Uuid, quote_id: Uuid) -> Result<SimulationHistory, AppError> {
        let quote = self.quote_for_importer(importer_id, quote_id).await?;
        let simulations = self.simulation_repo.list_for_quote(quote.id).await?;
        Ok(SimulationHistory { quote, simulations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_product, seed_profile, seed_quote, seed_request, test_state};
    use crate::models::{auth::AppRole, quote::QuoteStatus};
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use std::str::FromStr;

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn params(quantity: i32, freight: &str, insurance: &str, other: &str, tax: &str, fx: &str) -> ShipmentParams {
        ShipmentParams {
            quantity,
            freight_usd: d(freight),
            insurance_usd: d(insurance),
            other_costs_usd: d(other),
            tax_rate_percent: d(tax),
            exchange_rate: d(fx),
        }
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() <= d("0.000000001")
    }

    #[test]
    fn test_reference_scenario() {
        let costs = compute_landed_cost(d("2.50"), &params(1000, "300", "50", "0", "10", "5.00")).unwrap();

        assert_eq!(costs.subtotal_usd, d("2500"));
        assert_eq!(costs.total_before_tax_usd, d("2850"));
        assert_eq!(costs.estimated_total_cost_usd, d("3135.00"));
        assert_eq!(costs.estimated_total_cost_brl, d("15675.00"));
        assert_eq!(costs.estimated_unit_cost_usd, d("3.135"));
        assert_eq!(costs.estimated_unit_cost_brl, d("15.675"));
    }

    #[test]
    fn test_formula_holds_across_inputs() {
        let cases = [
            ("9.99", params(1, "0", "0", "0", "0", "1")),
            ("12.50", params(7, "123.45", "10", "3.3", "60", "5.4321")),
            ("0.01", params(250_000, "4000", "0", "99.99", "92.5", "7.1")),
            ("15.00", params(3, "1", "1", "1", "33.3333", "4.87")),
        ];

        for (price, p) in cases {
            let price = d(price);
            let costs = compute_landed_cost(price, &p).unwrap();
            let qty = Decimal::from(p.quantity);

            let expected_total = (price * qty + p.freight_usd + p.insurance_usd + p.other_costs_usd)
                * (Decimal::ONE + p.tax_rate_percent / Decimal::ONE_HUNDRED);

            assert_eq!(costs.estimated_total_cost_usd, expected_total);
            assert_eq!(costs.estimated_total_cost_brl, expected_total * p.exchange_rate);
            assert_eq!(costs.estimated_unit_cost_usd, expected_total / qty);
            assert_eq!(costs.estimated_unit_cost_brl, costs.estimated_total_cost_brl / qty);

            // unitário * quantidade reproduz o total (com tolerância)
            assert!(close(costs.estimated_unit_cost_usd * qty, costs.estimated_total_cost_usd));
            assert!(close(costs.estimated_unit_cost_brl * qty, costs.estimated_total_cost_brl));
        }
    }

    #[test]
    fn test_same_inputs_give_same_values() {
        let p = params(1500, "820.10", "35", "12", "18.5", "5.12");
        let first = compute_landed_cost(d("3.21"), &p).unwrap();
        let second = compute_landed_cost(d("3.21"), &p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_quantity_is_rejected_before_computing() {
        let err = compute_landed_cost(d("2.50"), &params(0, "300", "50", "0", "10", "5")).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("quantity"));
            }
            other => panic!("esperava erro de validação, veio {:?}", other),
        }
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        assert!(compute_landed_cost(d("2.50"), &params(-5, "0", "0", "0", "0", "5")).is_err());
    }

    #[test]
    fn test_overflow_is_an_error_not_a_panic() {
        let huge = Decimal::MAX;
        let result = compute_landed_cost(huge, &params(i32::MAX, "0", "0", "0", "0", "5"));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    fn quote_with_moq(moq: i32) -> Quote {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            quote_request_id: Uuid::new_v4(),
            created_by_id: Uuid::new_v4(),
            factory_name: "Ningbo Toys".into(),
            factory_location: None,
            incoterm: None,
            price_per_unit_usd: d("1.10"),
            moq,
            available_stock: None,
            lead_time_days: None,
            competitor_links: None,
            certifications: None,
            remarks: None,
            status: QuoteStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(enforce_moq: bool) -> SimulationService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/cotaimport_test")
            .unwrap();
        SimulationService::new(
            QuoteRepository::new(pool.clone()),
            SimulationRepository::new(pool.clone()),
            pool,
            enforce_moq,
        )
    }

    #[tokio::test]
    async fn test_moq_is_a_hint_by_default() {
        let svc = service(false);
        assert!(svc.check_moq(&quote_with_moq(500), 100).unwrap());
        assert!(!svc.check_moq(&quote_with_moq(500), 500).unwrap());
    }

    #[tokio::test]
    async fn test_moq_can_be_enforced() {
        let svc = service(true);
        assert!(svc.check_moq(&quote_with_moq(500), 499).is_err());
        assert!(svc.check_moq(&quote_with_moq(500), 500).is_ok());
    }

    // --- Com banco (TEST_DATABASE_URL) ---

    async fn seeded_quote(state: &crate::config::AppState) -> (Uuid, Quote) {
        let pool = &state.db_pool;
        let importer = seed_profile(pool, AppRole::Importer, "importador").await;
        let exporter = seed_profile(pool, AppRole::Exporter, "exportador").await;
        let product = seed_product(state, importer.id, &[]).await;
        let request = seed_request(state, importer.id, product.product.id, None).await;
        let quote = seed_quote(state, exporter.id, request.id, "2.50").await;
        (importer.id, quote)
    }

    #[tokio::test]
    async fn test_repeated_submit_appends_history_newest_first() {
        let Some(state) = test_state().await else { return };
        let (importer_id, quote) = seeded_quote(&state).await;
        let svc = &state.simulation_service;

        let reference = || params(1000, "300", "50", "0", "10", "5.00");
        let first = svc.simulate(importer_id, quote.id, reference()).await.unwrap();
        let second = svc.simulate(importer_id, quote.id, reference()).await.unwrap();
        assert_ne!(first.simulation.id, second.simulation.id);

        let history = svc.history(importer_id, quote.id).await.unwrap();
        let ids: Vec<Uuid> = history.simulations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.simulation.id, first.simulation.id]);

        let stored = &history.simulations[0];
        assert_eq!(stored.estimated_total_cost_usd, d("3135"));
        assert_eq!(stored.estimated_total_cost_brl, d("15675"));
        assert_eq!(stored.estimated_unit_cost_brl, d("15.675"));
    }

    #[tokio::test]
    async fn test_other_importer_cannot_simulate_or_read_history() {
        let Some(state) = test_state().await else { return };
        let (_, quote) = seeded_quote(&state).await;
        let stranger = seed_profile(&state.db_pool, AppRole::Importer, "outro-importador").await;
        let svc = &state.simulation_service;

        let result = svc.simulate(stranger.id, quote.id, params(10, "0", "0", "0", "0", "5")).await;
        assert!(matches!(result, Err(AppError::NotFound(Resource::Quote))));
        assert!(matches!(
            svc.history(stranger.id, quote.id).await,
            Err(AppError::NotFound(Resource::Quote))
        ));
    }
}
