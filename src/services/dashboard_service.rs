// src/services/dashboard_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use crate::{
    common::error::AppError,
    db::{ProductRepository, QuoteRepository},
    models::dashboard::{ExporterDashboard, ImporterDashboard},
};

const RECENT_REQUESTS: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    product_repo: ProductRepository,
    quote_repo: QuoteRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(product_repo: ProductRepository, quote_repo: QuoteRepository, pool: PgPool) -> Self {
        Self { product_repo, quote_repo, pool }
    }

    pub async fn importer_summary(&self, importer_id: Uuid) -> Result<ImporterDashboard, AppError> {
        // Consultas independentes: cada uma pega sua própria conexão do pool
        let (total_products, quote_requests_sent, quotes_received, recent_requests) = tokio::try_join!(
            self.product_repo.count_by_owner(&self.pool, importer_id),
            self.quote_repo.count_for_importer(&self.pool, importer_id),
            self.quote_repo.count_quotes_received(&self.pool, importer_id),
            self.quote_repo.list_for_importer(&self.pool, importer_id, Some(RECENT_REQUESTS)),
        )?;

        Ok(ImporterDashboard {
            total_products,
            quote_requests_sent,
            quotes_received,
            recent_requests,
        })
    }

    pub async fn exporter_summary(&self, exporter_id: Uuid) -> Result<ExporterDashboard, AppError> {
        let (pending_requests, quotes_submitted, recent_requests) = tokio::try_join!(
            self.quote_repo.count_open_visible_to_exporter(&self.pool, exporter_id),
            self.quote_repo.count_quotes_by_creator(&self.pool, exporter_id),
            self.quote_repo.list_visible_to_exporter(&self.pool, exporter_id, Some(RECENT_REQUESTS)),
        )?;

        Ok(ExporterDashboard {
            pending_requests,
            quotes_submitted,
            recent_requests,
        })
    }
}
