// src/services/quote_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{ProductRepository, QuoteRepository, UserRepository},
    models::{
        auth::{AppRole, Profile},
        quote::{
            ExporterQuoteRequestDetail, ImporterQuoteRequestDetail, Quote, QuoteFields,
            QuoteRequest, QuoteRequestListEntry, QuoteRequestStatus, QuoteStatus, RankedQuote,
        },
    },
};

/// Ordena as cotações pelo preço unitário (menor primeiro) e marca a primeira
/// como melhor preço. A ordenação é estável: empates mantêm a ordem recebida.
pub fn rank_quotes(mut quotes: Vec<Quote>) -> Vec<RankedQuote> {
    quotes.sort_by(|a, b| a.price_per_unit_usd.cmp(&b.price_per_unit_usd));

    quotes
        .into_iter()
        .enumerate()
        .map(|(position, quote)| RankedQuote { quote, best_price: position == 0 })
        .collect()
}

#[derive(Clone)]
pub struct QuoteService {
    quote_repo: QuoteRepository,
    product_repo: ProductRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl QuoteService {
    pub fn new(
        quote_repo: QuoteRepository,
        product_repo: ProductRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self { quote_repo, product_repo, user_repo, pool }
    }

    // =========================================================================
    //  LADO DO IMPORTADOR
    // =========================================================================

    pub async fn list_exporters(&self) -> Result<Vec<Profile>, AppError> {
        self.user_repo.list_profiles_by_role(AppRole::Exporter).await
    }

    /// Cria o pedido e marca o produto como enviado para cotação (mesma transação).
    pub async fn create_request(
        &self,
        importer_id: Uuid,
        product_id: Uuid,
        assigned_to_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<QuoteRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self.product_repo
            .find_owned(&mut *tx, importer_id, product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        if let Some(assignee_id) = assigned_to_id {
            let assignee = self.user_repo
                .find_profile_by_id(&mut *tx, assignee_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Profile))?;

            if assignee.role != AppRole::Exporter {
                return Err(AppError::BusinessRule(
                    "O pedido só pode ser atribuído a um exportador.".into(),
                ));
            }
        }

        let request = self.quote_repo
            .create_request(&mut *tx, product.id, importer_id, assigned_to_id, notes)
            .await?;

        let first_request = self.product_repo
            .mark_sent_for_quote(&mut *tx, product.id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = %request.id,
            product_id = %product.id,
            first_request,
            "📨 Pedido de cotação criado"
        );
        Ok(request)
    }

    pub async fn list_importer_requests(&self, importer_id: Uuid) -> Result<Vec<QuoteRequestListEntry>, AppError> {
        self.quote_repo.list_for_importer(&self.pool, importer_id, None).await
    }

    pub async fn importer_request_detail(
        &self,
        importer_id: Uuid,
        request_id: Uuid,
    ) -> Result<ImporterQuoteRequestDetail, AppError> {
        let request = self.quote_repo
            .find_request_for_importer(&self.pool, importer_id, request_id)
            .await?
            .ok_or(AppError::NotFound(Resource::QuoteRequest))?;

        let product = self.product_repo
            .find_by_id(&self.pool, request.product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        let assigned_to_name = match request.assigned_to_id {
            Some(id) => self.user_repo
                .find_profile_by_id(&self.pool, id)
                .await?
                .map(|profile| profile.name),
            None => None,
        };

        let quotes = self.quote_repo.list_quotes_for_request(&self.pool, request.id).await?;

        Ok(ImporterQuoteRequestDetail {
            request,
            product,
            assigned_to_name,
            quotes: rank_quotes(quotes),
        })
    }

    // =========================================================================
    //  LADO DO EXPORTADOR
    // =========================================================================

    pub async fn list_exporter_requests(&self, exporter_id: Uuid) -> Result<Vec<QuoteRequestListEntry>, AppError> {
        self.quote_repo.list_visible_to_exporter(&self.pool, exporter_id, None).await
    }

    pub async fn exporter_request_detail(
        &self,
        exporter_id: Uuid,
        request_id: Uuid,
    ) -> Result<ExporterQuoteRequestDetail, AppError> {
        let request = self.quote_repo
            .find_request_visible_to_exporter(&self.pool, exporter_id, request_id)
            .await?
            .ok_or(AppError::NotFound(Resource::QuoteRequest))?;

        let product = self.product_repo
            .find_by_id(&self.pool, request.product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        let product_images = self.product_repo.list_images(&self.pool, product.id).await?;

        let requester_name = self.user_repo
            .find_profile_by_id(&self.pool, request.requested_by_id)
            .await?
            .map(|profile| profile.name)
            .unwrap_or_default();

        let my_quotes = self.quote_repo
            .list_quotes_by_creator(&self.pool, request.id, exporter_id)
            .await?;

        Ok(ExporterQuoteRequestDetail {
            request,
            product,
            product_images,
            requester_name,
            my_quotes,
        })
    }

    /// Envia uma cotação e conclui o pedido (mesma transação).
    pub async fn submit_quote(
        &self,
        exporter_id: Uuid,
        request_id: Uuid,
        fields: &QuoteFields,
    ) -> Result<Quote, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = self.quote_repo
            .find_request_visible_to_exporter(&mut *tx, exporter_id, request_id)
            .await?
            .ok_or(AppError::NotFound(Resource::QuoteRequest))?;

        let quote = self.quote_repo
            .create_quote(&mut *tx, request.id, exporter_id, fields, QuoteStatus::Submitted)
            .await?;

        self.quote_repo
            .set_request_status(&mut *tx, request.id, QuoteRequestStatus::Completed)
            .await?;

        tx.commit().await?;

        tracing::info!(quote_id = %quote.id, request_id = %request.id, "💰 Cotação enviada");
        Ok(quote)
    }

    pub async fn update_quote(
        &self,
        exporter_id: Uuid,
        quote_id: Uuid,
        fields: &QuoteFields,
    ) -> Result<Quote, AppError> {
        self.quote_repo
            .update_quote(&self.pool, exporter_id, quote_id, fields)
            .await?
            .ok_or(AppError::NotFound(Resource::Quote))
    }

    pub async fn delete_quote(&self, exporter_id: Uuid, quote_id: Uuid) -> Result<(), AppError> {
        let deleted = self.quote_repo.delete_quote(&self.pool, exporter_id, quote_id).await?;
        if !deleted {
            return Err(AppError::NotFound(Resource::Quote));
        }
        tracing::info!(quote_id = %quote_id, "cotação excluída");
        Ok(())
    }
}
