// src/db/quote_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{
        Quote, QuoteFields, QuoteRequest, QuoteRequestListEntry, QuoteRequestStatus, QuoteStatus,
    },
};

// Colunas comuns das listagens de pedidos (produto + solicitante + nº de cotações)
const REQUEST_LIST_SELECT: &str = r#"
    SELECT
        qr.id, qr.product_id, qr.status, qr.notes, qr.assigned_to_id, qr.created_at,
        p.name AS product_name,
        p.category AS product_category,
        requester.name AS requester_name,
        (SELECT COUNT(*) FROM quotes q WHERE q.quote_request_id = qr.id) AS quote_count
    FROM quote_requests qr
    JOIN products p ON p.id = qr.product_id
    JOIN profiles requester ON requester.id = qr.requested_by_id
"#;

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PEDIDOS DE COTAÇÃO
    // =========================================================================

    pub async fn create_request<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        requested_by_id: Uuid,
        assigned_to_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<QuoteRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, QuoteRequest>(
            r#"
            INSERT INTO quote_requests (product_id, requested_by_id, assigned_to_id, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(requested_by_id)
        .bind(assigned_to_id)
        .bind(QuoteRequestStatus::Pending)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    /// Pedidos do importador, mais novos primeiro. `limit = None` traz todos.
    pub async fn list_for_importer<'e, E>(
        &self,
        executor: E,
        requested_by_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<QuoteRequestListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{} WHERE qr.requested_by_id = $1 ORDER BY qr.created_at DESC LIMIT $2",
            REQUEST_LIST_SELECT
        );

        let requests = sqlx::query_as::<_, QuoteRequestListEntry>(&sql)
            .bind(requested_by_id)
            .bind(limit)
            .fetch_all(executor)
            .await?;

        Ok(requests)
    }

    /// Pedidos abertos a todos os exportadores ou atribuídos a este.
    pub async fn list_visible_to_exporter<'e, E>(
        &self,
        executor: E,
        exporter_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<QuoteRequestListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{} WHERE (qr.assigned_to_id IS NULL OR qr.assigned_to_id = $1) \
             ORDER BY qr.created_at DESC LIMIT $2",
            REQUEST_LIST_SELECT
        );

        let requests = sqlx::query_as::<_, QuoteRequestListEntry>(&sql)
            .bind(exporter_id)
            .bind(limit)
            .fetch_all(executor)
            .await?;

        Ok(requests)
    }

    pub async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<QuoteRequest>, AppError> {
        let requests = sqlx::query_as::<_, QuoteRequest>(
            "SELECT * FROM quote_requests WHERE product_id = $1 ORDER BY created_at DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn find_request_for_importer<'e, E>(
        &self,
        executor: E,
        requested_by_id: Uuid,
        request_id: Uuid,
    ) -> Result<Option<QuoteRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, QuoteRequest>(
            "SELECT * FROM quote_requests WHERE id = $1 AND requested_by_id = $2",
        )
        .bind(request_id)
        .bind(requested_by_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn find_request_visible_to_exporter<'e, E>(
        &self,
        executor: E,
        exporter_id: Uuid,
        request_id: Uuid,
    ) -> Result<Option<QuoteRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, QuoteRequest>(
            r#"
            SELECT * FROM quote_requests
            WHERE id = $1 AND (assigned_to_id IS NULL OR assigned_to_id = $2)
            "#,
        )
        .bind(request_id)
        .bind(exporter_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn set_request_status<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        status: QuoteRequestStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE quote_requests SET status = $2, updated_at = now() WHERE id = $1")
            .bind(request_id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn count_for_importer<'e, E>(&self, executor: E, requested_by_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quote_requests WHERE requested_by_id = $1",
        )
        .bind(requested_by_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn count_open_visible_to_exporter<'e, E>(
        &self,
        executor: E,
        exporter_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM quote_requests
            WHERE (assigned_to_id IS NULL OR assigned_to_id = $1)
              AND status IN ('pending', 'in_progress')
            "#,
        )
        .bind(exporter_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    // =========================================================================
    //  COTAÇÕES
    // =========================================================================

    pub async fn create_quote<'e, E>(
        &self,
        executor: E,
        quote_request_id: Uuid,
        created_by_id: Uuid,
        fields: &QuoteFields,
        status: QuoteStatus,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                quote_request_id, created_by_id, factory_name, factory_location, incoterm,
                price_per_unit_usd, moq, available_stock, lead_time_days,
                competitor_links, certifications, remarks, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(quote_request_id)
        .bind(created_by_id)
        .bind(&fields.factory_name)
        .bind(&fields.factory_location)
        .bind(fields.incoterm)
        .bind(fields.price_per_unit_usd)
        .bind(fields.moq)
        .bind(fields.available_stock)
        .bind(fields.lead_time_days)
        .bind(&fields.competitor_links)
        .bind(&fields.certifications)
        .bind(&fields.remarks)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    /// Atualiza apenas cotações do próprio exportador.
    pub async fn update_quote<'e, E>(
        &self,
        executor: E,
        created_by_id: Uuid,
        quote_id: Uuid,
        fields: &QuoteFields,
    ) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET factory_name = $3,
                factory_location = $4,
                incoterm = $5,
                price_per_unit_usd = $6,
                moq = $7,
                available_stock = $8,
                lead_time_days = $9,
                competitor_links = $10,
                certifications = $11,
                remarks = $12,
                status = $13,
                updated_at = now()
            WHERE id = $1 AND created_by_id = $2
            RETURNING *
            "#,
        )
        .bind(quote_id)
        .bind(created_by_id)
        .bind(&fields.factory_name)
        .bind(&fields.factory_location)
        .bind(fields.incoterm)
        .bind(fields.price_per_unit_usd)
        .bind(fields.moq)
        .bind(fields.available_stock)
        .bind(fields.lead_time_days)
        .bind(&fields.competitor_links)
        .bind(&fields.certifications)
        .bind(&fields.remarks)
        .bind(QuoteStatus::Submitted)
        .fetch_optional(executor)
        .await?;

        Ok(quote)
    }

    pub async fn delete_quote<'e, E>(
        &self,
        executor: E,
        created_by_id: Uuid,
        quote_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1 AND created_by_id = $2")
            .bind(quote_id)
            .bind(created_by_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_quotes_for_request<'e, E>(
        &self,
        executor: E,
        quote_request_id: Uuid,
    ) -> Result<Vec<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE quote_request_id = $1 ORDER BY price_per_unit_usd ASC",
        )
        .bind(quote_request_id)
        .fetch_all(executor)
        .await?;

        Ok(quotes)
    }

    pub async fn list_quotes_by_creator<'e, E>(
        &self,
        executor: E,
        quote_request_id: Uuid,
        created_by_id: Uuid,
    ) -> Result<Vec<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT * FROM quotes
            WHERE quote_request_id = $1 AND created_by_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(quote_request_id)
        .bind(created_by_id)
        .fetch_all(executor)
        .await?;

        Ok(quotes)
    }

    pub async fn count_quotes_by_creator<'e, E>(&self, executor: E, created_by_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE created_by_id = $1")
            .bind(created_by_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_quotes_received<'e, E>(&self, executor: E, requested_by_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM quotes q
            JOIN quote_requests qr ON qr.id = q.quote_request_id
            WHERE qr.requested_by_id = $1
            "#,
        )
        .bind(requested_by_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Cotação que responde a um pedido do importador (dono da simulação).
    pub async fn find_quote_for_importer<'e, E>(
        &self,
        executor: E,
        requested_by_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT q.*
            FROM quotes q
            JOIN quote_requests qr ON qr.id = q.quote_request_id
            WHERE q.id = $1 AND qr.requested_by_id = $2
            "#,
        )
        .bind(quote_id)
        .bind(requested_by_id)
        .fetch_optional(executor)
        .await?;

        Ok(quote)
    }
}
