// src/models/quote.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::product::{Product, ProductImage};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteRequestStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Submitted,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incoterm", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    Exw,
    Fob,
    Cif,
    Ddp,
}

// --- Pedido de cotação ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub product_id: Uuid,
    pub requested_by_id: Uuid,
    // None = aberto para todos os exportadores
    pub assigned_to_id: Option<Uuid>,
    pub status: QuoteRequestStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Cotação ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub quote_request_id: Uuid,
    pub created_by_id: Uuid,
    #[schema(example = "Shenzhen Audio Co.")]
    pub factory_name: String,
    #[schema(example = "Shenzhen, Guangdong")]
    pub factory_location: Option<String>,
    pub incoterm: Option<Incoterm>,
    #[schema(example = "2.50")]
    pub price_per_unit_usd: Decimal,
    #[schema(example = 1000)]
    pub moq: i32,
    pub available_stock: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub competitor_links: Option<String>,
    pub certifications: Option<String>,
    pub remarks: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cotação com a marcação de "melhor preço" (visão do importador)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedQuote {
    #[serde(flatten)]
    pub quote: Quote,
    pub best_price: bool,
}

// Campos de uma cotação enviados pelo exportador
#[derive(Debug, Clone)]
pub struct QuoteFields {
    pub factory_name: String,
    pub factory_location: Option<String>,
    pub incoterm: Option<Incoterm>,
    pub price_per_unit_usd: Decimal,
    pub moq: i32,
    pub available_stock: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub competitor_links: Option<String>,
    pub certifications: Option<String>,
    pub remarks: Option<String>,
}

// --- Linhas de listagem (com joins) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestListEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub status: QuoteRequestStatus,
    pub notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub product_category: String,
    pub requester_name: String,
    pub quote_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImporterQuoteRequestDetail {
    #[serde(flatten)]
    pub request: QuoteRequest,
    pub product: Product,
    pub assigned_to_name: Option<String>,
    pub quotes: Vec<RankedQuote>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExporterQuoteRequestDetail {
    #[serde(flatten)]
    pub request: QuoteRequest,
    pub product: Product,
    pub product_images: Vec<ProductImage>,
    pub requester_name: String,
    pub my_quotes: Vec<Quote>,
}
