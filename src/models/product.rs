// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::quote::QuoteRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    SentForQuote,
    // Nenhum fluxo marca o produto como cotado automaticamente.
    Quoted,
}

// Categorias oferecidas no formulário de produto
pub const PRODUCT_CATEGORIES: [&str; 9] = [
    "Eletrônicos",
    "Têxteis",
    "Móveis",
    "Brinquedos",
    "Automotivo",
    "Casa e Decoração",
    "Ferramentas",
    "Embalagens",
    "Outros",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[schema(example = "Fone Bluetooth TWS")]
    pub name: String,
    #[schema(example = "FN-001")]
    pub internal_code: Option<String>,
    #[schema(example = "Eletrônicos")]
    pub category: String,
    pub reference_link: Option<String>,
    #[schema(example = "4.50")]
    pub target_price_usd: Option<Decimal>,
    pub description: Option<String>,
    pub usage_notes: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
}

// Imagem enviada no formulário (antes de existir no banco)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageInput {
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
}

// Linha da listagem: produto + URL da imagem principal
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithImages {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub quote_requests: Vec<QuoteRequest>,
}

// Campos editáveis de um produto (já limpos pelo handler)
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub category: String,
    pub internal_code: Option<String>,
    pub reference_link: Option<String>,
    pub target_price_usd: Option<Decimal>,
    pub description: Option<String>,
    pub usage_notes: Option<String>,
}
