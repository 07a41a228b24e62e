// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::quote::QuoteRequestListEntry;

// Cards e pedidos recentes do importador
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImporterDashboard {
    pub total_products: i64,
    pub quote_requests_sent: i64,
    pub quotes_received: i64,
    pub recent_requests: Vec<QuoteRequestListEntry>,
}

// Cards e pedidos recentes do exportador
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExporterDashboard {
    pub pending_requests: i64,
    pub quotes_submitted: i64,
    pub recent_requests: Vec<QuoteRequestListEntry>,
}
