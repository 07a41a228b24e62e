// src/models/navigation.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::AppRole;

// Telas do aplicativo, identificadas a partir do caminho
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum View {
    Entry,
    Login,
    ImporterDashboard,
    ImporterProducts,
    ImporterProductNew,
    ImporterProductDetail(String),
    ImporterProductEdit(String),
    ImporterQuoteRequests,
    ImporterQuoteRequestNew,
    ImporterQuoteRequestDetail(String),
    ImporterCostSimulation(String),
    ExporterDashboard,
    ExporterQuoteRequests,
    ExporterQuoteRequestDetail(String),
    NotFound,
}

impl View {
    /// Papel exigido pela tela; None para telas públicas.
    pub fn required_role(&self) -> Option<AppRole> {
        match self {
            View::Entry | View::Login | View::NotFound => None,
            View::ImporterDashboard
            | View::ImporterProducts
            | View::ImporterProductNew
            | View::ImporterProductDetail(_)
            | View::ImporterProductEdit(_)
            | View::ImporterQuoteRequests
            | View::ImporterQuoteRequestNew
            | View::ImporterQuoteRequestDetail(_)
            | View::ImporterCostSimulation(_) => Some(AppRole::Importer),
            View::ExporterDashboard
            | View::ExporterQuoteRequests
            | View::ExporterQuoteRequestDetail(_) => Some(AppRole::Exporter),
        }
    }
}

// Estado da sessão do lado do cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated { profile_id: Uuid, role: AppRole },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    Wait,
    Render,
    Redirect { location: String },
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Caminho solicitado, ex.: /importer/products
    pub path: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub path: String,
    pub view: View,
    pub decision: GateOutcome,
}
