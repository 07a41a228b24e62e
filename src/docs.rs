// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,

        // --- Products ---
        handlers::products::list_categories,
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product_image,
        handlers::products::set_main_image,

        // --- Uploads ---
        handlers::uploads::upload_product_image,

        // --- Quote Requests ---
        handlers::quote_requests::list_exporters,
        handlers::quote_requests::create_quote_request,
        handlers::quote_requests::list_quote_requests,
        handlers::quote_requests::get_quote_request,

        // --- Exporter ---
        handlers::exporter::list_requests,
        handlers::exporter::get_request,
        handlers::exporter::create_quote,
        handlers::exporter::update_quote,
        handlers::exporter::delete_quote,

        // --- Cost Simulation ---
        handlers::simulations::list_simulations,
        handlers::simulations::create_simulation,

        // --- Dashboard ---
        handlers::dashboard::importer_dashboard,
        handlers::dashboard::exporter_dashboard,

        // --- Navigation ---
        handlers::navigation::resolve_navigation,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::AppRole,
            models::auth::Profile,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CurrentSession,

            // --- Products ---
            models::product::ProductStatus,
            models::product::Product,
            models::product::ProductImage,
            models::product::ProductImageInput,
            models::product::ProductListEntry,
            models::product::ProductWithImages,
            models::product::ProductDetail,
            handlers::products::ProductPayload,

            // --- Storage ---
            models::storage::StoredFile,

            // --- Quotes ---
            models::quote::QuoteRequestStatus,
            models::quote::QuoteStatus,
            models::quote::Incoterm,
            models::quote::QuoteRequest,
            models::quote::Quote,
            models::quote::RankedQuote,
            models::quote::QuoteRequestListEntry,
            models::quote::ImporterQuoteRequestDetail,
            models::quote::ExporterQuoteRequestDetail,
            handlers::quote_requests::CreateQuoteRequestPayload,
            handlers::exporter::QuotePayload,

            // --- Simulation ---
            models::simulation::QuoteCostSimulation,
            models::simulation::CostBreakdown,
            models::simulation::SimulationCreated,
            models::simulation::SimulationHistory,
            handlers::simulations::SimulationPayload,

            // --- Dashboard ---
            models::dashboard::ImporterDashboard,
            models::dashboard::ExporterDashboard,

            // --- Navigation ---
            models::navigation::View,
            models::navigation::GateOutcome,
            models::navigation::NavigationResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Sessão do Usuário"),
        (name = "Products", description = "Produtos e Imagens do Importador"),
        (name = "Uploads", description = "Armazenamento de Imagens"),
        (name = "Quote Requests", description = "Pedidos de Cotação do Importador"),
        (name = "Exporter", description = "Pedidos e Cotações do Exportador"),
        (name = "Cost Simulation", description = "Simulação de Custo de Importação"),
        (name = "Dashboard", description = "Indicadores por Papel"),
        (name = "Navigation", description = "Resolução de Telas e Guardião por Papel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
