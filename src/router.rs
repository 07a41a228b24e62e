// src/router.rs

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    common::error::{ApiError, AppError, Resource},
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, i18n::Locale},
    services::storage_service::PUBLIC_PREFIX,
};

async fn not_found(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    AppError::NotFound(Resource::Route).to_api_error(&locale, &app_state.i18n_store)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let importer_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::importer_dashboard))
        .route("/categories", get(handlers::products::list_categories))
        .route("/products"
               ,get(handlers::products::list_products)
               .post(handlers::products::create_product)
        )
        .route("/products/{id}"
               ,get(handlers::products::get_product)
               .put(handlers::products::update_product)
        )
        .route("/products/{id}/images/{image_id}", delete(handlers::products::delete_product_image))
        .route("/products/{id}/images/{image_id}/main", put(handlers::products::set_main_image))
        .route("/exporters", get(handlers::quote_requests::list_exporters))
        .route("/quote-requests"
               ,get(handlers::quote_requests::list_quote_requests)
               .post(handlers::quote_requests::create_quote_request)
        )
        .route("/quote-requests/{id}", get(handlers::quote_requests::get_quote_request))
        .route("/quotes/{id}/simulations"
               ,get(handlers::simulations::list_simulations)
               .post(handlers::simulations::create_simulation)
        )
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let exporter_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::exporter_dashboard))
        .route("/quote-requests", get(handlers::exporter::list_requests))
        .route("/quote-requests/{id}", get(handlers::exporter::get_request))
        .route("/quote-requests/{id}/quotes", post(handlers::exporter::create_quote))
        .route("/quotes/{id}"
               ,put(handlers::exporter::update_quote)
               .delete(handlers::exporter::delete_quote)
        )
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let upload_routes = Router::new()
        .route("/product-images", post(handlers::uploads::upload_product_image))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
        .layer(DefaultBodyLimit::max(handlers::uploads::MAX_UPLOAD_BYTES));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let storage_dir = ServeDir::new(app_state.storage_service.root());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(openapi_json))
        .route("/api/navigation", get(handlers::navigation::resolve_navigation))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/importer", importer_routes)
        .nest("/api/exporter", exporter_routes)
        .nest("/api/uploads", upload_routes)
        .nest_service(PUBLIC_PREFIX, storage_dir)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
