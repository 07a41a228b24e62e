// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ExporterOnly, ImporterOnly, RequireRole},
    },
    models::dashboard::{ExporterDashboard, ImporterDashboard},
};

#[utoipa::path(
    get,
    path = "/api/importer/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais e pedidos recentes do importador", body = ImporterDashboard),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Apenas importadores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn importer_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.dashboard_service
        .importer_summary(user.profile_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/exporter/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Pedidos pendentes, cotações enviadas e pedidos recentes", body = ExporterDashboard),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Apenas exportadores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn exporter_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ExporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.dashboard_service
        .exporter_summary(user.profile_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
