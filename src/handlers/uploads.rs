// src/handlers/uploads.rs

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ImporterOnly, RequireRole},
    },
    models::storage::{StoredFile, UploadQuery},
};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/api/uploads/product-images",
    tag = "Uploads",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Bytes da imagem", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Imagem armazenada", body = StoredFile),
        (status = 400, description = "Arquivo vazio ou não é imagem"),
        (status = 413, description = "Arquivo maior que 10 MiB")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn upload_product_image(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let stored = app_state.storage_service
        .store_product_image(user.profile_id(), query.filename.as_deref(), content_type, &body)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(stored)))
}
