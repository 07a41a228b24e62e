// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{non_empty, validate_category, validate_not_blank, validate_target_price},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ImporterOnly, RequireRole},
    },
    models::product::{
        ProductDetail, ProductFields, ProductImage, ProductImageInput, ProductListEntry,
        ProductWithImages,
    },
};

// ---
// Payload: criação e edição de produto
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    pub internal_code: Option<String>,
    pub reference_link: Option<String>,

    #[validate(custom(function = "validate_target_price"))]
    pub target_price_usd: Option<Decimal>,

    pub description: Option<String>,
    pub usage_notes: Option<String>,

    #[serde(default)]
    pub images: Vec<ProductImageInput>,
}

impl ProductPayload {
    fn into_parts(self) -> (ProductFields, Vec<ProductImageInput>) {
        let fields = ProductFields {
            name: self.name.trim().to_string(),
            category: self.category,
            internal_code: non_empty(self.internal_code),
            reference_link: non_empty(self.reference_link),
            target_price_usd: self.target_price_usd,
            description: non_empty(self.description),
            usage_notes: non_empty(self.usage_notes),
        };

        // URLs em branco são descartadas
        let images = self.images
            .into_iter()
            .filter(|img| !img.url.trim().is_empty())
            .collect();

        (fields, images)
    }
}

#[utoipa::path(
    get,
    path = "/api/importer/categories",
    tag = "Products",
    responses(
        (status = 200, description = "Categorias disponíveis", body = Vec<String>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    _guard: RequireRole<ImporterOnly>,
) -> impl IntoResponse {
    Json(app_state.product_service.categories())
}

#[utoipa::path(
    get,
    path = "/api/importer/products",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos do importador, mais novos primeiro", body = Vec<ProductListEntry>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Apenas importadores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state.product_service
        .list_products(user.profile_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/importer/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto cadastrado", body = ProductWithImages),
        (status = 400, description = "Dados inválidos")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (fields, images) = payload.into_parts();

    let product = app_state.product_service
        .create_product(user.profile_id(), &fields, images)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/importer/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Produto com imagens e pedidos de cotação", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state.product_service
        .product_detail(user.profile_id(), product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/importer/products/{id}",
    tag = "Products",
    request_body = ProductPayload,
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Produto atualizado (imagens substituídas)", body = ProductWithImages),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (fields, images) = payload.into_parts();

    let product = app_state.product_service
        .update_product(user.profile_id(), product_id, &fields, images)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/importer/products/{id}/images/{image_id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("image_id" = Uuid, Path, description = "ID da imagem")
    ),
    responses(
        (status = 200, description = "Imagens restantes", body = Vec<ProductImage>),
        (status = 404, description = "Produto ou imagem não encontrados")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_product_image(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path((product_id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let images = app_state.product_service
        .delete_image(user.profile_id(), product_id, image_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(images))
}

#[utoipa::path(
    put,
    path = "/api/importer/products/{id}/images/{image_id}/main",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("image_id" = Uuid, Path, description = "ID da imagem")
    ),
    responses(
        (status = 200, description = "Imagens com a nova principal", body = Vec<ProductImage>),
        (status = 404, description = "Produto ou imagem não encontrados")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn set_main_image(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ImporterOnly>,
    Path((product_id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let images = app_state.product_service
        .set_main_image(user.profile_id(), product_id, image_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(images))
}
