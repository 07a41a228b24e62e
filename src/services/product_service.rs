// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{ProductRepository, QuoteRepository},
    models::product::{
        Product, ProductDetail, ProductFields, ProductImage, ProductImageInput,
        ProductListEntry, ProductWithImages, PRODUCT_CATEGORIES,
    },
};

/// Garante exatamente uma imagem principal quando a lista não está vazia.
/// Sem nenhuma marcada, a primeira vira principal; com várias, só a primeira
/// marcada continua.
pub fn normalize_images(images: Vec<ProductImageInput>) -> Vec<ProductImageInput> {
    let main_index = images.iter().position(|img| img.is_main).unwrap_or(0);

    images
        .into_iter()
        .enumerate()
        .map(|(index, img)| ProductImageInput { is_main: index == main_index, ..img })
        .collect()
}

/// Decide qual imagem promover depois de uma remoção.
/// `remaining` deve vir na ordem de envio (mais antiga primeiro).
pub fn promotion_after_removal(removed: &ProductImage, remaining: &[ProductImage]) -> Option<Uuid> {
    if !removed.is_main || remaining.iter().any(|img| img.is_main) {
        return None;
    }
    remaining.first().map(|img| img.id)
}

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    quote_repo: QuoteRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, quote_repo: QuoteRepository, pool: PgPool) -> Self {
        Self { product_repo, quote_repo, pool }
    }

    pub fn categories(&self) -> Vec<&'static str> {
        PRODUCT_CATEGORIES.to_vec()
    }

    pub async fn list_products(&self, owner_id: Uuid) -> Result<Vec<ProductListEntry>, AppError> {
        self.product_repo.list_by_owner(owner_id).await
    }

    pub async fn create_product(
        &self,
        owner_id: Uuid,
        fields: &ProductFields,
        images: Vec<ProductImageInput>,
    ) -> Result<ProductWithImages, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self.product_repo.create_product(&mut *tx, owner_id, fields).await?;

        let mut stored = Vec::with_capacity(images.len());
        for img in normalize_images(images) {
            stored.push(
                self.product_repo
                    .insert_image(&mut *tx, product.id, &img.url, img.is_main)
                    .await?,
            );
        }

        tx.commit().await?;

        tracing::info!(product_id = %product.id, images = stored.len(), "📦 Produto cadastrado");
        Ok(ProductWithImages { product, images: stored })
    }

    /// Atualiza os campos e substitui o conjunto de imagens.
    pub async fn update_product(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        fields: &ProductFields,
        images: Vec<ProductImageInput>,
    ) -> Result<ProductWithImages, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self.product_repo
            .update_product(&mut *tx, owner_id, product_id, fields)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        self.product_repo.delete_images(&mut *tx, product.id).await?;

        let mut stored = Vec::with_capacity(images.len());
        for img in normalize_images(images) {
            stored.push(
                self.product_repo
                    .insert_image(&mut *tx, product.id, &img.url, img.is_main)
                    .await?,
            );
        }

        tx.commit().await?;

        tracing::info!(product_id = %product.id, "produto atualizado");
        Ok(ProductWithImages { product, images: stored })
    }

    async fn owned(&self, owner_id: Uuid, product_id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_owned(&self.pool, owner_id, product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))
    }

    pub async fn product_detail(&self, owner_id: Uuid, product_id: Uuid) -> Result<ProductDetail, AppError> {
        let product = self.owned(owner_id, product_id).await?;
        let images = self.product_repo.list_images(&self.pool, product.id).await?;
        let quote_requests = self.quote_repo.list_by_product(product.id).await?;

        Ok(ProductDetail { product, images, quote_requests })
    }

    /// Remove a imagem; se era a principal, a mais antiga restante assume.
    pub async fn delete_image(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<Vec<ProductImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self.product_repo
            .find_owned(&mut *tx, owner_id, product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        let removed = self.product_repo
            .delete_image(&mut *tx, product.id, image_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Image))?;

        let mut remaining = self.product_repo.list_images(&mut *tx, product.id).await?;

        if let Some(promoted_id) = promotion_after_removal(&removed, &remaining) {
            self.product_repo.set_main_image(&mut *tx, product.id, promoted_id).await?;
            for img in remaining.iter_mut() {
                img.is_main = img.id == promoted_id;
            }
            tracing::debug!(image_id = %promoted_id, "imagem promovida a principal");
        }

        tx.commit().await?;
        Ok(remaining)
    }

    pub async fn set_main_image(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<Vec<ProductImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self.product_repo
            .find_owned(&mut *tx, owner_id, product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        let images = self.product_repo.list_images(&mut *tx, product.id).await?;
        if !images.iter().any(|img| img.id == image_id) {
            return Err(AppError::NotFound(Resource::Image));
        }

        self.product_repo.set_main_image(&mut *tx, product.id, image_id).await?;
        tx.commit().await?;

        Ok(images
            .into_iter()
            .map(|img| ProductImage { is_main: img.id == image_id, ..img })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_product, seed_profile, test_state};
    use crate::models::auth::AppRole;
    use chrono::{Duration, Utc};

    fn input(url: &str, is_main: bool) -> ProductImageInput {
        ProductImageInput { url: url.into(), is_main }
    }

    fn mains(images: &[ProductImageInput]) -> Vec<&str> {
        images.iter().filter(|i| i.is_main).map(|i| i.url.as_str()).collect()
    }

    fn mains_of(images: &[ProductImage]) -> Vec<&str> {
        images.iter().filter(|i| i.is_main).map(|i| i.url.as_str()).collect()
    }

    fn stored(url: &str, is_main: bool, age_minutes: i64) -> ProductImage {
        ProductImage {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            url: url.into(),
            is_main,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_first_image_becomes_main_when_none_flagged() {
        let images = normalize_images(vec![input("a.png", false), input("b.png", false)]);
        assert_eq!(mains(&images), vec!["a.png"]);
    }

    #[test]
    fn test_only_first_flagged_image_stays_main() {
        let images = normalize_images(vec![
            input("a.png", false),
            input("b.png", true),
            input("c.png", true),
        ]);
        assert_eq!(mains(&images), vec!["b.png"]);
        assert_eq!(images.len(), 3);
    }

    #[test]
    fn test_normalizing_keeps_order_and_urls() {
        let images = normalize_images(vec![input("a.png", false), input("b.png", true)]);
        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_empty_image_list_stays_empty() {
        assert!(normalize_images(Vec::new()).is_empty());
    }

    #[test]
    fn test_removing_main_of_two_promotes_the_other() {
        let main = stored("main.png", true, 10);
        let other = stored("other.png", false, 5);

        assert_eq!(promotion_after_removal(&main, &[other.clone()]), Some(other.id));
    }

    #[test]
    fn test_earliest_remaining_image_is_promoted() {
        let removed = stored("main.png", true, 30);
        let older = stored("older.png", false, 20);
        let newer = stored("newer.png", false, 1);

        assert_eq!(promotion_after_removal(&removed, &[older.clone(), newer]), Some(older.id));
    }

    #[test]
    fn test_removing_secondary_image_promotes_nothing() {
        let main = stored("main.png", true, 10);
        let secondary = stored("secondary.png", false, 5);

        assert_eq!(promotion_after_removal(&secondary, &[main]), None);
    }

    #[test]
    fn test_removing_last_image_promotes_nothing() {
        let main = stored("main.png", true, 10);
        assert_eq!(promotion_after_removal(&main, &[]), None);
    }

    // --- Com banco (TEST_DATABASE_URL) ---

    #[tokio::test]
    async fn test_deleting_main_image_persists_promotion() {
        let Some(state) = test_state().await else { return };
        let importer = seed_profile(&state.db_pool, AppRole::Importer, "importador").await;
        let created = seed_product(&state, importer.id, &["a.png", "b.png", "c.png"]).await;
        let product_id = created.product.id;

        let main = created.images.iter().find(|img| img.is_main).unwrap().clone();
        assert_eq!(main.url, "a.png");

        let returned = state.product_service
            .delete_image(importer.id, product_id, main.id)
            .await
            .unwrap();
        assert_eq!(mains_of(&returned), vec!["b.png"]);

        let detail = state.product_service.product_detail(importer.id, product_id).await.unwrap();
        assert_eq!(detail.images.len(), 2);
        assert_eq!(mains_of(&detail.images), vec!["b.png"]);
    }

    #[tokio::test]
    async fn test_set_main_image_is_persisted_for_owner_only() {
        let Some(state) = test_state().await else { return };
        let owner = seed_profile(&state.db_pool, AppRole::Importer, "importador").await;
        let stranger = seed_profile(&state.db_pool, AppRole::Importer, "outro-importador").await;
        let created = seed_product(&state, owner.id, &["a.png", "b.png"]).await;
        let product_id = created.product.id;
        let second = created.images.iter().find(|img| img.url == "b.png").unwrap().id;

        let result = state.product_service.set_main_image(stranger.id, product_id, second).await;
        assert!(matches!(result, Err(AppError::NotFound(Resource::Product))));

        state.product_service.set_main_image(owner.id, product_id, second).await.unwrap();

        let detail = state.product_service.product_detail(owner.id, product_id).await.unwrap();
        assert_eq!(mains_of(&detail.images), vec!["b.png"]);
    }
}
