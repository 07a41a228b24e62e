// src/db/product_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductFields, ProductImage, ProductListEntry},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        fields: &ProductFields,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                owner_id, name, category, internal_code, reference_link,
                target_price_usd, description, usage_notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(&fields.internal_code)
        .bind(&fields.reference_link)
        .bind(fields.target_price_usd)
        .bind(&fields.description)
        .bind(&fields.usage_notes)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    /// Atualiza apenas se o produto pertencer ao importador.
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        product_id: Uuid,
        fields: &ProductFields,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $3,
                category = $4,
                internal_code = $5,
                reference_link = $6,
                target_price_usd = $7,
                description = $8,
                usage_notes = $9,
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(&fields.internal_code)
        .bind(&fields.reference_link)
        .bind(fields.target_price_usd)
        .bind(&fields.description)
        .bind(&fields.usage_notes)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    pub async fn find_owned<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND owner_id = $2",
        )
        .bind(product_id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    /// Lista os produtos do importador, mais novos primeiro, com a imagem principal.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ProductListEntry>, AppError> {
        let products = sqlx::query_as::<_, ProductListEntry>(
            r#"
            SELECT
                p.*,
                (
                    SELECT i.url FROM product_images i
                    WHERE i.product_id = p.id AND i.is_main
                    LIMIT 1
                ) AS main_image_url
            FROM products p
            WHERE p.owner_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn count_by_owner<'e, E>(&self, executor: E, owner_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Primeiro pedido de cotação: 'draft' → 'sent_for_quote'. Outros status ficam como estão.
    pub async fn mark_sent_for_quote<'e, E>(&self, executor: E, product_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET status = 'sent_for_quote', updated_at = now()
            WHERE id = $1 AND status = 'draft'
            "#,
        )
        .bind(product_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  IMAGENS
    // =========================================================================

    pub async fn list_images<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<ProductImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT * FROM product_images WHERE product_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;

        Ok(images)
    }

    pub async fn delete_images<'e, E>(&self, executor: E, product_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_image<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        url: &str,
        is_main: bool,
    ) -> Result<ProductImage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // clock_timestamp(): dentro da mesma transação now() é constante,
        // e a ordem de envio das imagens precisa ser preservada.
        let image = sqlx::query_as::<_, ProductImage>(
            r#"
            INSERT INTO product_images (product_id, url, is_main, created_at)
            VALUES ($1, $2, $3, clock_timestamp())
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(url)
        .bind(is_main)
        .fetch_one(executor)
        .await?;

        Ok(image)
    }

    pub async fn delete_image<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<ProductImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image = sqlx::query_as::<_, ProductImage>(
            "DELETE FROM product_images WHERE id = $1 AND product_id = $2 RETURNING *",
        )
        .bind(image_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(image)
    }

    /// Marca uma única imagem como principal e desmarca as demais.
    pub async fn set_main_image<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE product_images SET is_main = (id = $2) WHERE product_id = $1",
        )
        .bind(product_id)
        .bind(image_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
