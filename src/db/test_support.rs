// src/db/test_support.rs
//
// Testes que precisam de um Postgres real. Sem TEST_DATABASE_URL eles são pulados.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    config::{AppState, Settings},
    db::UserRepository,
    models::{
        auth::{AppRole, Profile},
        product::{ProductFields, ProductImageInput, ProductWithImages},
        quote::{Quote, QuoteFields, QuoteRequest},
    },
};

pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL não definida: teste de banco pulado");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("conexão com o banco de teste");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("migrações no banco de teste");

    Some(pool)
}

pub async fn test_state() -> Option<AppState> {
    let pool = test_pool().await?;
    let settings = Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".into(),
        upload_dir: std::env::temp_dir().join("cotaimport-db-test"),
        public_base_url: "http://localhost:3000".into(),
        enforce_moq: false,
    };
    Some(AppState::from_parts(pool, settings))
}

/// E-mail único por execução, para os testes não colidirem no mesmo banco.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@teste.com", Uuid::new_v4())
}

// Cria usuário e perfil direto no repositório (sem bcrypt).
pub async fn seed_profile(pool: &PgPool, role: AppRole, name: &str) -> Profile {
    let repo = UserRepository::new(pool.clone());
    let user = repo
        .create_user(pool, &unique_email(name), "hash-de-teste")
        .await
        .expect("usuário de teste");
    repo.create_profile(pool, user.id, name, role)
        .await
        .expect("perfil de teste")
}

pub async fn seed_product(state: &AppState, owner_id: Uuid, image_urls: &[&str]) -> ProductWithImages {
    let fields = ProductFields {
        name: "Fone Bluetooth".into(),
        category: "Eletrônicos".into(),
        internal_code: None,
        reference_link: None,
        target_price_usd: None,
        description: None,
        usage_notes: None,
    };
    let images = image_urls
        .iter()
        .map(|url| ProductImageInput { url: url.to_string(), is_main: false })
        .collect();

    state.product_service
        .create_product(owner_id, &fields, images)
        .await
        .expect("produto de teste")
}

pub async fn seed_request(
    state: &AppState,
    importer_id: Uuid,
    product_id: Uuid,
    assigned_to_id: Option<Uuid>,
) -> QuoteRequest {
    state.quote_service
        .create_request(importer_id, product_id, assigned_to_id, None)
        .await
        .expect("pedido de teste")
}

pub fn quote_fields(price: &str, moq: i32) -> QuoteFields {
    QuoteFields {
        factory_name: "Shenzhen Audio".into(),
        factory_location: None,
        incoterm: None,
        price_per_unit_usd: price.parse().expect("preço de teste"),
        moq,
        available_stock: None,
        lead_time_days: None,
        competitor_links: None,
        certifications: None,
        remarks: None,
    }
}

pub async fn seed_quote(state: &AppState, exporter_id: Uuid, request_id: Uuid, price: &str) -> Quote {
    state.quote_service
        .submit_quote(exporter_id, request_id, &quote_fields(price, 100))
        .await
        .expect("cotação de teste")
}
