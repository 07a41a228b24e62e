// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{ProductRepository, QuoteRepository, SimulationRepository, UserRepository},
    services::{
        auth::AuthService, DashboardService, ProductService, QuoteService, SimulationService,
        StorageService,
    },
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, sync::Arc, time::Duration};

// Configurações lidas do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    // Quando true, simulações abaixo do MOQ são recusadas
    pub enforce_moq: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let enforce_moq = match lookup("SIMULATION_ENFORCE_MOQ") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("SIMULATION_ENFORCE_MOQ inválido: {}", raw))?,
            None => false,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string()).into(),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            enforce_moq,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub quote_service: QuoteService,
    pub simulation_service: SimulationService,
    pub dashboard_service: DashboardService,
    pub storage_service: StorageService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(db_pool, settings))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_parts(db_pool: PgPool, settings: Settings) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());
        let simulation_repo = SimulationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            settings.jwt_secret.clone(),
            db_pool.clone(),
        );
        let product_service = ProductService::new(
            product_repo.clone(),
            quote_repo.clone(),
            db_pool.clone(),
        );
        let quote_service = QuoteService::new(
            quote_repo.clone(),
            product_repo.clone(),
            user_repo,
            db_pool.clone(),
        );
        let simulation_service = SimulationService::new(
            quote_repo.clone(),
            simulation_repo,
            db_pool.clone(),
            settings.enforce_moq,
        );
        let dashboard_service = DashboardService::new(product_repo, quote_repo, db_pool.clone());
        let storage_service = StorageService::new(
            settings.upload_dir.clone(),
            &settings.public_base_url,
        );

        Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            product_service,
            quote_service,
            simulation_service,
            dashboard_service,
            storage_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_optional_vars_are_missing() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cotaimport"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(settings.public_base_url, "http://localhost:3000");
        assert!(!settings.enforce_moq);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = Settings::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_moq_flag_parsing() {
        let base = [("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "s")];

        let on = Settings::from_lookup(lookup_from(&[base[0], base[1], ("SIMULATION_ENFORCE_MOQ", "true")])).unwrap();
        assert!(on.enforce_moq);

        let bad = Settings::from_lookup(lookup_from(&[base[0], base[1], ("SIMULATION_ENFORCE_MOQ", "talvez")]));
        assert!(bad.is_err());
    }
}
