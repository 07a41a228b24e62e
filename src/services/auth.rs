// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::UserRepository,
    middleware::auth::AuthenticatedUser,
    models::auth::{AppRole, AuthResponse, Claims, CurrentSession, Profile},
};

const TOKEN_TTL_DAYS: i64 = 7;

/// E-mails são gravados e comparados sem espaços e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: AppRole,
    ) -> Result<AuthResponse, AppError> {
        // 1. Hashing fora da transação (não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            ?;

        // --- INÍCIO DA TRANSAÇÃO ---
        // Usuário e perfil são criados na mesma transação.
        let mut tx = self.pool.begin().await?;

        let new_user = self.user_repo
            .create_user(&mut *tx, &normalize_email(email), &hashed_password)
            .await?;

        let profile = self.user_repo
            .create_profile(&mut *tx, new_user.id, name.trim(), role)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(profile_id = %profile.id, role = ?profile.role, "✅ Nova conta criada");

        let token = self.create_token(new_user.id, &profile)?;
        Ok(AuthResponse { token, profile })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self.user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let profile = self.user_repo
            .find_profile_by_user(user.id)
            .await?
            .ok_or(AppError::NotFound(Resource::Profile))?;

        let token = self.create_token(user.id, &profile)?;
        Ok(AuthResponse { token, profile })
    }

    /// Decodifica o token e carrega o perfil da sessão (recusa tokens revogados).
    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.decode_claims(token)?;

        let profile = self.user_repo
            .find_active_session_profile(claims.profile_id, claims.jti)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if profile.user_id != claims.sub {
            return Err(AppError::InvalidToken);
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            profile,
            token_id: claims.jti,
        })
    }

    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<(), AppError> {
        self.user_repo.revoke_token(user.token_id).await?;
        tracing::info!(profile_id = %user.profile.id, "sessão encerrada");
        Ok(())
    }

    pub async fn current_session(&self, user: &AuthenticatedUser) -> Result<CurrentSession, AppError> {
        let account = self.user_repo
            .find_by_id(user.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(CurrentSession {
            user_id: account.id,
            email: account.email,
            profile: user.profile.clone(),
        })
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    fn create_token(&self, user_id: Uuid, profile: &Profile) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            profile_id: profile.id,
            role: profile.role,
            jti: Uuid::new_v4(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_pool, test_state, unique_email};
    use sqlx::postgres::PgPoolOptions;

    // Pool preguiçoso: nenhum teste aqui chega a tocar no banco.
    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/cotaimport_test")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), secret.to_string(), pool)
    }

    fn profile(role: AppRole) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Shenzhen Audio".into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_token_carries_profile_and_role() {
        let auth = service("segredo");
        let profile = profile(AppRole::Exporter);

        let token = auth.create_token(profile.user_id, &profile).unwrap();
        let claims = auth.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, profile.user_id);
        assert_eq!(claims.profile_id, profile.id);
        assert_eq!(claims.role, AppRole::Exporter);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_each_login_gets_a_distinct_token_id() {
        let auth = service("segredo");
        let profile = profile(AppRole::Importer);

        let first = auth.decode_claims(&auth.create_token(profile.user_id, &profile).unwrap()).unwrap();
        let second = auth.decode_claims(&auth.create_token(profile.user_id, &profile).unwrap()).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[tokio::test]
    async fn test_token_signed_with_another_secret_is_rejected() {
        let issuer = service("segredo-a");
        let verifier = service("segredo-b");
        let profile = profile(AppRole::Importer);

        let token = issuer.create_token(profile.user_id, &profile).unwrap();
        assert!(matches!(verifier.decode_claims(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let auth = service("segredo");
        let past = Utc::now() - chrono::Duration::days(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            role: AppRole::Importer,
            jti: Uuid::new_v4(),
            exp: (past + chrono::Duration::hours(1)).timestamp() as usize,
            iat: past.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo".as_bytes()),
        )
        .unwrap();

        assert!(matches!(auth.decode_claims(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let auth = service("segredo");
        assert!(matches!(auth.decode_claims("nao-e-um-jwt"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@X.com "), "ana@x.com");
        assert_eq!(normalize_email("ana@x.com"), "ana@x.com");
    }

    // --- Com banco (TEST_DATABASE_URL) ---

    #[tokio::test]
    async fn test_email_differing_only_by_case_is_rejected() {
        let Some(state) = test_state().await else { return };
        let auth = &state.auth_service;
        let email = unique_email("Ana");

        let first = auth.register_user(&email, "segredo1", "Ana", AppRole::Importer).await.unwrap();
        let duplicate = auth
            .register_user(&email.to_uppercase(), "segredo2", "Outra Ana", AppRole::Exporter)
            .await;
        assert!(matches!(duplicate, Err(AppError::EmailAlreadyExists)));

        let login = auth.login_user(&format!(" {} ", email.to_uppercase()), "segredo1").await.unwrap();
        assert_eq!(login.profile.id, first.profile.id);
    }

    #[tokio::test]
    async fn test_case_only_duplicate_is_blocked_by_the_database() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepository::new(pool.clone());
        let email = unique_email("caixa");

        repo.create_user(&pool, &email, "hash").await.unwrap();
        let duplicate = repo.create_user(&pool, &email.to_uppercase(), "hash").await;
        assert!(matches!(duplicate, Err(AppError::EmailAlreadyExists)));
    }
}
