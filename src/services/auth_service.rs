use crate::dto::auth_dto::{LoginPayload, LoginResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::client::Client;
use crate::models::user::User;
use crate::utils::crypto;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

const TOKEN_TTL_SECS: u64 = 7 * 24 * 3600;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        match payload.user_type.as_str() {
            "admin" | "technician" => self.login_user(&payload).await,
            "client" => self.login_client(&payload).await,
            other => Err(Error::BadRequest(format!("Unknown user type: {}", other))),
        }
    }

    async fn login_user(&self, payload: &LoginPayload) -> Result<LoginResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, specialization, status, \
                    created_at, updated_at \
             FROM users WHERE email = $1 AND role = $2",
        )
        .bind(&payload.email)
        .bind(&payload.user_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        if user.status != "active" {
            return Err(Error::Unauthorized("Account is not active".to_string()));
        }
        Self::check_password(&payload.password, &user.password_hash)?;

        let token = Self::issue_token(user.id, &user.role)?;
        Ok(LoginResponse {
            token,
            user_id: user.id,
            name: user.name,
            role: user.role,
        })
    }

    async fn login_client(&self, payload: &LoginPayload) -> Result<LoginResponse> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, phone, address, password_hash, created_at, updated_at \
             FROM clients WHERE email = $1",
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        Self::check_password(&payload.password, &client.password_hash)?;

        let token = Self::issue_token(client.id, "client")?;
        Ok(LoginResponse {
            token,
            user_id: client.id,
            name: client.name,
            role: "client".to_string(),
        })
    }

    fn check_password(plain: &str, hashed: &str) -> Result<()> {
        let ok = crypto::verify_password(plain, hashed)
            .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(())
    }

    fn issue_token(subject: Uuid, role: &str) -> Result<String> {
        let config = crate::config::get_config();
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| Error::Internal(format!("Clock error: {}", e)))?
            .as_secs()
            + TOKEN_TTL_SECS;
        let claims = Claims {
            sub: subject.to_string(),
            exp: exp as usize,
            role: Some(role.to_string()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
    }
}
