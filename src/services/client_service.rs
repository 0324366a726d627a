use crate::dto::client_dto::RegisterClientPayload;
use crate::error::{Error, Result};
use crate::models::client::Client;
use crate::utils::crypto;
use sqlx::PgPool;
use uuid::Uuid;

const CLIENT_COLUMNS: &str =
    "id, name, email, phone, address, password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct ClientService {
    pool: PgPool,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterClientPayload) -> Result<Client> {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM clients WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "A client with this email already exists".to_string(),
            ));
        }

        let password_hash = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let sql = format!(
            "INSERT INTO clients (id, name, email, phone, address, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CLIENT_COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(Uuid::new_v4())
            .bind(payload.name)
            .bind(payload.email)
            .bind(payload.phone)
            .bind(payload.address)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn list(&self) -> Result<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC");
        let clients = sqlx::query_as::<_, Client>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn get(&self, id: Uuid) -> Result<Client> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Client {} not found", id)))
    }
}
