use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, specialization, status, created_at, updated_at";

#[derive(Clone)]
pub struct TechnicianService {
    pool: PgPool,
}

impl TechnicianService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'technician' ORDER BY created_at DESC"
        );
        let technicians = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(technicians)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = 'technician'");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Technician {} not found", id)))
    }

    pub async fn create(
        &self,
        name: String,
        email: String,
        password: String,
        specialization: Option<String>,
    ) -> Result<User> {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::DuplicateEmail(email));
        }

        let password_hash = crypto::hash_password(&password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, specialization, status) \
             VALUES ($1, $2, $3, $4, 'technician', $5, 'active') RETURNING {USER_COLUMNS}"
        );
        let technician = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(specialization)
            .fetch_one(&self.pool)
            .await?;
        Ok(technician)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        specialization: Option<String>,
        status: Option<String>,
    ) -> Result<User> {
        self.get(id).await?;

        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                specialization = COALESCE($3, specialization), \
                status = COALESCE($4, status), \
                updated_at = NOW() \
             WHERE id = $1 AND role = 'technician' RETURNING {USER_COLUMNS}"
        );
        let technician = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(specialization)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(technician)
    }

    /// Applications keep a foreign key onto technicians, so removal is a
    /// soft deactivation.
    pub async fn deactivate(&self, id: Uuid) -> Result<User> {
        self.update(id, None, None, Some("inactive".to_string())).await
    }
}
