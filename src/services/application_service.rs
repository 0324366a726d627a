use crate::dto::application_dto::SubmitApplicationPayload;
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, TechnicianApplication};
use crate::models::user::User;
use crate::utils::{crypto, token};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const APPLICATION_COLUMNS: &str = "id, personal_info, professional_info, background, \
     additional_info, documents, status, admin_notes, technician_id, submitted_at, updated_at";

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: SubmitApplicationPayload) -> Result<TechnicianApplication> {
        let sql = format!(
            "INSERT INTO technician_applications \
             (personal_info, professional_info, background, additional_info, documents, status) \
             VALUES ($1, $2, $3, $4, $5, 'pending') \
             RETURNING {APPLICATION_COLUMNS}"
        );
        let application = sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(Json(payload.personal_info))
            .bind(Json(payload.professional_info))
            .bind(payload.background)
            .bind(payload.additional_info.map(Json))
            .bind(Json(payload.documents))
            .fetch_one(&self.pool)
            .await?;
        Ok(application)
    }

    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<TechnicianApplication>> {
        let applications = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {APPLICATION_COLUMNS} FROM technician_applications \
                     WHERE status = $1 ORDER BY submitted_at DESC"
                );
                sqlx::query_as::<_, TechnicianApplication>(&sql)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {APPLICATION_COLUMNS} FROM technician_applications \
                     ORDER BY submitted_at DESC"
                );
                sqlx::query_as::<_, TechnicianApplication>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(applications)
    }

    pub async fn get(&self, id: i64) -> Result<TechnicianApplication> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM technician_applications WHERE id = $1");
        sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// Generic status move (e.g. pending -> reviewing). Approval and rejection
    /// have dedicated entry points because they carry extra obligations.
    pub async fn update_status(
        &self,
        id: i64,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<TechnicianApplication> {
        if new_status == ApplicationStatus::Approved {
            return Err(Error::BadRequest(
                "Approval must go through the approve action".to_string(),
            ));
        }
        if new_status == ApplicationStatus::Rejected {
            let notes = notes.unwrap_or_default();
            return self.reject(id, &notes).await;
        }

        let mut tx = self.pool.begin().await?;
        let application = Self::fetch_for_update(&mut tx, id).await?;
        let current = Self::parse_status(&application)?;
        Self::check_transition(id, current, new_status)?;

        let sql = format!(
            "UPDATE technician_applications \
             SET status = $1, admin_notes = COALESCE($2, admin_notes), updated_at = NOW() \
             WHERE id = $3 RETURNING {APPLICATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(new_status.as_str())
            .bind(notes)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Approves the application and provisions the technician account in one
    /// transaction. If the insert fails (duplicate email included) the
    /// application stays untouched.
    pub async fn approve(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<(TechnicianApplication, User)> {
        let mut tx = self.pool.begin().await?;
        let application = Self::fetch_for_update(&mut tx, id).await?;
        let current = Self::parse_status(&application)?;
        Self::check_transition(id, current, ApplicationStatus::Approved)?;

        let personal = &application.personal_info.0;
        let professional = &application.professional_info.0;

        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&personal.email)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(Error::DuplicateEmail(personal.email.clone()));
        }

        let temp_password = token::generate_temp_password(12);
        let password_hash = crypto::hash_password(&temp_password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let technician = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, specialization, status) \
             VALUES ($1, $2, $3, $4, 'technician', $5, 'active') \
             RETURNING id, name, email, password_hash, role, specialization, status, \
                       created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&personal.full_name)
        .bind(&personal.email)
        .bind(password_hash)
        .bind(&professional.specialization)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            // The precheck can lose a race with a concurrent approve; the
            // unique constraint is the authority either way.
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                Error::DuplicateEmail(personal.email.clone())
            }
            _ => Error::from(e),
        })?;

        let sql = format!(
            "UPDATE technician_applications \
             SET status = 'approved', technician_id = $1, admin_notes = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {APPLICATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(technician.id)
            .bind(notes)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(
            application_id = id,
            technician_id = %technician.id,
            "Application approved, technician provisioned"
        );
        Ok((updated, technician))
    }

    /// Rejection notes are a hard requirement: the check runs before any read
    /// so an empty-notes call never touches the row.
    pub async fn reject(&self, id: i64, notes: &str) -> Result<TechnicianApplication> {
        let notes = notes.trim();
        if notes.is_empty() {
            let mut errors = validator::ValidationErrors::new();
            let mut error = validator::ValidationError::new("length");
            error.message = Some("Rejection notes are required".into());
            errors.add("notes", error);
            return Err(errors.into());
        }

        let mut tx = self.pool.begin().await?;
        let application = Self::fetch_for_update(&mut tx, id).await?;
        let current = Self::parse_status(&application)?;
        Self::check_transition(id, current, ApplicationStatus::Rejected)?;

        let sql = format!(
            "UPDATE technician_applications \
             SET status = 'rejected', admin_notes = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(notes)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(application_id = id, "Application rejected");
        Ok(updated)
    }

    pub async fn status_counts(&self) -> Result<std::collections::HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM technician_applications GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    // Row lock so concurrent reviews serialize; the loser observes the
    // terminal state and fails the transition check.
    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<TechnicianApplication> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM technician_applications WHERE id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, TechnicianApplication>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    fn parse_status(application: &TechnicianApplication) -> Result<ApplicationStatus> {
        application.status().map_err(Error::Internal)
    }

    fn check_transition(id: i64, current: ApplicationStatus, next: ApplicationStatus) -> Result<()> {
        if !current.can_transition_to(next) {
            return Err(Error::InvalidStateTransition(format!(
                "Application {} cannot move from {} to {}",
                id, current, next
            )));
        }
        Ok(())
    }
}
