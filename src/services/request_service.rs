use crate::dto::request_dto::CreateRequestPayload;
use crate::error::{Error, Result};
use crate::models::service_request::{RequestNote, ServiceRequest, REQUEST_STATUSES};
use sqlx::PgPool;
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, client_id, technician_id, title, description, device_type, \
     status, estimated_cost, created_at, updated_at";

#[derive(Clone)]
pub struct RequestService {
    pool: PgPool,
}

impl RequestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        payload: CreateRequestPayload,
    ) -> Result<ServiceRequest> {
        let sql = format!(
            "INSERT INTO service_requests \
             (id, client_id, title, description, device_type, status, estimated_cost) \
             VALUES ($1, $2, $3, $4, $5, 'pending', $6) RETURNING {REQUEST_COLUMNS}"
        );
        let request = sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(Uuid::new_v4())
            .bind(client_id)
            .bind(payload.title)
            .bind(payload.description)
            .bind(payload.device_type)
            .bind(payload.estimated_cost)
            .fetch_one(&self.pool)
            .await?;
        Ok(request)
    }

    pub async fn list_all(&self) -> Result<Vec<ServiceRequest>> {
        let sql =
            format!("SELECT {REQUEST_COLUMNS} FROM service_requests ORDER BY created_at DESC");
        let requests = sqlx::query_as::<_, ServiceRequest>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<ServiceRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests \
             WHERE client_id = $1 ORDER BY created_at DESC"
        );
        let requests = sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    pub async fn list_for_technician(&self, technician_id: Uuid) -> Result<Vec<ServiceRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests \
             WHERE technician_id = $1 ORDER BY created_at DESC"
        );
        let requests = sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(technician_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    pub async fn get(&self, id: Uuid) -> Result<ServiceRequest> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM service_requests WHERE id = $1");
        sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Service request {} not found", id)))
    }

    pub async fn assign(&self, id: Uuid, technician_id: Uuid) -> Result<ServiceRequest> {
        let technician_ok = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE id = $1 AND role = 'technician' AND status = 'active'",
        )
        .bind(technician_id)
        .fetch_optional(&self.pool)
        .await?;
        if technician_ok.is_none() {
            return Err(Error::BadRequest(format!(
                "No active technician with id {}",
                technician_id
            )));
        }

        let sql = format!(
            "UPDATE service_requests \
             SET technician_id = $2, status = 'assigned', updated_at = NOW() \
             WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(id)
            .bind(technician_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Service request {} not found", id)))
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<ServiceRequest> {
        if !REQUEST_STATUSES.contains(&status) {
            return Err(Error::BadRequest(format!(
                "Unknown request status: {}",
                status
            )));
        }

        let sql = format!(
            "UPDATE service_requests SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Service request {} not found", id)))
    }

    pub async fn list_notes(&self, request_id: Uuid) -> Result<Vec<RequestNote>> {
        let notes = sqlx::query_as::<_, RequestNote>(
            "SELECT id, request_id, author_id, author_type, body, created_at \
             FROM request_notes WHERE request_id = $1 ORDER BY created_at ASC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    pub async fn add_note(
        &self,
        request_id: Uuid,
        author_id: Uuid,
        author_type: &str,
        body: &str,
    ) -> Result<RequestNote> {
        self.get(request_id).await?;

        let note = sqlx::query_as::<_, RequestNote>(
            "INSERT INTO request_notes (request_id, author_id, author_type, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, request_id, author_id, author_type, body, created_at",
        )
        .bind(request_id)
        .bind(author_id)
        .bind(author_type)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    pub async fn status_counts(&self) -> Result<std::collections::HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM service_requests GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
