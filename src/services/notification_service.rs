use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, TechnicianApplication};
use crate::models::notification::{DeviceToken, Notification};
use crate::models::service_request::ServiceRequest;
use crate::services::push_service::{PushMessage, PushOutcome, PushService};
use sqlx::PgPool;
use uuid::Uuid;

/// Translates domain events into notification rows plus best-effort push
/// delivery. Every dispatch entry point swallows its own failures: the
/// triggering domain operation has already committed and must not be
/// affected.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    push: PushService,
}

impl NotificationService {
    pub fn new(pool: PgPool, push: PushService) -> Self {
        Self { pool, push }
    }

    pub async fn notify_status_change(
        &self,
        application: &TechnicianApplication,
        new_status: ApplicationStatus,
    ) -> Option<PushOutcome> {
        match self.dispatch_status_change(application, new_status).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    application_id = application.id,
                    "Status-change notification failed"
                );
                None
            }
        }
    }

    pub async fn notify_new_request(&self, request: &ServiceRequest) -> Option<PushOutcome> {
        match self.dispatch_new_request(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = ?e, request_id = %request.id, "New-request broadcast failed");
                None
            }
        }
    }

    pub async fn notify_request_update(&self, request: &ServiceRequest) -> Option<PushOutcome> {
        match self.dispatch_request_update(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    request_id = %request.id,
                    "Request-update notification failed"
                );
                None
            }
        }
    }

    async fn dispatch_status_change(
        &self,
        application: &TechnicianApplication,
        new_status: ApplicationStatus,
    ) -> Result<Option<PushOutcome>> {
        // Applicants have no account of their own; a client account under the
        // same email is the only delivery address we have.
        let email = &application.personal_info.0.email;
        let client_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM clients WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        let Some(client_id) = client_id else {
            tracing::info!(
                application_id = application.id,
                "No account matches applicant email; nothing to deliver"
            );
            return Ok(None);
        };

        let (title, body) = match new_status {
            ApplicationStatus::Approved => (
                "Application approved".to_string(),
                "Your technician application was approved. Welcome aboard!".to_string(),
            ),
            ApplicationStatus::Rejected => (
                "Application rejected".to_string(),
                "Your technician application was not accepted.".to_string(),
            ),
            other => (
                "Application update".to_string(),
                format!("Your technician application is now {}.", other),
            ),
        };

        self.persist(client_id, "client", "application_status", &title, &body)
            .await?;

        let tokens = self.tokens_for(client_id, "client").await?;
        if tokens.is_empty() {
            tracing::info!(
                application_id = application.id,
                "No device tokens registered; notification stored only"
            );
            return Ok(None);
        }

        let message = PushMessage {
            title,
            body,
            data: application.push_data(new_status),
        };
        let outcome = self.push.send_to_tokens(&tokens, &message).await?;
        tracing::info!(
            application_id = application.id,
            success = outcome.success,
            failure = outcome.failure,
            "Status-change push dispatched"
        );
        Ok(Some(outcome))
    }

    async fn dispatch_new_request(
        &self,
        request: &ServiceRequest,
    ) -> Result<Option<PushOutcome>> {
        let technician_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE role = 'technician' AND status = 'active'",
        )
        .fetch_all(&self.pool)
        .await?;

        let title = "New service request".to_string();
        let body = format!("New request: {}", request.title);
        for technician_id in &technician_ids {
            self.persist(*technician_id, "technician", "new_request", &title, &body)
                .await?;
        }

        let tokens = sqlx::query_scalar::<_, String>(
            "SELECT dt.token FROM device_tokens dt \
             JOIN users u ON u.id = dt.user_id \
             WHERE dt.user_type = 'technician' AND u.role = 'technician' AND u.status = 'active'",
        )
        .fetch_all(&self.pool)
        .await?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let message = PushMessage {
            title,
            body,
            data: serde_json::json!({ "request_id": request.id }),
        };
        let outcome = self.push.send_to_tokens(&tokens, &message).await?;
        Ok(Some(outcome))
    }

    async fn dispatch_request_update(
        &self,
        request: &ServiceRequest,
    ) -> Result<Option<PushOutcome>> {
        let title = "Service request update".to_string();
        let body = format!("Your request \"{}\" is now {}.", request.title, request.status);
        self.persist(request.client_id, "client", "request_status", &title, &body)
            .await?;

        let tokens = self.tokens_for(request.client_id, "client").await?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let message = PushMessage {
            title,
            body,
            data: serde_json::json!({ "request_id": request.id, "status": request.status }),
        };
        let outcome = self.push.send_to_tokens(&tokens, &message).await?;
        Ok(Some(outcome))
    }

    pub async fn register_device(
        &self,
        user_id: Uuid,
        user_type: &str,
        token: &str,
    ) -> Result<DeviceToken> {
        let device = sqlx::query_as::<_, DeviceToken>(
            "INSERT INTO device_tokens (user_id, user_type, token) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, user_type, token) \
             DO UPDATE SET token = EXCLUDED.token \
             RETURNING id, user_id, user_type, token, created_at",
        )
        .bind(user_id)
        .bind(user_type)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(device)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        user_type: &str,
    ) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, user_type, kind, title, body, is_read, created_at \
             FROM notifications WHERE user_id = $1 AND user_type = $2 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(user_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: Uuid, user_type: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND user_type = $2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(user_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, id: i64, user_id: Uuid, user_type: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND user_id = $2 AND user_type = $3",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_type)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid, user_type: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE user_id = $1 AND user_type = $2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(user_type)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn persist(
        &self,
        user_id: Uuid,
        user_type: &str,
        kind: &str,
        title: &str,
        body: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (user_id, user_type, kind, title, body) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(user_type)
        .bind(kind)
        .bind(title)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tokens_for(&self, user_id: Uuid, user_type: &str) -> Result<Vec<String>> {
        let tokens = sqlx::query_scalar::<_, String>(
            "SELECT token FROM device_tokens WHERE user_id = $1 AND user_type = $2",
        )
        .bind(user_id)
        .bind(user_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }
}
