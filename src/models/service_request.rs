use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub device_type: Option<String>,
    pub status: String,
    pub estimated_cost: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const REQUEST_STATUSES: &[&str] = &[
    "pending",
    "assigned",
    "in_progress",
    "completed",
    "cancelled",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestNote {
    pub id: i64,
    pub request_id: Uuid,
    pub author_id: Uuid,
    pub author_type: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}
