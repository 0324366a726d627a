use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: Uuid,
    pub user_type: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Push transport address for one installed client app. A user may hold
/// several tokens (multi-device).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceToken {
    pub id: i64,
    pub user_id: Uuid,
    pub user_type: String,
    pub token: String,
    pub created_at: Option<DateTime<Utc>>,
}
