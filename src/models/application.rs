use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Review lifecycle of a technician application. Approved and rejected are
/// terminal: once reached, no further transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        match (self, next) {
            (ApplicationStatus::Pending, ApplicationStatus::Reviewing)
            | (ApplicationStatus::Pending, ApplicationStatus::Approved)
            | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
            | (ApplicationStatus::Reviewing, ApplicationStatus::Approved)
            | (ApplicationStatus::Reviewing, ApplicationStatus::Rejected) => true,
            _ => false,
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("Unknown application status: {}", other)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfessionalInfo {
    #[validate(length(min = 1))]
    pub specialization: String,
    #[validate(range(min = 0))]
    pub years_experience: i32,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Opaque reference to a stored document. The core never interprets the
/// file itself.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentRef {
    #[validate(length(min = 1))]
    pub url: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationDocuments {
    #[validate(nested)]
    pub cv: DocumentRef,
    #[serde(default)]
    #[validate(nested)]
    pub diplomas: Vec<DocumentRef>,
    #[validate(nested)]
    pub motivation_letter: Option<DocumentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TechnicianApplication {
    pub id: i64,
    pub personal_info: Json<PersonalInfo>,
    pub professional_info: Json<ProfessionalInfo>,
    pub background: Option<String>,
    pub additional_info: Option<Json<AdditionalInfo>>,
    pub documents: Json<ApplicationDocuments>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub technician_id: Option<Uuid>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TechnicianApplication {
    pub fn status(&self) -> Result<ApplicationStatus, String> {
        self.status.parse()
    }

    /// Payload attached to push messages about this application.
    pub fn push_data(&self, new_status: ApplicationStatus) -> JsonValue {
        serde_json::json!({
            "application_id": self.id,
            "status": new_status.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_move_to_every_review_state() {
        let pending = ApplicationStatus::Pending;
        assert!(pending.can_transition_to(ApplicationStatus::Reviewing));
        assert!(pending.can_transition_to(ApplicationStatus::Approved));
        assert!(pending.can_transition_to(ApplicationStatus::Rejected));
    }

    #[test]
    fn reviewing_can_only_finish() {
        let reviewing = ApplicationStatus::Reviewing;
        assert!(reviewing.can_transition_to(ApplicationStatus::Approved));
        assert!(reviewing.can_transition_to(ApplicationStatus::Rejected));
        assert!(!reviewing.can_transition_to(ApplicationStatus::Pending));
        assert!(!reviewing.can_transition_to(ApplicationStatus::Reviewing));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for terminal in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
            assert!(terminal.is_terminal());
            for next in [
                ApplicationStatus::Pending,
                ApplicationStatus::Reviewing,
                ApplicationStatus::Approved,
                ApplicationStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Reviewing,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }
}
