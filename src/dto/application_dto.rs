use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::{
    AdditionalInfo, ApplicationDocuments, PersonalInfo, ProfessionalInfo,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitApplicationPayload {
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[validate(nested)]
    pub professional_info: ProfessionalInfo,
    pub background: Option<String>,
    #[validate(nested)]
    pub additional_info: Option<AdditionalInfo>,
    #[validate(nested)]
    pub documents: ApplicationDocuments,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApprovePayload {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectPayload {
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplicationResponse {
    pub id: i64,
    pub status: String,
}
