pub mod application_dto;
pub mod auth_dto;
pub mod client_dto;
pub mod notification_dto;
pub mod request_dto;
pub mod response;
