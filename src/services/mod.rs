pub mod application_service;
pub mod auth_service;
pub mod client_service;
pub mod notification_service;
pub mod push_service;
pub mod request_service;
pub mod technician_service;
