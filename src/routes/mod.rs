pub mod application_routes;
pub mod auth_routes;
pub mod client_routes;
pub mod health;
pub mod notification_routes;
pub mod request_routes;
pub mod technician_routes;
