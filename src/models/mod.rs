pub mod application;
pub mod client;
pub mod notification;
pub mod service_request;
pub mod user;
