pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    application_service::ApplicationService,
    auth_service::AuthService,
    client_service::ClientService,
    notification_service::NotificationService,
    push_service::{PushConfig, PushService},
    request_service::RequestService,
    technician_service::TechnicianService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub application_service: ApplicationService,
    pub technician_service: TechnicianService,
    pub client_service: ClientService,
    pub request_service: RequestService,
    pub notification_service: NotificationService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let push_service = PushService::new(PushConfig::from_app_config(config));

        let application_service = ApplicationService::new(pool.clone());
        let technician_service = TechnicianService::new(pool.clone());
        let client_service = ClientService::new(pool.clone());
        let request_service = RequestService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone(), push_service);
        let auth_service = AuthService::new(pool.clone());

        Self {
            pool,
            application_service,
            technician_service,
            client_service,
            request_service,
            notification_service,
            auth_service,
        }
    }
}
