use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use repairhub_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/auth/login", post(routes::auth_routes::login))
        .route(
            "/api/clients/register",
            post(routes::client_routes::register_client),
        )
        .route(
            "/api/applications",
            post(routes::application_routes::submit_application),
        )
        .route(
            "/api/applications/documents",
            post(routes::application_routes::upload_document),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let portal_api = Router::new()
        .route(
            "/api/requests",
            get(routes::request_routes::list_requests).post(routes::request_routes::create_request),
        )
        .route("/api/requests/:id", get(routes::request_routes::get_request))
        .route(
            "/api/requests/:id/status",
            patch(routes::request_routes::update_request_status),
        )
        .route(
            "/api/requests/:id/notes",
            get(routes::request_routes::list_notes).post(routes::request_routes::add_note),
        )
        .route(
            "/api/notifications",
            get(routes::notification_routes::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(routes::notification_routes::unread_count),
        )
        .route(
            "/api/notifications/:id/read",
            post(routes::notification_routes::mark_read),
        )
        .route(
            "/api/notifications/read-all",
            post(routes::notification_routes::mark_all_read),
        )
        .route(
            "/api/devices",
            post(routes::notification_routes::register_device),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    let admin_api = Router::new()
        .route(
            "/api/admin/applications",
            get(routes::application_routes::list_applications),
        )
        .route(
            "/api/admin/applications/:id",
            get(routes::application_routes::get_application)
                .patch(routes::application_routes::update_application_status),
        )
        .route(
            "/api/admin/applications/:id/approve",
            post(routes::application_routes::approve_application),
        )
        .route(
            "/api/admin/applications/:id/reject",
            post(routes::application_routes::reject_application),
        )
        .route(
            "/api/admin/technicians",
            get(routes::technician_routes::list_technicians)
                .post(routes::technician_routes::create_technician),
        )
        .route(
            "/api/admin/technicians/:id",
            get(routes::technician_routes::get_technician)
                .patch(routes::technician_routes::update_technician)
                .delete(routes::technician_routes::delete_technician),
        )
        .route(
            "/api/admin/clients",
            get(routes::client_routes::list_clients),
        )
        .route(
            "/api/admin/clients/:id",
            get(routes::client_routes::get_client),
        )
        .route(
            "/api/admin/requests",
            get(routes::request_routes::list_requests),
        )
        .route(
            "/api/admin/requests/:id/assign",
            post(routes::request_routes::assign_request),
        )
        .route(
            "/api/admin/stats",
            get(routes::application_routes::dashboard_stats),
        )
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.admin_rps),
            middleware::rate_limit::rps_middleware,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(public_api)
        .merge(portal_api)
        .merge(admin_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
