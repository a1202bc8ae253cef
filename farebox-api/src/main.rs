use std::net::SocketAddr;
use std::sync::Arc;

use farebox_api::{app, AppState};
use farebox_core::{PageLimits, TicketService};
use farebox_store::{DbClient, PostgresRouteStore, PostgresTicketStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farebox_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farebox_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting farebox API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let routes = Arc::new(PostgresRouteStore {
        pool: db.pool.clone(),
    });
    let tickets = Arc::new(PostgresTicketStore {
        pool: db.pool.clone(),
    });
    let service = Arc::new(TicketService::new(
        routes,
        tickets,
        PageLimits::new(config.pagination.max_page_size),
    ));

    let app = app(AppState { service });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
