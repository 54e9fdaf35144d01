use sea_orm::{Database, DatabaseConnection};

use rust_warung::api::create_api_router;
use rust_warung::config::Config;
use rust_warung::entities::{bootstrap_admin, setup_schema};
use rust_warung::services::build_services;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    setup_schema(&db).await.expect("Failed to create schema");
    bootstrap_admin(&db, &config.admin_username, &config.admin_password)
        .await
        .expect("Failed to bootstrap admin account");

    let services = build_services(db, &config.jwt_secret);
    let app = create_api_router(services, &config.jwt_secret);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.expect("Server error");
}
