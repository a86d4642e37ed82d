use todo_pad::{
    application::todo_service::TodoServiceImpl,
    config::ServerConfig,
    domain::repository::TodoRepository,
    http::{cors::CorsPolicy, routing::{self, todos}},
    infrastructure::sqlite_repo::{prepare_sqlite_file, SqliteTodoRepository},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init();

    prepare_sqlite_file(&config.database_url)?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    tracing::info!(database_url = %config.database_url, "connected to store");

    let service = TodoServiceImpl::new(repo);
    let todos_router = todos::router(todos::AppState { service: service.clone() });
    let router = routing::app(todos_router, CorsPolicy::new(&config.cors_origin));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, cors_origin = %config.cors_origin, "listening");
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    service.repository().close().await;
    tracing::info!("store connection closed");
    served?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
