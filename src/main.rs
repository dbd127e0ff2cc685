use campusmart::router::init_router;
use campusmart::state::init_app_state;
use campusmart_observability::{init_metrics, init_tracing};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing()?;
    let metrics = init_metrics();

    let state = init_app_state().await?;
    let bind_address = state.server_config.bind_address();
    let app = init_router(state, metrics);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
