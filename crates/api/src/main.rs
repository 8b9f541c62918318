use anyhow::Result;
use tracing::{info, warn};

use taklifnoma_api::{app, config::Config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Taklifnoma API v{}", env!("CARGO_PKG_VERSION"));

    // A missing or unreachable remote store is not fatal: boot into degraded
    // mode and keep serving from the local fallback store.
    let pool_config = config.pool_config();
    let pool = match persistence::db::connect_remote(&pool_config).await {
        Ok(pool) => {
            if let Err(e) = persistence::db::run_migrations(&pool).await {
                warn!(error = %e, "Migrations failed; remote operations may report not_provisioned");
            }
            info!("Remote store connected");
            Some(pool)
        }
        Err(e) => {
            warn!(error = %e, "Remote store unavailable, starting in degraded mode");
            None
        }
    };

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
