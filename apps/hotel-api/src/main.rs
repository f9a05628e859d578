use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible, so startup errors are reported in color
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        precheck_policy = %config.precheck_policy,
        "Starting {} v{}",
        config.app.name,
        config.app.version
    );

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let state = AppState { config, db };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(
        api_routes,
        &state.config.environment,
        state.config.server.request_timeout,
    )?;

    // /health is liveness only, /ready pings the database
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Hotel API shutdown complete");
    Ok(())
}
