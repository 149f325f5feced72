use std::sync::Arc;

use image_gateway::config::AppConfig;
use image_gateway::logging;
use image_gateway::routes::configure_routes;
use image_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logger(config.log_format);
    tracing::debug!(?config, "Loaded configuration");

    let state = AppState::from_config(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to initialise application");
    })?;

    let routes = configure_routes(Arc::new(state));
    let addr = config.bind_addr();

    tracing::info!(%addr, "Starting server");
    warp::serve(routes).run(addr).await;

    Ok(())
}
