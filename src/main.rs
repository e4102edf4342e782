//! Filter Balancer - TLS-terminating round-robin load balancer
//!
//! Starts a fixed pool of plain-HTTP workers and spreads public HTTPS traffic
//! across them.

use filter_balancer::config::Config;
use filter_balancer::server;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filter_balancer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting load balancer...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded: {:?}", config);

    if let Err(e) = server::run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
