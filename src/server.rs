//! Process wiring: worker pool, public TLS listener, shutdown

use crate::balancer::RoundRobin;
use crate::config::Config;
use crate::error::StartupError;
use crate::router::{create_proxy_router, create_worker_router};
use crate::state::ProxyState;
use crate::tls::load_tls;
use crate::worker::WorkerPool;

use axum_server::Handle;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Run until a termination signal arrives.
///
/// TLS material is validated before any listener is bound.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let tls = load_tls(&config.cert_path, &config.key_path).await?;
    info!("TLS configured");

    let pool = WorkerPool::start(
        &config.worker_host,
        &config.worker_ports,
        create_worker_router,
    )
    .await?;
    let Some(balancer) = RoundRobin::new(pool.targets()) else {
        return Err(StartupError::TooFewWorkers {
            found: 0,
            min: crate::config::MIN_WORKERS,
        });
    };
    let rotation = balancer
        .targets()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let state = ProxyState::new(Arc::new(balancer), config.upstream_connect_timeout);
    let app = create_proxy_router(state);

    let handle = Handle::new();
    let grace = config.shutdown_grace;
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            info!("Shutting down load balancer...");
            handle.graceful_shutdown(Some(grace));
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.public_port));
    info!(
        port = config.public_port,
        "Load balancer listening on https://localhost:{}/api",
        config.public_port
    );
    info!("Forwarding requests round-robin to: {}", rotation);

    let served = axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await;

    pool.shutdown(grace).await;

    served.map_err(|source| match source.kind() {
        std::io::ErrorKind::AddrInUse | std::io::ErrorKind::PermissionDenied => {
            StartupError::Bind {
                port: config.public_port,
                source,
            }
        }
        _ => StartupError::Serve(source),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
