//! Worker pool: the fixed set of plain-HTTP backend listeners

use crate::balancer::WorkerTarget;
use crate::error::StartupError;
use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

struct RunningWorker {
    target: WorkerTarget,
    task: JoinHandle<()>,
}

/// A running pool of workers, one per configured port.
pub struct WorkerPool {
    workers: Vec<RunningWorker>,
    shutdown: CancellationToken,
}

/// Identifier for the worker at `index` in configuration order.
pub fn worker_id(index: usize) -> String {
    format!("app-{}", index + 1)
}

impl WorkerPool {
    /// Bind every port, then start serving.
    ///
    /// All listeners are bound before any of them is served: if one port is
    /// unavailable, the already-bound sockets are dropped and the error is
    /// returned, so the pool is either complete or absent.
    ///
    /// A configured port of `0` binds an ephemeral port; the resulting target
    /// carries the port actually bound.
    pub async fn start<F>(host: &str, ports: &[u16], make_app: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Router,
    {
        let mut bound = Vec::with_capacity(ports.len());
        for &port in ports {
            let listener = TcpListener::bind((host, port))
                .await
                .map_err(|source| StartupError::Bind { port, source })?;
            let local_port = listener
                .local_addr()
                .map_err(|source| StartupError::Bind { port, source })?
                .port();
            bound.push((listener, local_port));
        }

        let shutdown = CancellationToken::new();
        let workers = bound
            .into_iter()
            .enumerate()
            .map(|(index, (listener, port))| {
                let target = WorkerTarget::new(worker_id(index), host, port);
                let app = make_app(&target.id);
                let token = shutdown.child_token();
                let id = target.id.clone();

                info!("[{}] listening on {}", id, target);

                let task = tokio::spawn(async move {
                    let result = axum::serve(listener, app)
                        .with_graceful_shutdown(async move { token.cancelled().await })
                        .await;
                    if let Err(e) = result {
                        error!(error = %e, "[{}] server error", id);
                    }
                });

                RunningWorker { target, task }
            })
            .collect();

        Ok(Self { workers, shutdown })
    }

    /// Targets in rotation order.
    pub fn targets(&self) -> Vec<WorkerTarget> {
        self.workers.iter().map(|w| w.target.clone()).collect()
    }

    /// Stop every listener, waiting at most `grace` in total for in-flight
    /// requests. Workers still busy at the deadline are aborted.
    pub async fn shutdown(self, grace: Duration) {
        self.shutdown.cancel();
        let deadline = Instant::now() + grace;

        for worker in self.workers {
            let RunningWorker { target, mut task } = worker;
            match tokio::time::timeout_at(deadline, &mut task).await {
                Ok(_) => info!("[{}] stopped (port {})", target.id, target.port),
                Err(_) => {
                    warn!("[{}] did not drain within {:?}, aborting", target.id, grace);
                    task.abort();
                }
            }
        }
    }
}
