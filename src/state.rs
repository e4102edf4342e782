use crate::balancer::RoundRobin;
use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;

/// Proxy state shared across handlers
#[derive(Clone)]
pub struct ProxyState {
    pub balancer: Arc<RoundRobin>,
    pub client: Client<HttpConnector, Body>,
}

impl ProxyState {
    /// Plain HTTP/1.1 client towards the workers.
    pub fn new(balancer: Arc<RoundRobin>, connect_timeout: Option<Duration>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(connect_timeout);
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { balancer, client }
    }
}
