//! TLS-terminating reverse proxy that spreads requests round-robin over a
//! fixed pool of in-process HTTP workers.

pub mod balancer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod router;
pub mod server;
pub mod state;
pub mod tls;
pub mod worker;
