//! Configuration management
//!
//! Everything is read from the environment (and `.env` if present) once at
//! startup. Any malformed value is a startup error, never a silent default.

use crate::error::StartupError;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Minimum pool size that still makes balancing meaningful.
pub const MIN_WORKERS: usize = 2;

#[derive(Debug, Clone)]
pub struct Config {
    /// Public HTTPS port
    pub public_port: u16,
    /// PEM certificate chain for the public listener
    pub cert_path: PathBuf,
    /// PEM private key for the public listener
    pub key_path: PathBuf,
    /// Worker ports, in rotation order
    pub worker_ports: Vec<u16>,
    /// Host the workers bind to and are addressed by
    pub worker_host: String,
    /// Upper bound for draining connections on shutdown
    pub shutdown_grace: Duration,
    /// Connect timeout towards a worker, `None` waits on the OS default
    pub upstream_connect_timeout: Option<Duration>,
}

/// Parse the comma-separated worker port list.
///
/// Entries are trimmed and blank entries skipped, so `"5001, 5002,"` is two
/// ports. Order is preserved.
pub fn parse_worker_ports(raw: &str) -> Result<Vec<u16>, StartupError> {
    let ports = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(StartupError::InvalidPort(entry.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ports.len() < MIN_WORKERS {
        return Err(StartupError::TooFewWorkers {
            found: ports.len(),
            min: MIN_WORKERS,
        });
    }

    Ok(ports)
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, StartupError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| StartupError::InvalidNumber {
            key,
            value,
        }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, StartupError> {
        dotenv().ok(); // Load .env if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let worker_ports = match lookup("APP_SERVER_PORTS") {
            Some(raw) => parse_worker_ports(&raw)?,
            None => vec![5001, 5002],
        };

        let connect_timeout_ms: u64 = parse_number(&lookup, "UPSTREAM_CONNECT_TIMEOUT_MS", 0)?;

        Ok(Self {
            public_port: parse_number(&lookup, "PORT", 4000)?,
            cert_path: lookup("CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("certs/server.crt")),
            key_path: lookup("KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("certs/server.key")),
            worker_ports,
            worker_host: lookup("WORKER_HOST").unwrap_or_else(|| "localhost".to_string()),
            shutdown_grace: Duration::from_millis(parse_number(
                &lookup,
                "SHUTDOWN_GRACE_MS",
                200,
            )?),
            upstream_connect_timeout: (connect_timeout_ms > 0)
                .then(|| Duration::from_millis(connect_timeout_ms)),
        })
    }
}
