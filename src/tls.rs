//! TLS material for the public listener

use crate::error::StartupError;
use axum_server::tls_rustls::RustlsConfig;
use std::path::Path;

/// Load the PEM certificate chain and key.
///
/// Both files must exist; a missing one is reported by path before any
/// parsing is attempted.
pub async fn load_tls(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, StartupError> {
    for path in [cert_path, key_path] {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(StartupError::MissingTlsMaterial {
                path: path.to_path_buf(),
            });
        }
    }

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(StartupError::Tls)
}
