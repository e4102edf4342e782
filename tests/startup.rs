//! Startup validation of the real binary.

use std::path::Path;
use std::process::{Command, Stdio};

fn balancer() -> Command {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let mut command = Command::new(env!("CARGO_BIN_EXE_filter-balancer"));
    command
        .current_dir(std::env::temp_dir())
        .env("CERT_PATH", fixtures.join("server.crt"))
        .env("KEY_PATH", fixtures.join("server.key"))
        .env_remove("PORT")
        .env_remove("WORKER_HOST")
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

#[test]
fn test_single_worker_port_exits_non_zero() {
    let status = balancer()
        .env("APP_SERVER_PORTS", "5001")
        .status()
        .unwrap();

    assert!(!status.success());
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_missing_certificate_exits_non_zero() {
    let status = balancer()
        .env("APP_SERVER_PORTS", "5001,5002")
        .env("CERT_PATH", "/definitely/not/here/server.crt")
        .status()
        .unwrap();

    assert!(!status.success());
    assert_eq!(status.code(), Some(1));
}
