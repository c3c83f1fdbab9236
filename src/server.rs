//! Web server

use crate::cli;

use std::path::PathBuf;
use std::{net::SocketAddr, process::exit, str::FromStr, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use expanduser::expanduser;
use tokio::signal;

/// Serve the Summarist service
///
/// # Arguments
///
/// * `args`: Command line arguments
/// * `app`: The [axum::Router] to serve
pub async fn serve(args: &cli::CommandLineArgs, app: Router) {
    let addr = SocketAddr::from_str(&format!("{}:{}", args.host, args.port))
        .expect("invalid host name, IP address or port number");

    // Catch ctrl+c and try to shutdown gracefully
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(
        handle.clone(),
        args.graceful_shutdown_timeout,
    ));

    if args.https {
        let tls_config = tls_config(&args.cert_file, &args.key_file).await;
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .unwrap();
    } else {
        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .unwrap();
    }
}

/// Load the TLS certificate pair.
async fn tls_config(cert_file: &str, key_file: &str) -> RustlsConfig {
    let cert_file = resolve(cert_file, "TLS certificate");
    let key_file = resolve(key_file, "TLS key");
    RustlsConfig::from_pem_file(cert_file, key_file)
        .await
        .expect("Failed to load TLS certificate files")
}

/// Expand `~` and canonicalise a certificate path, exiting with a diagnostic
/// when the file does not exist.
fn resolve(path: &str, description: &str) -> PathBuf {
    let path = expanduser(path)
        .expect("Failed to expand ~ to user name. Please provide an absolute path instead.");
    match path.canonicalize() {
        Ok(path) => path,
        Err(_) => {
            println!(
                "{} file expected at '{}' but not found.",
                description,
                path.display()
            );
            exit(1)
        }
    }
}

/// Graceful shutdown handler
///
/// Installs signal handlers to catch Ctrl-C or SIGTERM and trigger a graceful shutdown.
async fn shutdown_signal(handle: Handle, timeout: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    println!("signal received, starting graceful shutdown");
    // Force shutdown if graceful shutdown takes longer than the timeout
    handle.graceful_shutdown(Some(Duration::from_secs(timeout)));
}
