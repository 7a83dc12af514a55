//! `Folio` server entry point.
//!
//! Opens the document store, points at the credential file, and starts the
//! Axum HTTP server with graceful shutdown. A background worker purges idle
//! sessions alongside the server and is cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use folio_core::credentials::CredentialStore;
use folio_core::session::SessionStore;
use folio_storage::FsDocumentStore;

use folio_server::build_router;
use folio_server::config::ServerConfig;
use folio_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        environment = ?config.environment,
        data_dir = %config.data_dir.display(),
        users_file = %config.users_file.display(),
        "Folio starting"
    );

    let store = FsDocumentStore::open(&config.data_dir)
        .await
        .context("failed to open document store")?;

    if !config.users_file.exists() {
        warn!(
            path = %config.users_file.display(),
            "credential file not found, nobody will be able to sign in"
        );
    }

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    let state = Arc::new(AppState::new(
        Arc::new(store),
        CredentialStore::new(&config.users_file),
        Arc::clone(&sessions),
        config.secure_cookie,
    ));

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = {
        let mut rx = shutdown_rx.clone();
        let interval = config.session_sweep_interval;
        tokio::spawn(async move {
            session_sweeper(sessions, &mut rx, interval).await;
        })
    };

    let app = build_router(state);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Folio server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for session sweeper to stop");
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;

    info!("Folio server stopped");
    Ok(())
}

/// Background worker that periodically drops sessions idle past their TTL.
async fn session_sweeper(
    sessions: Arc<SessionStore>,
    shutdown: &mut watch::Receiver<bool>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    info!(interval_secs = interval.as_secs(), "session sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let purged = sessions.purge_expired().await;
                if purged > 0 {
                    info!(purged, "expired sessions purged");
                }
            }
            _ = shutdown.changed() => {
                info!("session sweeper shutting down");
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
