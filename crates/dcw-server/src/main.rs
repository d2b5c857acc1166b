mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dcw_api::AppStateInner;
use dcw_mail::{HttpMailer, LogMailer, Mailer};
use dcw_store::SecretHasher;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "dcw=debug,dcw_api=debug,dcw_store=debug,dcw_mail=debug,tower_http=debug".into()
                }),
        )
        .init();

    let config = Config::from_env()?;

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(relay) => {
            info!("Resolution emails go through {}", relay.endpoint);
            Arc::new(HttpMailer::new(
                relay.endpoint.clone(),
                relay.api_key.clone(),
                config.mail_from.clone(),
                config.mail_timeout,
            )?)
        }
        None => {
            warn!("DCW_MAIL_ENDPOINT not set, resolution emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    // All state lives here and is dropped when the server stops
    let state = AppStateInner::build(config.settings(), SecretHasher::default(), mailer)?;

    let app = dcw_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Complaint wall listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, in-memory state discarded");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
