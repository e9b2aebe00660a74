//! Rentio payments service binary.
//!
//! Serves `POST /api/webhooks/yoco` with in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentio::adapters::http::{app_router, WebhookAppState};
use rentio::adapters::memory::{InMemoryBookingLedger, InMemoryProcessedWebhookStore};
use rentio::config::{AppConfig, ServerConfig};
use rentio::ports::ProcessedWebhookStore;

/// Delivery records and applied event IDs older than this are pruned. Yoco
/// stops redelivering long before.
const PROCESSED_WEBHOOK_RETENTION_DAYS: i64 = 7;
const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.server);

    let addr = config.server.socket_addr()?;
    let processed_webhooks = Arc::new(InMemoryProcessedWebhookStore::new());
    let booking_ledger = Arc::new(InMemoryBookingLedger::new());
    let state = WebhookAppState {
        verifier: Arc::new(config.payment.webhook_verifier()),
        booking_ledger: booking_ledger.clone(),
        processed_webhooks: processed_webhooks.clone(),
    };

    tokio::spawn(prune_idempotency_state(processed_webhooks, booking_ledger));

    let app = app_router(state, &config.server);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        log_format = ?config.server.log_format,
        webhook_tolerance_secs = config.payment.webhook_tolerance_secs,
        line_ending_fallback = config.payment.line_ending_fallback,
        "Rentio payments service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.uses_json_logs() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn prune_idempotency_state(
    store: Arc<InMemoryProcessedWebhookStore>,
    ledger: Arc<InMemoryBookingLedger>,
) {
    let mut interval = tokio::time::interval(PRUNE_INTERVAL);
    loop {
        interval.tick().await;
        let cutoff = chrono::Utc::now() - chrono::Duration::days(PROCESSED_WEBHOOK_RETENTION_DAYS);
        match store.delete_before(cutoff).await {
            Ok(0) => {}
            Ok(deleted) => tracing::debug!(deleted, "Pruned processed webhook records"),
            Err(e) => tracing::warn!(error = %e, "Failed to prune processed webhook records"),
        }
        let forgotten = ledger.forget_events_before(cutoff).await;
        if forgotten > 0 {
            tracing::debug!(forgotten, "Pruned applied ledger event ids");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
