//! FestPass HTTP server.
//!
//! Binary entry point: loads configuration, connects the registration
//! store, wires production providers into the environment, and serves the
//! Axum router until shutdown.
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d
//!
//! # Run server
//! cargo run -p festpass-server
//! ```

use festpass_registration::providers::{HttpLedgerClient, HttpWebhookNotifier, RazorpayGateway, SmtpConfirmationMailer};
use festpass_registration::stores::{
    PostgresPassRepository, PostgresRegistrationStore, PostgresSubEventRepository,
};
use festpass_registration::{metrics, Config, RegistrationEnvironment, RegistrationService};
use festpass_server::{build_router, AppState};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,festpass=debug,sqlx=warn,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FestPass registration server");

    // Load configuration
    let config = Config::from_env();
    info!(
        postgres_url = %config.postgres.url,
        bypass = config.payment.bypass,
        send_email = config.notifications.send_confirmation_email,
        "Configuration loaded"
    );

    metrics::register_metrics();

    // Connect the registration store
    info!("Connecting to registration database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .min_connections(config.postgres.min_connections)
        .acquire_timeout(Duration::from_secs(config.postgres.connect_timeout))
        .connect(&config.postgres.url)
        .await?;
    info!("Registration database connected");

    // Wire the environment: every collaborator is injected here, never
    // loaded mid-request.
    let mut env = RegistrationEnvironment::new(
        Arc::new(PostgresRegistrationStore::new(pool.clone())),
        Arc::new(PostgresPassRepository::new(pool.clone())),
        Arc::new(PostgresSubEventRepository::new(pool.clone())),
        Arc::new(RazorpayGateway::new(
            config.payment.key_id.clone(),
            config.payment.key_secret.clone(),
        )),
        Arc::new(SmtpConfirmationMailer::new(
            config.notifications.smtp_host.clone(),
            config.notifications.smtp_port,
            config.notifications.smtp_username.clone(),
            config.notifications.smtp_password.clone(),
            config.notifications.from_email.clone(),
            config.notifications.from_name.clone(),
        )),
        config.payment.clone(),
        config.notifications.clone(),
    );

    if let Some(url) = &config.notifications.ledger_webhook_url {
        info!(endpoint = %url, "Ledger webhook enabled");
        env = env.with_ledger(Arc::new(HttpLedgerClient::new(url.clone())));
    }
    if let Some(url) = &config.notifications.automation_webhook_url {
        info!(endpoint = %url, "Automation webhook enabled");
        env = env.with_webhook(Arc::new(HttpWebhookNotifier::new(url.clone())));
    }

    let state = AppState::new(RegistrationService::new(env), pool);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
