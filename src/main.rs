//! Course Club server binary.
//!
//! Loads configuration, installs tracing, connects to PostgreSQL, applies
//! migrations and serves the HTTP API until SIGINT/SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use course_club::adapters::auth::JwtSessions;
use course_club::adapters::email::{LoggingEmailSender, ResendConfig, ResendEmailSender};
use course_club::adapters::http::{app_router, AppPorts, AppState, HttpSettings};
use course_club::adapters::postgres::{
    PostgresContentReader, PostgresPurchaseRepository, PostgresUserRepository,
    PostgresVerificationTokenRepository, MIGRATOR,
};
use course_club::adapters::security::Argon2PasswordHasher;
use course_club::config::AppConfig;
use course_club::ports::EmailSender;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        policy = ?config.access.free_content_policy,
        "Starting course club"
    );
    if !config.payment.has_webhook_secret() {
        tracing::warn!(
            "No payment webhook secret configured; every webhook delivery will be rejected"
        );
    }

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let sessions = Arc::new(JwtSessions::new(
        &config.auth.session_secret,
        config.auth.session_ttl_hours,
    )?);

    let email_sender: Arc<dyn EmailSender> = match &config.email.resend_api_key {
        Some(key) => Arc::new(ResendEmailSender::new(ResendConfig::new(
            key.clone(),
            config.email.from_header(),
        ))?),
        None => {
            tracing::warn!("No Resend API key configured; emails will only be logged");
            Arc::new(LoggingEmailSender)
        }
    };

    let ports = AppPorts {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        contents: Arc::new(PostgresContentReader::new(pool.clone())),
        purchases: Arc::new(PostgresPurchaseRepository::new(pool.clone())),
        verification_tokens: Arc::new(PostgresVerificationTokenRepository::new(pool.clone())),
        session_validator: sessions.clone(),
        session_issuer: sessions,
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        email_sender,
    };
    let app = app_router(AppState::new(ports, HttpSettings::from_config(&config)));

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// the configured filter.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
