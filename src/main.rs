use anyhow::Result;
use cargodesk::application::services::{ApplicationServices, Ports, Repositories};
use cargodesk::config::AppConfig;
use cargodesk::infrastructure::{
    database,
    repositories::{
        PostgresAuditLogRepository, PostgresClearanceRepository, PostgresLeadRepository,
        PostgresOrderRepository, PostgresQuotationRepository, PostgresRoleRepository,
        PostgresShipmentRepository, PostgresUserRepository,
    },
    security::{Argon2PasswordHasher, PostgresTokenAuthenticator},
    time::SystemClock,
};
use cargodesk::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let repos = Repositories {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
        leads: Arc::new(PostgresLeadRepository::new(pool.clone())),
        quotations: Arc::new(PostgresQuotationRepository::new(pool.clone())),
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        shipments: Arc::new(PostgresShipmentRepository::new(pool.clone())),
        clearances: Arc::new(PostgresClearanceRepository::new(pool.clone())),
        audit_logs: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
    };
    let ports = Ports {
        clock: Arc::new(SystemClock::default()),
        password_hasher: Arc::new(Argon2PasswordHasher::default()),
        token_authenticator: Arc::new(PostgresTokenAuthenticator::new(pool)),
    };

    let services = Arc::new(ApplicationServices::new(repos, ports));
    let state = HttpState { services };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::warn!("failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => {
                tracing::warn!("failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
