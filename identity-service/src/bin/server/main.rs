use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use identity_service::config::Config;
use identity_service::config::StorageBackend;
use identity_service::domain::identity::ports::AuthenticationServicePort;
use identity_service::domain::identity::service::AuthenticationService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use identity_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage_backend = ?config.storage.backend,
        storage_timeout_ms = config.storage.timeout_ms,
        jwt_algorithm = ?config.jwt.algorithm,
        jwt_expiration_minutes = config.jwt.expiration_minutes,
        hashing = ?config.hashing,
        "Configuration loaded"
    );

    let password_hasher = PasswordHasher::with_params(config.hashing)?;
    let token_codec = TokenCodec::with_algorithm(config.jwt.secret.as_bytes(), config.jwt.algorithm);
    let authenticator = Arc::new(Authenticator::new(
        password_hasher,
        token_codec,
        config.token_ttl(),
    ));

    let auth_service: Arc<dyn AuthenticationServicePort> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.storage_timeout().max(Duration::from_secs(1)))
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AuthenticationService::new(
                Arc::new(PostgresCredentialStore::new(pg_pool)),
                authenticator,
                config.storage_timeout(),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory credential store; identities are lost on restart");

            Arc::new(AuthenticationService::new(
                Arc::new(InMemoryCredentialStore::new()),
                authenticator,
                config.storage_timeout(),
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service)).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
