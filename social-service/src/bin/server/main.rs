use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use social_service::config::Config;
use social_service::config::StoreBackend;
use social_service::domain::identity::gate::AuthorizationGate;
use social_service::domain::identity::ports::IdentityServicePort;
use social_service::domain::identity::service::IdentityService;
use social_service::domain::post::ports::PostServicePort;
use social_service::domain::post::service::PostService;
use social_service::inbound::http::router::create_router;
use social_service::inbound::http::router::AppState;
use social_service::outbound::repositories::InMemoryIdentityRepository;
use social_service::outbound::repositories::InMemoryPostRepository;
use social_service::outbound::repositories::PostgresIdentityRepository;
use social_service::outbound::repositories::PostgresPostRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "social-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_days = config.jwt.expiration_days,
        "Configuration loaded"
    );

    let secret = config.jwt.signing_secret()?;
    let hasher = PasswordHasher::with_cost(config.password.hash_cost())?;
    let authenticator = Arc::new(Authenticator::from_parts(
        hasher,
        TokenService::with_ttl(secret.as_bytes(), config.jwt.token_ttl()?),
    ));
    let store_timeout = config.database.store_timeout();

    let (identity_service, post_service): (Arc<dyn IdentityServicePort>, Arc<dyn PostServicePort>) =
        match config.database.backend {
            StoreBackend::Postgres => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .acquire_timeout(store_timeout)
                    .connect(&config.database.url)
                    .await?;
                tracing::info!(
                    max_connections = config.database.max_connections,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let identities = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
                let posts = Arc::new(PostgresPostRepository::new(pg_pool));
                (
                    Arc::new(IdentityService::new(
                        Arc::clone(&identities),
                        Arc::clone(&authenticator),
                        store_timeout,
                    )),
                    Arc::new(PostService::new(posts, identities, store_timeout)),
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on shutdown");

                let identities = Arc::new(InMemoryIdentityRepository::new());
                let posts = Arc::new(InMemoryPostRepository::new());
                (
                    Arc::new(IdentityService::new(
                        Arc::clone(&identities),
                        Arc::clone(&authenticator),
                        store_timeout,
                    )),
                    Arc::new(PostService::new(posts, identities, store_timeout)),
                )
            }
        };

    let state = AppState {
        identity_service,
        post_service,
        gate: Arc::new(AuthorizationGate::new(authenticator)),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.server.cors_allowed_origins);
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
