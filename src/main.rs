//! SuGallery Server — multi-tenant image gallery with shareable links.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gallery_auth::captcha::{CaptchaService, PlainTextRenderer};
use gallery_auth::jwt::{JwtDecoder, JwtEncoder};
use gallery_auth::verification::LogMailer;
use gallery_cache::CacheManager;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_core::traits::cache::CacheProvider;
use gallery_core::traits::clock::{Clock, SystemClock};
use gallery_core::traits::mailer::Mailer;
use gallery_core::traits::storage::FileStore;
use gallery_database::repositories::{
    ImageRepository, ShareRepository, TagRepository, UserRepository, VerificationRepository,
};
use gallery_database::store::{ImageStore, ShareStore, TagStore, UserStore, VerificationStore};
use gallery_database::{DatabasePool, run_migrations};
use gallery_service::{ImageService, ShareAccessService, ShareService, TagService, UserService};
use gallery_storage::LocalFileStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("SUGALLERY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SuGallery v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    // Cache
    let cache: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache)?);

    // File storage
    let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.storage).await?);

    // Repositories behind their store traits
    let shares: Arc<dyn ShareStore> = Arc::new(ShareRepository::new(db.pool().clone()));
    let images: Arc<dyn ImageStore> = Arc::new(ImageRepository::new(db.pool().clone()));
    let tags: Arc<dyn TagStore> = Arc::new(TagRepository::new(db.pool().clone()));
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let verifications: Arc<dyn VerificationStore> =
        Arc::new(VerificationRepository::new(db.pool().clone()));

    // Auth plumbing
    let jwt_encoder = JwtEncoder::new(&config.auth);
    let jwt_decoder = JwtDecoder::new(&config.auth, Arc::clone(&cache));
    let captcha = CaptchaService::new(
        &config.auth,
        Arc::clone(&cache),
        Arc::new(PlainTextRenderer),
    );
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Services
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&shares),
        Arc::clone(&images),
        Arc::clone(&clock),
    ));
    let share_access = Arc::new(ShareAccessService::new(
        Arc::clone(&shares),
        Arc::clone(&images),
        Arc::clone(&clock),
    ));
    let image_service = Arc::new(ImageService::new(
        Arc::clone(&images),
        Arc::clone(&tags),
        Arc::clone(&files),
    ));
    let tag_service = Arc::new(TagService::new(Arc::clone(&tags)));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        Arc::clone(&verifications),
        Arc::clone(&mailer),
        Arc::clone(&clock),
        captcha,
        jwt_encoder,
        jwt_decoder.clone(),
        &config.auth,
        &config.email,
    ));

    // HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = gallery_api::AppState {
        config: Arc::new(config),
        db: db.clone(),
        jwt_decoder,
        shares: share_service,
        share_access,
        images: image_service,
        tags: tag_service,
        users: user_service,
    };

    let app = gallery_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SuGallery server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("SuGallery server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
