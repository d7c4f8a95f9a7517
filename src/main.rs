//! Deadline tracker server.
//!
//! Main entry point that wires all crates together, starts the notification
//! scheduler and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use deadline_api::jwt::JwtDecoder;
use deadline_api::{AppState, build_app};
use deadline_core::config::AppConfig;
use deadline_core::error::AppError;
use deadline_core::traits::{Clock, SystemClock};
use deadline_database::DatabasePool;
use deadline_database::repositories::{
    CollaboratorRepository, DeadlineRepository, FriendshipRepository, NotificationRepository,
    UserRepository,
};
use deadline_service::notifier::{
    DisabledEmailSender, EmailSender, InAppNotifier, SmtpEmailSender, StoredInAppNotifier,
};
use deadline_service::{
    AccessService, CollaborationService, DeadlineService, NotificationService, PreferenceChecker,
};
use deadline_worker::{CronScheduler, NotificationScheduler};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `DEADLINE_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DEADLINE_ENV").unwrap_or_else(|_| "development".to_string());
    let dir = std::env::var("DEADLINE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting deadline tracker v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        deadline_database::migration::run_migrations(db_pool.pool()).await?;
    }

    // ── Step 2: Initialize repositories ──────────────────────────
    let pg = db_pool.pool().clone();
    let deadline_repo = Arc::new(DeadlineRepository::new(pg.clone()));
    let collaborator_repo = Arc::new(CollaboratorRepository::new(pg.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(pg.clone()));
    let user_repo = Arc::new(UserRepository::new(pg.clone()));
    let friendship_repo = Arc::new(FriendshipRepository::new(pg));

    // ── Step 3: Delivery channels ────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let email: Arc<dyn EmailSender> = if config.email.enabled {
        Arc::new(SmtpEmailSender::new(&config.email)?)
    } else {
        tracing::info!("Email delivery disabled");
        Arc::new(DisabledEmailSender)
    };
    let in_app: Arc<dyn InAppNotifier> = Arc::new(
        StoredInAppNotifier::new(notification_repo.clone())
            .with_ttl_days(config.scheduler.in_app_ttl_days),
    );

    // ── Step 4: Initialize services ──────────────────────────────
    let access = Arc::new(AccessService::new(
        deadline_repo.clone(),
        collaborator_repo.clone(),
    ));
    let deadline_service = Arc::new(DeadlineService::new(
        deadline_repo.clone(),
        access.clone(),
        clock.clone(),
    ));
    let collaboration_service = Arc::new(CollaborationService::new(
        access.clone(),
        deadline_repo.clone(),
        collaborator_repo,
        user_repo.clone(),
        friendship_repo,
        in_app.clone(),
        clock.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(
        notification_repo.clone(),
        user_repo.clone(),
        clock.clone(),
    ));

    // ── Step 5: Notification scheduler ───────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cron = if config.scheduler.enabled {
        let notifications = Arc::new(NotificationScheduler::new(
            deadline_repo,
            user_repo.clone(),
            notification_repo,
            access,
            PreferenceChecker::new(user_repo),
            email,
            in_app,
            clock,
            config.scheduler.clone(),
        ));
        let cron = CronScheduler::new(notifications, config.scheduler.clone()).await?;
        cron.register_default_tasks().await?;
        cron.start().await?;
        Some(cron)
    } else {
        tracing::info!("Notification scheduler disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let state = AppState {
        server: Arc::new(config.server.clone()),
        db_pool: Some(db_pool.clone()),
        jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
        deadline_service,
        collaboration_service,
        notification_service,
    };
    let app = build_app(state);

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let server = deadline_api::app::serve(app, &config.server, shutdown_rx.clone());
    tokio::pin!(server);
    let mut draining = shutdown_rx;
    tokio::select! {
        result = &mut server => result?,
        _ = async {
            let _ = draining.wait_for(|stop| *stop).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed");
        }
    }

    // ── Step 7: Teardown ─────────────────────────────────────────
    if let Some(cron) = cron {
        if let Err(e) = cron.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    db_pool.close().await;

    tracing::info!("Deadline tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
}
