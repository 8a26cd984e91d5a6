//! # University Schedule Bot Main Entry Point
//!
//! Initializes logging, loads configuration and the timetable source table,
//! sets up the user database, optionally starts cache prefetching, and runs
//! the Telegram bot next to the health check server.

use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uni_schedule_bot::bot::context::BotContext;
use uni_schedule_bot::bot::handlers::BotHandler;
use uni_schedule_bot::config::Config;
use uni_schedule_bot::database::connection::DatabaseManager;
use uni_schedule_bot::schedule::{CachedLoader, GridCache, ScheduleService, SourceTable, SpreadsheetLoader};
use uni_schedule_bot::services::health::HealthService;
use uni_schedule_bot::services::prefetch::PrefetchService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uni_schedule_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting University Schedule Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Sources: {}",
        config.database_url,
        config.http_port,
        config.schedule_sources.display()
    );

    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let sources = SourceTable::load(&config.schedule_sources, &config.schedule_base_dir)?;
    info!("Loaded {} schedule source(s)", sources.source_count());

    let loader = SpreadsheetLoader::new(config.fetch_timeout).context("Failed to build HTTP client")?;
    let cache = Arc::new(GridCache::with_system_clock(config.cache_ttl));
    let schedule = Arc::new(
        ScheduleService::new(
            Arc::new(sources),
            CachedLoader::new(Arc::new(loader), cache),
            config.utc_offset()?,
        )
        .with_scan_limits(config.scan_concurrency, config.fetch_timeout),
    );

    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let ctx = BotContext::new(db_arc.as_ref().clone(), schedule.clone(), config.admin_chat_id);
    let handler = BotHandler::new(ctx);
    info!("Telegram bot initialized successfully");

    let mut prefetch_service = match &config.prefetch_cron {
        Some(cron) => {
            let mut service = PrefetchService::new(schedule.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create prefetch service: {}", e))?;
            if let Err(e) = service.start(cron).await {
                tracing::error!("Failed to start prefetch service: {}", e);
            }
            Some(service)
        }
        None => {
            info!("PREFETCH_CRON not set, documents are loaded on demand");
            None
        }
    };

    let health_service = HealthService::new(db_arc.clone(), schedule.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(handler.dependencies())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Some(service) = prefetch_service.as_mut() {
        if let Err(e) = service.stop().await {
            tracing::warn!("Error stopping prefetch service: {}", e);
        }
    }

    info!("Application stopped");
    Ok(())
}
