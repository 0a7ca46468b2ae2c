mod classifier;
mod config;
mod dispatcher;
mod engine;
mod extraction;
mod models;
mod recap;
mod scheduler;
mod server;
mod storage;
mod telegram;
#[cfg(test)]
mod testing;
mod types;

use std::fs;
use std::future::pending;
use std::io::stderr;
use std::process::exit;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Config, DatabaseLocation};
use crate::dispatcher::{BotContext, Dispatcher};
use crate::engine::DispatchEngine;
use crate::extraction::{Extractor, OpenRouterExtractor};
use crate::scheduler::{spawn_weekly_recap, WEEKLY_RECAP};
use crate::server::{router, ServerState};
use crate::storage::{MemoryStorage, SqliteStorage, Storage};
use crate::telegram::{Messenger, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    let log_level = config.log_level.as_deref()
        .map(parse_log_level).unwrap_or(LevelFilter::INFO);

    setup_logging(log_level);

    for notice in &config.notices {
        warn!("{notice}");
    }

    let storage = open_storage(&config.database)?;
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramClient::new(&config.bot_token));
    let extractor: Arc<dyn Extractor> = Arc::new(OpenRouterExtractor::new(
        &config.openrouter_base_url,
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone()
    ));

    let dispatcher = Arc::new(Dispatcher::new(BotContext {
        storage,
        extractor,
        messenger: messenger.clone(),
        authorized_user: config.authorized_user
    }));

    let engine = Arc::new(DispatchEngine::spawn(dispatcher.clone(), config.worker_limit, config.queue_capacity));
    let scheduler = spawn_weekly_recap(dispatcher, WEEKLY_RECAP);

    let app = router(ServerState {
        engine: engine.clone(),
        messenger,
        public_url: config.public_url.clone()
    });

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();

    match Arc::try_unwrap(engine) {
        Ok(engine) => engine.shutdown().await?,
        Err(_) => warn!("Dispatch engine is still shared, queued messages were not drained")
    }

    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {error}");
        pending::<()>().await;
    }

    info!("Shutdown signal received, draining queued messages");
}

fn open_storage(database: &DatabaseLocation) -> Result<Arc<dyn Storage>> {
    match database {
        DatabaseLocation::Memory => {
            warn!("Using in-memory storage, expenses are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        },
        DatabaseLocation::Sqlite(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            Ok(Arc::new(SqliteStorage::open(path)?))
        }
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
