//! # stats-bot
//!
//! Connects the stats services to a chat server: REST client, gateway client
//! and the event handlers, wired together by [`run`].

pub mod client;
pub mod handlers;
pub mod protocol;

use std::sync::Arc;

use stats_cache::{RedisCounterStore, RedisPool};
use stats_common::{AppConfig, AppError, AppResult};
use stats_service::{CommandSurface, StartupRecord, StatsContext, SurfaceSettings};
use tokio::sync::mpsc;
use tracing::info;

use crate::client::{GatewayClient, RestChatClient};
use crate::handlers::EventHandler;

/// Dispatch events buffered between the gateway and the handler
const EVENT_BUFFER_SIZE: usize = 256;

/// Build every dependency, then serve gateway events until Ctrl+C
pub async fn run(config: AppConfig) -> AppResult<()> {
    info!("Connecting to Redis...");
    let pool = RedisPool::from_config(&config.redis)?;
    pool.health_check().await?;
    info!("Redis connection established");

    let store = Arc::new(RedisCounterStore::new(pool.clone()));
    let chat = Arc::new(RestChatClient::new(&config.chat)?);
    let ctx = StatsContext::new(store, chat);

    let started = StartupRecord::new(&ctx).record().await?;
    info!(started = %started, "Startup recorded");

    let surface = Arc::new(CommandSurface::new(
        ctx,
        SurfaceSettings::from(&config.stats),
    ));
    let handler = EventHandler::new(surface, config.stats.live_counting);
    let gateway = GatewayClient::new(&config.chat);

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER_SIZE);
    let dispatch = async {
        while let Some(event) = rx.recv().await {
            handler.handle(event).await;
        }
    };

    let result = tokio::select! {
        result = gateway.run(tx) => result.map_err(AppError::from),
        () = dispatch => Ok(()),
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    pool.close();
    result
}
