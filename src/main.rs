//! Entry point of the Herald Riot Ingestion & Analytics Core.
//!
//! Wires the Riot Client, Ingestion Pipeline, Analytics Engine and
//! Subscription Hub behind the Summoner Service, then idles until shutdown.
//! The HTTP/REST edge that would call into `SummonerService` is out of
//! scope for this core (spec.md §1 Non-goals).

use std::sync::Arc;

use herald_core::{Config, SummonerService};
use herald_hub::{HubConfig, SubscriptionHub};
use herald_riot_api::client::{HttpRiotClient, RiotApi, RiotClientConfig};
use herald_riot_api::ratelimit::{RateLimiter, RateLimiterConfig};
use herald_riot_api::region::RegionRouter;
use herald_riot_api::InMemoryCache;
use herald_types::Region;
use tracing::{error, info};

mod logging;

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("invalid configuration");
    logging::init(config.log_dir.as_deref());

    info!("Herald core starting");

    let default_region = config.regions.first().copied().unwrap_or(Region::Na1);
    let router = RegionRouter::new(default_region);

    let limiter_config = RateLimiterConfig {
        long_limit: config.requests_per_minute,
        long_window: std::time::Duration::from_secs(60),
        burst_fraction: config.burst_fraction,
        ..RateLimiterConfig::default()
    };
    let limiter = RateLimiter::new(limiter_config);

    let client_config = RiotClientConfig {
        request_timeout: config.fetch_timeout,
        ..RiotClientConfig::default()
    };
    let client = HttpRiotClient::new(
        router,
        limiter,
        InMemoryCache::new(),
        config.riot_api_key.clone(),
        client_config,
    );
    let api: Arc<dyn RiotApi> = Arc::new(client);

    let hub = Arc::new(SubscriptionHub::new(HubConfig {
        queue_capacity: config.queue_capacity,
        heartbeat_interval: config.heartbeat_interval,
        idle_timeout: config.idle_timeout,
    }));
    let heartbeat_handle = Arc::clone(&hub).spawn_heartbeat_loop();

    let _service = SummonerService::new(
        api,
        config.ingestion_concurrency,
        hub,
        config.analyze_timeout,
    );

    info!("Herald core ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
    }

    heartbeat_handle.abort();
    info!("Herald core shutting down");
}
