use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use herald_types::Region;

use crate::error::CoreError;

/// Process configuration, loaded once at startup (spec.md §6 "Environment").
/// Required: API key, coordination store address, region list. Everything
/// else has a documented default.
#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub coordination_store_address: String,
    pub regions: Vec<Region>,

    pub burst_fraction: f64,
    pub ingestion_concurrency: usize,
    pub queue_capacity: usize,
    pub requests_per_minute: NonZeroU32,

    pub analyze_timeout: Duration,
    pub fetch_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub idle_timeout: Duration,

    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();

        const DEFAULT_BURST_FRACTION: f64 = 0.1;
        const DEFAULT_INGESTION_CONCURRENCY: usize = 6;
        const DEFAULT_QUEUE_CAPACITY: usize = 256;
        const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;
        const DEFAULT_ANALYZE_TIMEOUT_SECS: u64 = 120;
        const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
        const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 15;
        const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| CoreError::Config("RIOT_API_KEY must be set".into()))?;

        let coordination_store_address = env::var("COORDINATION_STORE_ADDRESS")
            .unwrap_or_else(|_| "in-memory".into());

        let regions = env::var("HERALD_REGIONS")
            .ok()
            .map(|raw| parse_regions(&raw))
            .transpose()?
            .unwrap_or_else(|| vec![Region::Na1, Region::Euw1]);

        let burst_fraction = env::var("BURST_FRACTION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BURST_FRACTION);

        let ingestion_concurrency = env::var("INGESTION_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INGESTION_CONCURRENCY)
            .clamp(4, 8);

        let queue_capacity = env::var("QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        let requests_per_minute = env::var("REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| NonZeroU32::new(DEFAULT_REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN));

        let analyze_timeout = Duration::from_secs(
            env::var("ANALYZE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ANALYZE_TIMEOUT_SECS),
        );

        let fetch_timeout = Duration::from_secs(
            env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        );

        let heartbeat_interval = Duration::from_secs(
            env::var("HEARTBEAT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL_SECS),
        );

        let idle_timeout = Duration::from_secs(
            env::var("IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS),
        );

        let log_dir = env::var("LOG_DIR").ok();

        Ok(Self {
            riot_api_key,
            coordination_store_address,
            regions,
            burst_fraction,
            ingestion_concurrency,
            queue_capacity,
            requests_per_minute,
            analyze_timeout,
            fetch_timeout,
            heartbeat_interval,
            idle_timeout,
            log_dir,
        })
    }
}

fn parse_regions(raw: &str) -> Result<Vec<Region>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Region::from_str(s).map_err(|_| CoreError::Config(format!("unknown region: {s}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_regions_accepts_comma_separated_codes() {
        let regions = parse_regions("NA1, EUW1,KR").unwrap();
        assert_eq!(regions, vec![Region::Na1, Region::Euw1, Region::Kr]);
    }

    #[test]
    fn parse_regions_rejects_unknown_code() {
        assert!(parse_regions("NA1,ZZ9").is_err());
    }
}
