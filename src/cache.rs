use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::response::AnalyzeResponse;

/// Caches `analyze` responses under a composite key including tier and
/// time_window (spec.md §4.H). A distinct store from `herald-riot-api`'s
/// byte-oriented [`herald_riot_api::Cache`] — this one holds the fully
/// composed business response, not raw upstream bytes.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, (Instant, AnalyzeResponse)>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<AnalyzeResponse> {
        let entries = self.entries.lock().expect("response cache poisoned");
        match entries.get(key) {
            Some((inserted_at, response)) if inserted_at.elapsed() < self.ttl => Some(response.clone()),
            _ => None,
        }
    }

    pub fn put(&self, key: String, response: AnalyzeResponse) {
        let mut entries = self.entries.lock().expect("response cache poisoned");
        entries.insert(key, (Instant::now(), response));
    }
}

/// Composite key: `{name}:{region}:{tier}:{time_window}` (spec.md §4.H).
pub fn composite_key(
    region: herald_types::Region,
    name: &str,
    tier: herald_types::SubscriptionTier,
    time_window: Option<Duration>,
) -> String {
    format!(
        "{}:{}:{}:{}",
        region.code(),
        name,
        tier,
        time_window.map(|w| w.as_secs().to_string()).unwrap_or_else(|| "all".into())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_types::{AnalyticsResult, BenchmarkPercentiles, MetricSummary, Region, SubscriptionTier, Summoner, Trend, TrendDirection};

    fn sample_response() -> AnalyzeResponse {
        let zero = MetricSummary {
            mean: 0.0,
            median: 0.0,
            best: 0.0,
            worst: 0.0,
            std_dev: 0.0,
        };
        AnalyzeResponse {
            summoner: Summoner {
                id: "id".into(),
                puuid: "puuid".into(),
                name: "X".into(),
                level: 30,
                icon_id: 1,
                region: Region::Na1,
            },
            ranked: Vec::new(),
            analytics: AnalyticsResult {
                player_puuid: "puuid".into(),
                matches_considered: 0,
                kda: zero,
                cs_per_min: zero,
                cs_efficiency: 0.0,
                vision_score: zero,
                damage_share: zero,
                gold_per_min: zero,
                gold_efficiency: 0.0,
                kda_trend: Trend {
                    direction: TrendDirection::InsufficientData,
                    slope: 0.0,
                    confidence: 0.0,
                },
                benchmarks: BenchmarkPercentiles {
                    role: 0.0,
                    rank: 0.0,
                    global: 0.0,
                },
                recommendations: Vec::new(),
                partial: false,
                missing_count: 0,
            },
            live_game: None,
            processing_ms: 0,
            cache_hit: false,
            freshness: crate::response::Freshness::Live,
        }
    }

    #[test]
    fn put_then_get_before_ttl_returns_response() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = composite_key(Region::Na1, "Foo", SubscriptionTier::Free, None);
        cache.put(key.clone(), sample_response());

        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn different_tiers_are_different_cache_keys() {
        let free_key = composite_key(Region::Na1, "Foo", SubscriptionTier::Free, None);
        let pro_key = composite_key(Region::Na1, "Foo", SubscriptionTier::Pro, None);
        assert_ne!(free_key, pro_key);
    }
}
