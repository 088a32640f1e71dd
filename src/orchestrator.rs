use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use herald_analytics::{benchmark, GoldEfficiencyWeights, TrendConfig};
use herald_hub::SubscriptionHub;
use herald_ingestion::{IngestRequest, Pipeline, SummonerRef};
use herald_riot_api::client::RiotApi;
use herald_types::{Region, SubscriptionTier};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{instrument, warn};

use crate::cache::{composite_key, ResponseCache};
use crate::error::CoreError;
use crate::response::{AnalyzeResponse, CompareResponse, Freshness, Insights, TrendWindowResult};

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// H of spec.md §4: a pure composition of E + F with policy, exposing
/// `analyze`/`compare`/`trends`/`insights`.
pub struct SummonerService {
    pipeline: Pipeline,
    hub: Arc<SubscriptionHub>,
    cache: ResponseCache,
    weights: GoldEfficiencyWeights,
    trend_config: TrendConfig,
    /// Per-(region, summoner) semaphore sized to the requesting tier's
    /// `concurrent_requests()` cap (spec.md §4.H tier policy table).
    concurrency_limits: Mutex<HashMap<(Region, String), Arc<Semaphore>>>,
}

impl SummonerService {
    pub fn new(api: Arc<dyn RiotApi>, concurrency: usize, hub: Arc<SubscriptionHub>, response_ttl: Duration) -> Self {
        Self {
            pipeline: Pipeline::new(api, concurrency),
            hub,
            cache: ResponseCache::new(response_ttl),
            weights: GoldEfficiencyWeights::default(),
            trend_config: TrendConfig::default(),
            concurrency_limits: Mutex::new(HashMap::new()),
        }
    }

    fn concurrency_semaphore(&self, region: Region, name: &str, tier: SubscriptionTier) -> Arc<Semaphore> {
        let mut map = self.concurrency_limits.lock().expect("concurrency map poisoned");
        map.entry((region, name.to_string()))
            .or_insert_with(|| Arc::new(Semaphore::new(tier.concurrent_requests())))
            .clone()
    }

    /// `analyze(request) → response` (spec.md §4.H): runs E + F, caches the
    /// response under a composite key including tier and time_window.
    #[instrument(skip(self))]
    pub async fn analyze(
        &self,
        region: Region,
        name: &str,
        tier: SubscriptionTier,
        time_window: Option<Duration>,
        deadline: Instant,
    ) -> Result<AnalyzeResponse, CoreError> {
        let semaphore = self.concurrency_semaphore(region, name, tier);
        let _permit = semaphore
            .try_acquire_owned()
            .map_err(|_| CoreError::TooManyConcurrentRequests)?;

        let key = composite_key(region, name, tier, time_window);
        if let Some(mut cached) = self.cache.get(&key) {
            cached.cache_hit = true;
            cached.freshness = Freshness::Cached;
            return Ok(cached);
        }

        let started = Instant::now();
        let request = IngestRequest {
            region,
            summoner: SummonerRef::Name(name.to_string()),
            tier,
            time_window,
            requested_depth: None,
        };

        let ingested = self.pipeline.run(request, deadline, None).await?;

        let role_gpm_benchmark = mean(&benchmark::distributions_for(benchmark::Metric::GoldPerMin).role);
        let role_cs_benchmark = mean(&benchmark::distributions_for(benchmark::Metric::CsPerMin).role);

        let mut analytics = herald_analytics::analyze(
            &ingested.summoner.puuid,
            &ingested.matches,
            role_gpm_benchmark,
            role_cs_benchmark,
            self.weights,
            self.trend_config,
        );
        analytics.partial = ingested.partial;
        analytics.missing_count = ingested.missing_count;

        let live_game = if tier.live_game_enabled() {
            match self
                .pipeline
                .api()
                .get_live_game(region, &ingested.summoner.puuid, deadline)
                .await
            {
                Ok(live) => live,
                Err(e) => {
                    warn!(%region, error = %e, "live game lookup failed, omitting from response");
                    None
                }
            }
        } else {
            None
        };

        let response = AnalyzeResponse {
            summoner: ingested.summoner,
            ranked: ingested.ranked,
            analytics,
            live_game,
            processing_ms: started.elapsed().as_millis() as u64,
            cache_hit: false,
            freshness: Freshness::Live,
        };

        self.cache.put(key, response.clone());
        Ok(response)
    }

    /// `compare(r1, r2) → diff` (spec.md §4.H): runs `analyze` twice (with
    /// cache) and computes a fixed set of paired metric deltas and a
    /// bounded list of strengths per side.
    pub async fn compare(
        &self,
        region: Region,
        left_name: &str,
        right_name: &str,
        tier: SubscriptionTier,
        deadline: Instant,
    ) -> Result<CompareResponse, CoreError> {
        let left = self.analyze(region, left_name, tier, None, deadline).await?;
        let right = self.analyze(region, right_name, tier, None, deadline).await?;

        let kda_delta = left.analytics.kda.mean - right.analytics.kda.mean;
        let cs_per_min_delta = left.analytics.cs_per_min.mean - right.analytics.cs_per_min.mean;
        let damage_share_delta = left.analytics.damage_share.mean - right.analytics.damage_share.mean;
        let gold_efficiency_delta = left.analytics.gold_efficiency - right.analytics.gold_efficiency;

        const MAX_STRENGTHS: usize = 3;
        let mut left_strengths = Vec::new();
        let mut right_strengths = Vec::new();

        for (label, delta) in [
            ("kda", kda_delta),
            ("cs_per_min", cs_per_min_delta),
            ("damage_share", damage_share_delta),
            ("gold_efficiency", gold_efficiency_delta),
        ] {
            if delta > 0.0 {
                left_strengths.push(label.to_string());
            } else if delta < 0.0 {
                right_strengths.push(label.to_string());
            }
        }
        left_strengths.truncate(MAX_STRENGTHS);
        right_strengths.truncate(MAX_STRENGTHS);

        Ok(CompareResponse {
            kda_delta,
            cs_per_min_delta,
            damage_share_delta,
            gold_efficiency_delta,
            left_strengths,
            right_strengths,
        })
    }

    /// `trends(name, windows[]) → per-window metrics` (spec.md §4.H): runs E
    /// once with the maximum window and slices the match set for each
    /// sub-window. Gated by `tier.predictions_enabled()` — the per-window
    /// slicing is the forward-looking trend projection the policy table
    /// calls "Predictions".
    pub async fn trends(
        &self,
        region: Region,
        name: &str,
        tier: SubscriptionTier,
        windows: &[Duration],
        deadline: Instant,
    ) -> Result<Vec<TrendWindowResult>, CoreError> {
        if !tier.predictions_enabled() {
            return Err(CoreError::TierFeatureUnavailable("trend predictions"));
        }

        let max_window = windows.iter().copied().max();
        let request = IngestRequest {
            region,
            summoner: SummonerRef::Name(name.to_string()),
            tier,
            time_window: max_window,
            requested_depth: None,
        };

        let ingested = self.pipeline.run(request, deadline, None).await?;

        let role_gpm_benchmark = mean(&benchmark::distributions_for(benchmark::Metric::GoldPerMin).role);
        let role_cs_benchmark = mean(&benchmark::distributions_for(benchmark::Metric::CsPerMin).role);
        let now_millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;

        let mut results = Vec::with_capacity(windows.len());
        for &window in windows {
            let cutoff = now_millis - window.as_millis() as i64;
            let slice: Vec<_> = ingested
                .matches
                .iter()
                .filter(|m| m.game_creation >= cutoff)
                .cloned()
                .collect();

            let analytics = herald_analytics::analyze(
                &ingested.summoner.puuid,
                &slice,
                role_gpm_benchmark,
                role_cs_benchmark,
                self.weights,
                self.trend_config,
            );
            results.push(TrendWindowResult { window, analytics });
        }

        Ok(results)
    }

    /// `insights(name) → coaching insights` (spec.md §4.H): derived strictly
    /// from an analytics result; no additional upstream calls. Gated by
    /// `tier.coaching_enabled()` — tiers without the coaching feature get an
    /// empty recommendation list rather than a call-time error.
    pub fn insights(&self, response: &AnalyzeResponse, tier: SubscriptionTier) -> Insights {
        if !tier.coaching_enabled() {
            return Insights {
                headline: "Coaching insights are not available on this subscription tier.".to_string(),
                recommendations: Vec::new(),
            };
        }

        let headline = match response.analytics.kda_trend.direction {
            herald_types::TrendDirection::Improving => {
                format!("{}'s KDA is trending up.", response.summoner.name)
            }
            herald_types::TrendDirection::Declining => {
                format!("{}'s KDA is trending down.", response.summoner.name)
            }
            herald_types::TrendDirection::Stable => {
                format!("{}'s performance has been consistent.", response.summoner.name)
            }
            herald_types::TrendDirection::InsufficientData => {
                format!("Not enough recent matches for {} to call a trend.", response.summoner.name)
            }
        };

        Insights {
            headline,
            recommendations: response.analytics.recommendations.clone(),
        }
    }

    pub fn hub(&self) -> &Arc<SubscriptionHub> {
        &self.hub
    }
}
