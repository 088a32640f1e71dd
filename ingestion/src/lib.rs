//! Ingestion Pipeline (spec.md §4.E): resolves a summoner analysis request
//! into a match set by orchestrating Riot Client calls, with bounded
//! concurrency and partial-failure tolerance.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use herald_riot_api::client::RiotApi;
use herald_riot_api::{Cache, RiotClientError};
use herald_types::{Match, QueueId, RankedEntry, Region, SubscriptionTier, Summoner};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Queues considered relevant to analytics; matches outside this set are
/// dropped from the match set (spec.md §4.E step 6).
const PRIORITIZED_QUEUES: [QueueId; 4] = [
    QueueId::RankedSolo,
    QueueId::RankedFlex,
    QueueId::NormalDraft,
    QueueId::Aram,
];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("summoner not found")]
    NotFound,
    #[error("rate limit exhausted: retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("riot API key rejected")]
    Forbidden,
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("ingestion cancelled before completion")]
    Cancelled,
}

impl From<RiotClientError> for IngestError {
    fn from(value: RiotClientError) -> Self {
        match value {
            RiotClientError::NotFound => IngestError::NotFound,
            RiotClientError::RateLimited { retry_after } => IngestError::RateLimited { retry_after },
            RiotClientError::Forbidden => IngestError::Forbidden,
            RiotClientError::BadRequest(s) => IngestError::BadRequest(s),
            RiotClientError::Cancelled => IngestError::Cancelled,
            other => IngestError::Upstream(other.to_string()),
        }
    }
}

pub enum SummonerRef {
    Name(String),
    Puuid(String),
}

/// `IngestRequest{region, summoner_name|puuid, tier, time_window,
/// requested_depth?, use_cache}` (spec.md §4.E).
pub struct IngestRequest {
    pub region: Region,
    pub summoner: SummonerRef,
    pub tier: SubscriptionTier,
    pub time_window: Option<Duration>,
    pub requested_depth: Option<usize>,
}

/// `(summoner, ranked, match_set, cache_hits)` (spec.md §4.E step 7).
pub struct IngestResult {
    pub summoner: Summoner,
    pub ranked: Vec<RankedEntry>,
    pub matches: Vec<Match>,
    pub cache_hits: u64,
    pub missing_count: u32,
    pub partial: bool,
}

/// `0..100` with a descriptive stage tag (spec.md §4.E).
pub type ProgressCallback = Arc<dyn Fn(u8, &str) + Send + Sync>;

pub struct Pipeline {
    api: Arc<dyn RiotApi>,
    cache: Option<Arc<dyn Cache>>,
    /// Bounded concurrency degree for per-match fetches, applied *before*
    /// the rate limiter so queueing happens locally (spec.md §4.E step 5).
    concurrency: usize,
}

impl Pipeline {
    pub fn new(api: Arc<dyn RiotApi>, concurrency: usize) -> Self {
        Self {
            api,
            cache: None,
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The underlying Riot Client trait object, for callers that need a
    /// direct call outside the ingestion flow (e.g. a tier-gated live-game
    /// lookup in `herald-core`'s orchestrator).
    pub fn api(&self) -> &Arc<dyn RiotApi> {
        &self.api
    }

    pub async fn run(
        &self,
        request: IngestRequest,
        deadline: Instant,
        progress: Option<ProgressCallback>,
    ) -> Result<IngestResult, IngestError> {
        let report = |pct: u8, stage: &str| {
            if let Some(cb) = &progress {
                cb(pct, stage);
            }
        };

        let cache_hits_before = self.cache_hits().await;

        report(0, "resolving summoner");
        let summoner = match &request.summoner {
            SummonerRef::Name(name) => {
                self.api
                    .get_summoner_by_name(request.region, name, deadline)
                    .await?
            }
            SummonerRef::Puuid(puuid) => {
                self.api
                    .get_summoner_by_puuid(request.region, puuid, deadline)
                    .await?
            }
        };

        report(15, "fetching ranked info");
        let ranked = match self.api.get_ranked(request.region, &summoner.puuid, deadline).await {
            Ok(entries) => entries,
            Err(RiotClientError::Cancelled) => return Err(IngestError::Cancelled),
            Err(e) => {
                warn!(puuid = %summoner.puuid, error = %e, "ranked info unavailable, proceeding without it");
                Vec::new()
            }
        };

        let depth = request
            .requested_depth
            .unwrap_or_else(|| request.tier.match_depth_cap())
            .min(request.tier.match_depth_cap());

        report(25, "fetching match id list");
        let match_ids = self
            .api
            .get_match_ids(request.region, &summoner.puuid, 0, depth as u32, deadline)
            .await?;

        report(40, "fetching match details");
        let (matches, missing_count) = self
            .fetch_matches(request.region, &match_ids, deadline)
            .await?;

        report(85, "filtering match set");
        let mut matches: Vec<Match> = matches
            .into_iter()
            .filter(|m| PRIORITIZED_QUEUES.contains(&m.queue_id))
            .filter(|m| within_time_window(m, request.time_window))
            .collect();
        // Out-of-order completion is expected; the consumer (Analytics
        // Engine) depends on chronological order (spec.md §5).
        matches.sort_by_key(|m| m.game_creation);

        report(100, "done");

        let cache_hits = self.cache_hits().await.saturating_sub(cache_hits_before);

        Ok(IngestResult {
            summoner,
            ranked,
            matches,
            cache_hits,
            missing_count,
            partial: missing_count > 0,
        })
    }

    async fn cache_hits(&self) -> u64 {
        match &self.cache {
            Some(cache) => cache.stats().await.hits,
            None => 0,
        }
    }

    /// Step 5: bounded-concurrency per-match fetch. Individual failures are
    /// swallowed and counted rather than aborting the whole request
    /// (spec.md §4.E, Design Notes "swallowed per-match failures are
    /// counted rather than silently discarded").
    async fn fetch_matches(
        &self,
        region: Region,
        match_ids: &[String],
        deadline: Instant,
    ) -> Result<(Vec<Match>, u32), IngestError> {
        let missing = AtomicU32::new(0);
        let api = &self.api;

        let results: Vec<Option<Match>> = stream::iter(match_ids.iter().cloned())
            .map(|match_id| {
                let api = api.clone_ref();
                async move {
                    match api.get_match(region, &match_id, deadline).await {
                        Ok(m) => Some(m),
                        Err(RiotClientError::Cancelled) => None,
                        Err(e) => {
                            debug!(%match_id, error = %e, "per-match fetch failed, skipping");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let matches: Vec<Match> = results.into_iter().flatten().collect();
        missing.store((match_ids.len() - matches.len()) as u32, Ordering::SeqCst);

        if Instant::now() >= deadline {
            return Err(IngestError::Cancelled);
        }

        Ok((matches, missing.load(Ordering::SeqCst)))
    }
}

fn within_time_window(m: &Match, window: Option<Duration>) -> bool {
    let Some(window) = window else { return true };
    let now_millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64;
    let cutoff = now_millis - window.as_millis() as i64;
    m.game_creation >= cutoff
}

/// Extension so `Arc<dyn RiotApi>` can be cheaply captured by each spawned
/// fetch without tying the trait itself to `Clone`.
trait CloneRef {
    fn clone_ref(&self) -> Arc<dyn RiotApi>;
}

impl CloneRef for Arc<dyn RiotApi> {
    fn clone_ref(&self) -> Arc<dyn RiotApi> {
        Arc::clone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use herald_riot_api::client::{LiveGame, MasteryEntry};
    use std::sync::atomic::AtomicUsize;

    struct FakeApi {
        match_calls: AtomicUsize,
        fail_every_third: bool,
    }

    #[async_trait]
    impl RiotApi for FakeApi {
        async fn get_summoner_by_name(
            &self,
            region: Region,
            name: &str,
            _deadline: Instant,
        ) -> Result<Summoner, RiotClientError> {
            Ok(Summoner {
                id: "id".into(),
                puuid: "puuid".into(),
                name: name.to_string(),
                level: 100,
                icon_id: 1,
                region,
            })
        }

        async fn get_summoner_by_puuid(
            &self,
            region: Region,
            puuid: &str,
            _deadline: Instant,
        ) -> Result<Summoner, RiotClientError> {
            Ok(Summoner {
                id: "id".into(),
                puuid: puuid.into(),
                name: "X".into(),
                level: 100,
                icon_id: 1,
                region,
            })
        }

        async fn get_ranked(
            &self,
            _region: Region,
            _puuid: &str,
            _deadline: Instant,
        ) -> Result<Vec<RankedEntry>, RiotClientError> {
            Ok(Vec::new())
        }

        async fn get_match_ids(
            &self,
            _region: Region,
            _puuid: &str,
            _start: u32,
            count: u32,
            _deadline: Instant,
        ) -> Result<Vec<String>, RiotClientError> {
            Ok((0..count).map(|i| format!("MATCH_{i}")).collect())
        }

        async fn get_match(
            &self,
            region: Region,
            match_id: &str,
            _deadline: Instant,
        ) -> Result<Match, RiotClientError> {
            let n = self.match_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_every_third && n % 3 == 2 {
                return Err(RiotClientError::NotFound);
            }
            Ok(sample_match(region, match_id, 1_700_000_000_000 + n as i64))
        }

        async fn get_live_game(
            &self,
            _region: Region,
            _puuid: &str,
            _deadline: Instant,
        ) -> Result<Option<LiveGame>, RiotClientError> {
            Ok(None)
        }

        async fn get_mastery(
            &self,
            _region: Region,
            _puuid: &str,
            _deadline: Instant,
        ) -> Result<Vec<MasteryEntry>, RiotClientError> {
            Ok(Vec::new())
        }
    }

    fn sample_match(region: Region, match_id: &str, game_creation: i64) -> Match {
        let participant = herald_types::Participant {
            puuid: "puuid".into(),
            team_id: 100,
            win: true,
            role: "MIDDLE".into(),
            champion_name: "Ahri".into(),
            team_position: "MIDDLE".into(),
            kills: 5,
            deaths: 2,
            assists: 5,
            minions_killed: 150,
            neutral_minions_killed: 10,
            vision_score: 20.0,
            damage_to_champions: 20_000,
            gold_earned: 12_000,
            items: [0; 7],
            summoner_spells: [4, 7],
            profile_icon_id: 1,
        };
        Match {
            match_id: match_id.to_string(),
            region,
            game_creation,
            duration_seconds: 1800,
            queue_id: QueueId::RankedSolo,
            participants: std::array::from_fn(|_| participant.clone()),
            game_version: "14.1".into(),
            map_id: 11,
        }
    }

    #[tokio::test]
    async fn swallows_per_match_failures_and_counts_them() {
        let api: Arc<dyn RiotApi> = Arc::new(FakeApi {
            match_calls: AtomicUsize::new(0),
            fail_every_third: true,
        });
        let pipeline = Pipeline::new(api, 4);
        let request = IngestRequest {
            region: Region::Na1,
            summoner: SummonerRef::Name("Foo".into()),
            tier: SubscriptionTier::Free,
            time_window: None,
            requested_depth: Some(9),
        };

        let result = pipeline
            .run(request, Instant::now() + Duration::from_secs(5), None)
            .await
            .unwrap();

        assert_eq!(result.missing_count, 3);
        assert!(result.partial);
        assert_eq!(result.matches.len(), 6);
    }

    #[tokio::test]
    async fn match_set_is_sorted_chronologically() {
        let api: Arc<dyn RiotApi> = Arc::new(FakeApi {
            match_calls: AtomicUsize::new(0),
            fail_every_third: false,
        });
        let pipeline = Pipeline::new(api, 4);
        let request = IngestRequest {
            region: Region::Na1,
            summoner: SummonerRef::Puuid("puuid".into()),
            tier: SubscriptionTier::Pro,
            time_window: None,
            requested_depth: Some(5),
        };

        let result = pipeline
            .run(request, Instant::now() + Duration::from_secs(5), None)
            .await
            .unwrap();

        let creations: Vec<i64> = result.matches.iter().map(|m| m.game_creation).collect();
        let mut sorted = creations.clone();
        sorted.sort();
        assert_eq!(creations, sorted);
    }

    #[tokio::test]
    async fn depth_is_capped_by_tier() {
        let api: Arc<dyn RiotApi> = Arc::new(FakeApi {
            match_calls: AtomicUsize::new(0),
            fail_every_third: false,
        });
        let pipeline = Pipeline::new(api, 4);
        let request = IngestRequest {
            region: Region::Na1,
            summoner: SummonerRef::Puuid("puuid".into()),
            tier: SubscriptionTier::Free,
            time_window: None,
            requested_depth: Some(999),
        };

        let result = pipeline
            .run(request, Instant::now() + Duration::from_secs(5), None)
            .await
            .unwrap();

        assert_eq!(result.matches.len(), 10); // free tier cap
    }
}
