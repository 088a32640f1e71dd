use std::time::Duration;

use async_trait::async_trait;
use herald_types::{Match, RankedEntry, Region, Summoner, TtlClass};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::cache::Cache;
use crate::dto::{LiveGameDto, MasteryDto, MatchDto, SummonerDto};
use crate::error::{RiotClientError, UpstreamKind};
use crate::ratelimit::{Priority, RateLimiter};
use crate::region::RegionRouter;

/// Lightweight live-game view (spec.md §4.D `get_live_game`).
#[derive(Debug, Clone, PartialEq)]
pub struct LiveGame {
    pub game_id: i64,
    pub length_seconds: i64,
    pub participant_puuids: Vec<String>,
}

/// Champion mastery entry (spec.md §4.D `get_mastery`).
#[derive(Debug, Clone, PartialEq)]
pub struct MasteryEntry {
    pub champion_id: u32,
    pub points: u64,
    pub level: u32,
}

/// Object-safe abstraction over the Riot Client's typed operations
/// (spec.md §4.D). `herald-ingestion` depends on this trait, not on
/// [`HttpRiotClient`], per the interface-abstraction redesign in Design Notes.
#[async_trait]
pub trait RiotApi: Send + Sync {
    async fn get_summoner_by_name(
        &self,
        region: Region,
        name: &str,
        deadline: Instant,
    ) -> Result<Summoner, RiotClientError>;

    async fn get_summoner_by_puuid(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Summoner, RiotClientError>;

    async fn get_ranked(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Vec<RankedEntry>, RiotClientError>;

    async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
        deadline: Instant,
    ) -> Result<Vec<String>, RiotClientError>;

    async fn get_match(
        &self,
        region: Region,
        match_id: &str,
        deadline: Instant,
    ) -> Result<Match, RiotClientError>;

    async fn get_live_game(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Option<LiveGame>, RiotClientError>;

    async fn get_mastery(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Vec<MasteryEntry>, RiotClientError>;
}

#[derive(Debug, Clone, Copy)]
pub struct RiotClientConfig {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for RiotClientConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Composition of Regional Router + Rate Limiter + Response Cache
/// (spec.md §4.D).
pub struct HttpRiotClient<C> {
    http: reqwest::Client,
    router: RegionRouter,
    limiter: RateLimiter,
    cache: C,
    api_key: String,
    user_agent: String,
    config: RiotClientConfig,
}

impl<C: Cache> HttpRiotClient<C> {
    pub fn new(
        router: RegionRouter,
        limiter: RateLimiter,
        cache: C,
        api_key: String,
        config: RiotClientConfig,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("failed to build reqwest client"),
            router,
            limiter,
            cache,
            api_key,
            user_agent: "herald-riot-ingestion/1.0 (+https://herald.internal)".to_string(),
            config,
        }
    }

    /// `fetch(region, path, params, class) → bytes` (spec.md §4.D), the
    /// seven-step contract: cache check, rate-limit acquire, GET with
    /// retries/backoff, status handling, cache write.
    #[instrument(skip(self, params), fields(region = %region, path))]
    async fn fetch(
        &self,
        region: Region,
        path: &str,
        params: &[(&str, &str)],
        class: TtlClass,
        priority: Priority,
        deadline: Instant,
    ) -> Result<Vec<u8>, RiotClientError> {
        let key = herald_types::cache::canonical_key(region.code(), path, params);

        if let Some(body) = self.cache.get(&key, class.default_ttl()).await.map_err(|e| {
            RiotClientError::Upstream {
                kind: UpstreamKind::Transient,
                message: e.to_string(),
            }
        })? {
            debug!(cache = "hit", %key);
            return Ok(body);
        }

        let base_url = self.router.base_url(region);
        let mut url = format!("{base_url}{path}");
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{query}");
        }

        let mut attempt = 0u32;
        let mut backoff = self.config.initial_backoff;

        loop {
            if Instant::now() >= deadline {
                return Err(RiotClientError::Cancelled);
            }

            let outcome = self.limiter.acquire(region, priority, deadline).await;
            if !outcome.admitted {
                return Err(RiotClientError::RateLimited {
                    retry_after: outcome.retry_after.unwrap_or(self.config.initial_backoff),
                });
            }

            let response = self
                .http
                .get(&url)
                .header("X-Riot-Token", &self.api_key)
                .header(reqwest::header::USER_AGENT, &self.user_agent)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if attempt < self.config.max_retries && (e.is_timeout() || e.is_connect()) => {
                    attempt += 1;
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    continue;
                }
                Err(e) => return Err(RiotClientError::Transport(e)),
            };

            match response.status() {
                StatusCode::OK => {
                    let bytes = read_bounded_body(response, self.config.max_body_bytes).await?;
                    let _ = self.cache.put(&key, bytes.clone(), class).await;
                    return Ok(bytes);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_header(&response).unwrap_or(Duration::from_secs(1));
                    self.limiter.observe_429(region, retry_after).await;
                    if attempt >= self.config.max_retries {
                        return Err(RiotClientError::RateLimited { retry_after });
                    }
                    attempt += 1;
                    tokio::time::sleep(retry_after).await;
                    continue;
                }
                StatusCode::NOT_FOUND => return Err(RiotClientError::NotFound),
                StatusCode::FORBIDDEN => {
                    warn!("riot API key rejected (403)");
                    return Err(RiotClientError::Forbidden);
                }
                status if status.is_client_error() => {
                    return Err(RiotClientError::BadRequest(status.to_string()));
                }
                status if status.is_server_error() => {
                    if attempt >= self.config.max_retries {
                        return Err(RiotClientError::Upstream {
                            kind: UpstreamKind::Fatal,
                            message: status.to_string(),
                        });
                    }
                    attempt += 1;
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    continue;
                }
                status => {
                    return Err(RiotClientError::Upstream {
                        kind: UpstreamKind::Fatal,
                        message: status.to_string(),
                    });
                }
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        region: Region,
        path: &str,
        params: &[(&str, &str)],
        class: TtlClass,
        priority: Priority,
        deadline: Instant,
    ) -> Result<T, RiotClientError> {
        let bytes = self.fetch(region, path, params, class, priority, deadline).await?;
        serde_json::from_slice(&bytes).map_err(RiotClientError::Decode)
    }
}

async fn read_bounded_body(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, RiotClientError> {
    if let Some(len) = response.content_length() {
        if len as usize > max_bytes {
            return Err(RiotClientError::ResponseTooLarge);
        }
    }
    let bytes = response.bytes().await.map_err(RiotClientError::Transport)?;
    if bytes.len() > max_bytes {
        return Err(RiotClientError::ResponseTooLarge);
    }
    Ok(bytes.to_vec())
}

fn retry_after_header(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl<C: Cache> RiotApi for HttpRiotClient<C> {
    async fn get_summoner_by_name(
        &self,
        region: Region,
        name: &str,
        deadline: Instant,
    ) -> Result<Summoner, RiotClientError> {
        let path = format!("/lol/summoner/v4/summoners/by-name/{}", urlencoding::encode(name));
        let dto: SummonerDto = self
            .fetch_json(region, &path, &[], TtlClass::Summoner, Priority::Normal, deadline)
            .await?;
        Ok(dto.into_summoner(region))
    }

    async fn get_summoner_by_puuid(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Summoner, RiotClientError> {
        let path = format!("/lol/summoner/v4/summoners/by-puuid/{puuid}");
        let dto: SummonerDto = self
            .fetch_json(region, &path, &[], TtlClass::Summoner, Priority::Normal, deadline)
            .await?;
        Ok(dto.into_summoner(region))
    }

    async fn get_ranked(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Vec<RankedEntry>, RiotClientError> {
        let path = format!("/lol/league/v4/entries/by-puuid/{puuid}");
        let dtos: Vec<crate::dto::LeagueEntryDto> = self
            .fetch_json(region, &path, &[], TtlClass::Ranked, Priority::Normal, deadline)
            .await?;
        Ok(dtos.into_iter().filter_map(|d| d.into_ranked_entry()).collect())
    }

    async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
        deadline: Instant,
    ) -> Result<Vec<String>, RiotClientError> {
        let path = format!("/lol/match/v5/matches/by-puuid/{puuid}/ids");
        let start_s = start.to_string();
        let count_s = count.to_string();
        let params = [("start", start_s.as_str()), ("count", count_s.as_str())];
        self.fetch_json(region, &path, &params, TtlClass::MatchList, Priority::Normal, deadline)
            .await
    }

    async fn get_match(
        &self,
        region: Region,
        match_id: &str,
        deadline: Instant,
    ) -> Result<Match, RiotClientError> {
        let path = format!("/lol/match/v5/matches/{match_id}");
        let dto: MatchDto = self
            .fetch_json(region, &path, &[], TtlClass::MatchDetail, Priority::Normal, deadline)
            .await?;
        dto.into_match(region)
            .ok_or_else(|| RiotClientError::BadRequest("match did not have exactly 10 participants".into()))
    }

    async fn get_live_game(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Option<LiveGame>, RiotClientError> {
        let path = format!("/lol/spectator/v5/active-games/by-summoner/{puuid}");
        match self
            .fetch_json::<LiveGameDto>(region, &path, &[], TtlClass::LiveGame, Priority::High, deadline)
            .await
        {
            Ok(dto) => Ok(Some(LiveGame {
                game_id: dto.game_id,
                length_seconds: dto.game_length,
                participant_puuids: dto.participants.into_iter().map(|p| p.puuid).collect(),
            })),
            Err(RiotClientError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_mastery(
        &self,
        region: Region,
        puuid: &str,
        deadline: Instant,
    ) -> Result<Vec<MasteryEntry>, RiotClientError> {
        let path = format!("/lol/champion-mastery/v4/champion-masteries/by-puuid/{puuid}");
        let dtos: Vec<MasteryDto> = self
            .fetch_json(region, &path, &[], TtlClass::Mastery, Priority::Normal, deadline)
            .await?;
        Ok(dtos
            .into_iter()
            .map(|d| MasteryEntry {
                champion_id: d.champion_id,
                points: d.champion_points,
                level: d.champion_level,
            })
            .collect())
    }
}
