use herald_riot_api::client::LiveGame;
use herald_types::{AnalyticsResult, RankedEntry, Summoner};

/// Downstream response envelope consumed by the edge layer (spec.md §6):
/// `{summoner, ranked[], analytics{...}, live_game?, processing_ms,
/// cache_hit, freshness}`.
#[derive(Debug, Clone)]
pub struct AnalyzeResponse {
    pub summoner: Summoner,
    pub ranked: Vec<RankedEntry>,
    pub analytics: AnalyticsResult,
    pub live_game: Option<LiveGame>,
    pub processing_ms: u64,
    pub cache_hit: bool,
    pub freshness: Freshness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Live,
    Cached,
}

/// `compare(r1, r2) → diff` (spec.md §4.H): a fixed set of paired metric
/// deltas plus a bounded list of strengths per side.
#[derive(Debug, Clone)]
pub struct CompareResponse {
    pub kda_delta: f64,
    pub cs_per_min_delta: f64,
    pub damage_share_delta: f64,
    pub gold_efficiency_delta: f64,
    pub left_strengths: Vec<String>,
    pub right_strengths: Vec<String>,
}

/// `trends(name, windows[]) → per-window metrics` (spec.md §4.H).
#[derive(Debug, Clone)]
pub struct TrendWindowResult {
    pub window: std::time::Duration,
    pub analytics: AnalyticsResult,
}

/// `insights(name) → coaching insights` (spec.md §4.H): derived strictly
/// from an existing [`AnalyticsResult`], no additional upstream calls.
#[derive(Debug, Clone)]
pub struct Insights {
    pub headline: String,
    pub recommendations: Vec<herald_types::Recommendation>,
}
