//! Shared value types for the Riot ingestion & analytics core.
//!
//! Everything here is a plain record keyed by stable IDs (PUUID, match ID,
//! region code) — no ORM, no cyclic references. Joins happen where the data
//! is assembled (the ingestion pipeline), not in these types.

pub mod analytics;
pub mod cache;
pub mod event;
pub mod match_data;
pub mod queue;
pub mod ranked;
pub mod region;
pub mod summoner;
pub mod tier;

pub use analytics::{
    AnalyticsResult, BenchmarkPercentiles, Difficulty, MetricSummary, Recommendation,
    RecommendationPriority, Trend, TrendDirection,
};
pub use cache::{CacheEntry, TtlClass};
pub use event::{Event, EventKind, EventPayload, Interest, Subscription};
pub use match_data::{Match, Participant};
pub use queue::QueueId;
pub use ranked::{MiniSeries, RankTier, RankedEntry};
pub use region::{Region, RegionInfo};
pub use summoner::Summoner;
pub use tier::SubscriptionTier;
