//! Summoner Service (spec.md §4.H): the orchestrator crate wiring the
//! Riot Client, Ingestion Pipeline, Analytics Engine and Subscription Hub
//! behind a small policy-aware public API.

pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod response;

pub use config::Config;
pub use error::CoreError;
pub use orchestrator::SummonerService;
pub use response::{AnalyzeResponse, CompareResponse, Freshness, Insights, TrendWindowResult};
