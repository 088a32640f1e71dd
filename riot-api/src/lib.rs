//! Regional Riot API client: router, rate limiter, response cache and the
//! HTTP client that composes them (spec.md §4.A–D).

pub mod cache;
pub mod client;
pub mod dto;
pub mod error;
pub mod ratelimit;
pub mod region;

pub use cache::{Cache, InMemoryCache};
pub use client::{HttpRiotClient, RiotApi};
pub use error::RiotClientError;
pub use ratelimit::{AcquireOutcome, Priority, RateLimiter, RateLimiterConfig};
pub use region::{RegionRouter, RouterError};
