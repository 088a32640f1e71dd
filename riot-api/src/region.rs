use std::collections::HashMap;
use std::str::FromStr;

use herald_types::{QueueId, RankTier, Region, REGION_TABLE};
use thiserror::Error;

/// A.3 of spec.md §4.A. Holds the static region table and the closed sets of
/// valid queue IDs and rank tiers.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

/// Regional Router (spec.md §4.A). Unknown regions fall back to a default
/// *and* return a recoverable `UnknownRegion` error, per spec.
#[derive(Debug, Clone)]
pub struct RegionRouter {
    default_region: Region,
    /// Per-region base URL overrides, used by tests to point at a mock
    /// server instead of the real Riot hosts.
    overrides: HashMap<Region, String>,
}

impl RegionRouter {
    pub fn new(default_region: Region) -> Self {
        Self {
            default_region,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, region: Region, base_url: impl Into<String>) -> Self {
        self.overrides.insert(region, base_url.into());
        self
    }

    /// Resolve a region code (accepting the aliases `Region::from_str`
    /// understands) to its base URL. Unknown codes fall back to the
    /// configured default and surface `UnknownRegion`.
    pub fn resolve(&self, code: &str) -> (String, Result<(), RouterError>) {
        match Region::from_str(code) {
            Ok(region) => (self.base_url(region), Ok(())),
            Err(_) => (
                self.base_url(self.default_region),
                Err(RouterError::UnknownRegion(code.to_string())),
            ),
        }
    }

    pub fn base_url(&self, region: Region) -> String {
        if let Some(url) = self.overrides.get(&region) {
            return url.clone();
        }
        REGION_TABLE
            .iter()
            .find(|r| r.code == region)
            .map(|r| r.base_url.to_string())
            .unwrap_or_else(|| self.default_base_url())
    }

    fn default_base_url(&self) -> String {
        REGION_TABLE
            .iter()
            .find(|r| r.code == self.default_region)
            .expect("default region must be in REGION_TABLE")
            .base_url
            .to_string()
    }

    pub fn is_supported(&self, region: Region) -> bool {
        REGION_TABLE
            .iter()
            .any(|r| r.code == region && r.enabled)
    }

    pub fn rate_multiplier(&self, region: Region) -> f64 {
        REGION_TABLE
            .iter()
            .find(|r| r.code == region)
            .map(|r| r.rate_multiplier)
            .unwrap_or(1.0)
    }

    pub fn queue_is_ranked(&self, queue: QueueId) -> bool {
        queue.is_ranked()
    }

    pub fn tier_order(&self, name: &str) -> Option<u8> {
        RankTier::parse(name).map(|t| t.order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_region_falls_back_and_errors() {
        let router = RegionRouter::new(Region::Na1);
        let (url, result) = router.resolve("ZZ9");
        assert_eq!(url, router.base_url(Region::Na1));
        assert!(matches!(result, Err(RouterError::UnknownRegion(ref s)) if s == "ZZ9"));
    }

    #[test]
    fn known_region_resolves_without_error() {
        let router = RegionRouter::new(Region::Na1);
        let (url, result) = router.resolve("EUW1");
        assert_eq!(url, "https://euw1.api.riotgames.com");
        assert!(result.is_ok());
    }

    #[test]
    fn ru_is_disabled_by_default() {
        let router = RegionRouter::new(Region::Na1);
        assert!(!router.is_supported(Region::Ru));
        assert!(router.is_supported(Region::Na1));
    }

    #[test]
    fn tier_order_ranks_challenger_above_iron() {
        let router = RegionRouter::new(Region::Na1);
        assert!(router.tier_order("CHALLENGER") > router.tier_order("IRON"));
    }
}
