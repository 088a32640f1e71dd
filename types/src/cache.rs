use std::time::Duration;

/// Resource classes the Response Cache assigns distinct TTLs to (spec.md §4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    Summoner,
    Ranked,
    MatchDetail,
    MatchList,
    Mastery,
    LiveGame,
}

/// Default TTLs; the orchestrator's config wins over these when the two
/// disagree (spec.md §9, Open Question 3 — resolved in DESIGN.md).
impl TtlClass {
    pub fn default_ttl(&self) -> Duration {
        match self {
            TtlClass::Summoner => Duration::from_secs(15 * 60),
            TtlClass::Ranked => Duration::from_secs(5 * 60),
            TtlClass::MatchDetail => Duration::from_secs(24 * 60 * 60),
            TtlClass::MatchList => Duration::from_secs(10 * 60),
            TtlClass::Mastery => Duration::from_secs(30 * 60),
            TtlClass::LiveGame => Duration::from_secs(15),
        }
    }
}

/// `{canonical_key, body, inserted_at, ttl_class}` (spec.md §3).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub canonical_key: String,
    pub body: Vec<u8>,
    pub inserted_at: std::time::Instant,
    pub ttl_class: TtlClass,
}

impl CacheEntry {
    pub fn is_expired(&self, now: std::time::Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}

/// Builds the canonical cache key described in spec.md §4.C:
/// `"riot:{region}:{endpoint}:{params_sorted}"`.
pub fn canonical_key(region: &str, endpoint: &str, params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let params_sorted = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("riot:{region}:{endpoint}:{params_sorted}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_sorts_params() {
        let a = canonical_key("NA1", "match-ids", &[("count", "10"), ("start", "0")]);
        let b = canonical_key("NA1", "match-ids", &[("start", "0"), ("count", "10")]);
        assert_eq!(a, b);
        assert_eq!(a, "riot:NA1:match-ids:count=10&start=0");
    }
}
