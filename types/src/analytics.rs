/// Aggregate view of one metric over a match set: mean plus the dispersion
/// figures spec.md §4.F calls for (KDA's "mean, median, best, worst, stddev").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub mean: f64,
    pub median: f64,
    pub best: f64,
    pub worst: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

/// OLS trend of one metric over chronological matches (spec.md §4.F).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub slope: f64,
    /// R², clamped to [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// One coaching tip (spec.md §4.F): `{priority, category, expected_delta, difficulty}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub category: String,
    pub expected_delta: f64,
    pub difficulty: Difficulty,
}

/// Percentile of a player's value against the three static benchmark
/// distributions (spec.md §4.F).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkPercentiles {
    pub role: f64,
    pub rank: f64,
    pub global: f64,
}

/// Derived from `{player_puuid, match_set, time_range}`; purely a function
/// of its inputs (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsResult {
    pub player_puuid: String,
    pub matches_considered: usize,

    pub kda: MetricSummary,
    pub cs_per_min: MetricSummary,
    pub cs_efficiency: f64,
    pub vision_score: MetricSummary,
    pub damage_share: MetricSummary,
    pub gold_per_min: MetricSummary,
    pub gold_efficiency: f64,

    pub kda_trend: Trend,
    pub benchmarks: BenchmarkPercentiles,
    pub recommendations: Vec<Recommendation>,

    /// Set when ingestion completed despite per-match failures.
    pub partial: bool,
    pub missing_count: u32,
}
