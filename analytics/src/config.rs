/// Weights for the gold-efficiency composite (spec.md §4.F, GLOSSARY). The
/// source never pinned exact numbers beyond the component names, so the
/// glossary defaults are used and exposed here as configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldEfficiencyWeights {
    pub gpm: f64,
    pub item_completion: f64,
    pub farming_share: f64,
    pub objective_share: f64,
}

impl Default for GoldEfficiencyWeights {
    fn default() -> Self {
        Self {
            gpm: 0.40,
            item_completion: 0.25,
            farming_share: 0.20,
            objective_share: 0.15,
        }
    }
}

/// Trend-fit knobs (spec.md §4.F): `stable` when `|slope| < epsilon` or
/// `R² < confidence_min`; `insufficient_data` below `min_matches`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    pub epsilon: f64,
    pub confidence_min: f64,
    pub min_matches: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            confidence_min: 0.3,
            min_matches: 5,
        }
    }
}

/// Bounded recommendation list size (spec.md §4.F "at most N tips").
pub const MAX_RECOMMENDATIONS: usize = 5;
