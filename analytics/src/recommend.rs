use herald_types::{BenchmarkPercentiles, Difficulty, Recommendation, RecommendationPriority};

use crate::config::MAX_RECOMMENDATIONS;

/// Percentile bands a metric value can fall into (spec.md §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Le25,
    P26to50,
    P51to75,
    Ge76,
}

fn band_of(percentile: f64) -> Band {
    let pct = percentile * 100.0;
    if pct <= 25.0 {
        Band::Le25
    } else if pct <= 50.0 {
        Band::P26to50
    } else if pct <= 75.0 {
        Band::P51to75
    } else {
        Band::Ge76
    }
}

struct Rule {
    metric: &'static str,
    band: Band,
    priority: RecommendationPriority,
    category: &'static str,
    expected_delta: f64,
    difficulty: Difficulty,
}

/// Declarative metric × percentile-band → tip table (spec.md §4.F). Output
/// is deterministic: same inputs always produce the same tip set in the
/// same order.
const RULES: &[Rule] = &[
    Rule {
        metric: "cs_per_min",
        band: Band::Le25,
        priority: RecommendationPriority::High,
        category: "farming",
        expected_delta: 1.5,
        difficulty: Difficulty::Moderate,
    },
    Rule {
        metric: "cs_per_min",
        band: Band::P26to50,
        priority: RecommendationPriority::Medium,
        category: "farming",
        expected_delta: 0.8,
        difficulty: Difficulty::Easy,
    },
    Rule {
        metric: "vision_score",
        band: Band::Le25,
        priority: RecommendationPriority::High,
        category: "vision",
        expected_delta: 8.0,
        difficulty: Difficulty::Easy,
    },
    Rule {
        metric: "vision_score",
        band: Band::P26to50,
        priority: RecommendationPriority::Medium,
        category: "vision",
        expected_delta: 4.0,
        difficulty: Difficulty::Easy,
    },
    Rule {
        metric: "damage_share",
        band: Band::Le25,
        priority: RecommendationPriority::Medium,
        category: "teamfighting",
        expected_delta: 0.05,
        difficulty: Difficulty::Hard,
    },
    Rule {
        metric: "kda",
        band: Band::Le25,
        priority: RecommendationPriority::High,
        category: "survivability",
        expected_delta: 0.6,
        difficulty: Difficulty::Moderate,
    },
    Rule {
        metric: "gold_efficiency",
        band: Band::Le25,
        priority: RecommendationPriority::Medium,
        category: "itemization",
        expected_delta: 10.0,
        difficulty: Difficulty::Moderate,
    },
    Rule {
        metric: "kda",
        band: Band::Ge76,
        priority: RecommendationPriority::Low,
        category: "consistency",
        expected_delta: 0.2,
        difficulty: Difficulty::Easy,
    },
];

/// Input percentiles keyed by metric name, using the `role` benchmark as
/// the banding reference (spec.md §4.F).
pub struct MetricPercentiles<'a> {
    pub name: &'a str,
    pub role_percentile: f64,
}

/// Generates a bounded, priority-ordered tip list from a table of metric
/// percentiles (spec.md §4.F).
pub fn generate(metrics: &[MetricPercentiles]) -> Vec<Recommendation> {
    let mut tips: Vec<Recommendation> = Vec::new();

    for metric in metrics {
        let band = band_of(metric.role_percentile);
        for rule in RULES {
            if rule.metric == metric.name && rule.band == band {
                tips.push(Recommendation {
                    priority: rule.priority,
                    category: rule.category.to_string(),
                    expected_delta: rule.expected_delta,
                    difficulty: rule.difficulty,
                });
            }
        }
    }

    tips.sort_by_key(|t| match t.priority {
        RecommendationPriority::High => 0,
        RecommendationPriority::Medium => 1,
        RecommendationPriority::Low => 2,
    });
    tips.truncate(MAX_RECOMMENDATIONS);
    tips
}

/// Helper for [`MetricPercentiles`] callers who already have the three-way
/// split and only want the role slice used for banding.
pub fn role_percentile(p: &BenchmarkPercentiles) -> f64 {
    p.role
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_percentile_cs_produces_high_priority_tip() {
        let metrics = [MetricPercentiles {
            name: "cs_per_min",
            role_percentile: 0.1,
        }];
        let tips = generate(&metrics);
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].priority, RecommendationPriority::High);
        assert_eq!(tips[0].category, "farming");
    }

    #[test]
    fn output_is_bounded_and_sorted_by_priority() {
        let metrics = [
            MetricPercentiles { name: "cs_per_min", role_percentile: 0.1 },
            MetricPercentiles { name: "vision_score", role_percentile: 0.1 },
            MetricPercentiles { name: "damage_share", role_percentile: 0.1 },
            MetricPercentiles { name: "kda", role_percentile: 0.1 },
            MetricPercentiles { name: "gold_efficiency", role_percentile: 0.1 },
            MetricPercentiles { name: "kda", role_percentile: 0.9 },
        ];
        let tips = generate(&metrics);
        assert!(tips.len() <= MAX_RECOMMENDATIONS);
        for window in tips.windows(2) {
            let a = window[0].priority as u8;
            let b = window[1].priority as u8;
            assert!(a <= b);
        }
    }

    #[test]
    fn high_percentile_produces_no_struggling_tip() {
        let metrics = [MetricPercentiles {
            name: "cs_per_min",
            role_percentile: 0.95,
        }];
        assert!(generate(&metrics).is_empty());
    }
}
