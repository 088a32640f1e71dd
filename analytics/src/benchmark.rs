use std::sync::LazyLock;

use herald_types::BenchmarkPercentiles;

/// Three static, sorted sample distributions per metric: role, rank, global
/// (spec.md §4.F). These are representative population samples, not a live
/// feed from Riot's aggregate stats — the orchestrator may swap them out via
/// [`Distributions`] without changing the percentile math.
#[derive(Debug, Clone)]
pub struct Distributions {
    pub role: Vec<f64>,
    pub rank: Vec<f64>,
    pub global: Vec<f64>,
}

static KDA_BENCHMARKS: LazyLock<Distributions> = LazyLock::new(|| Distributions {
    role: sorted(vec![1.2, 1.8, 2.1, 2.4, 2.6, 2.9, 3.1, 3.4, 3.8, 4.5]),
    rank: sorted(vec![1.0, 1.5, 2.0, 2.3, 2.6, 2.9, 3.2, 3.6, 4.0, 4.8]),
    global: sorted(vec![0.9, 1.4, 1.9, 2.2, 2.5, 2.8, 3.1, 3.5, 4.1, 5.0]),
});

static CS_PER_MIN_BENCHMARKS: LazyLock<Distributions> = LazyLock::new(|| Distributions {
    role: sorted(vec![4.5, 5.2, 5.8, 6.3, 6.8, 7.2, 7.6, 8.1, 8.7, 9.5]),
    rank: sorted(vec![4.0, 4.8, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.6, 9.3]),
    global: sorted(vec![3.8, 4.6, 5.2, 5.8, 6.3, 6.9, 7.4, 8.0, 8.6, 9.4]),
});

static GOLD_PER_MIN_BENCHMARKS: LazyLock<Distributions> = LazyLock::new(|| Distributions {
    role: sorted(vec![280.0, 320.0, 350.0, 380.0, 400.0, 420.0, 445.0, 470.0, 510.0, 560.0]),
    rank: sorted(vec![270.0, 310.0, 340.0, 365.0, 390.0, 410.0, 435.0, 460.0, 500.0, 550.0]),
    global: sorted(vec![260.0, 300.0, 330.0, 355.0, 380.0, 400.0, 425.0, 450.0, 490.0, 540.0]),
});

static VISION_SCORE_BENCHMARKS: LazyLock<Distributions> = LazyLock::new(|| Distributions {
    role: sorted(vec![18.0, 22.0, 26.0, 29.0, 32.0, 35.0, 38.0, 42.0, 47.0, 55.0]),
    rank: sorted(vec![16.0, 20.0, 24.0, 27.0, 30.0, 33.0, 36.0, 40.0, 45.0, 53.0]),
    global: sorted(vec![15.0, 19.0, 23.0, 26.0, 29.0, 32.0, 35.0, 39.0, 44.0, 52.0]),
});

static DAMAGE_SHARE_BENCHMARKS: LazyLock<Distributions> = LazyLock::new(|| Distributions {
    role: sorted(vec![0.12, 0.16, 0.19, 0.21, 0.23, 0.25, 0.27, 0.29, 0.32, 0.37]),
    rank: sorted(vec![0.11, 0.15, 0.18, 0.20, 0.22, 0.24, 0.26, 0.28, 0.31, 0.36]),
    global: sorted(vec![0.10, 0.14, 0.17, 0.19, 0.21, 0.23, 0.25, 0.27, 0.30, 0.35]),
});

fn sorted(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Kda,
    CsPerMin,
    GoldPerMin,
    VisionScore,
    DamageShare,
}

pub fn distributions_for(metric: Metric) -> &'static Distributions {
    match metric {
        Metric::Kda => &KDA_BENCHMARKS,
        Metric::CsPerMin => &CS_PER_MIN_BENCHMARKS,
        Metric::GoldPerMin => &GOLD_PER_MIN_BENCHMARKS,
        Metric::VisionScore => &VISION_SCORE_BENCHMARKS,
        Metric::DamageShare => &DAMAGE_SHARE_BENCHMARKS,
    }
}

/// Fraction of a sorted distribution `<= value`, ties broken by midrank
/// (spec.md §4.F): `percentile = (count_less + 0.5 * count_equal) / n`.
pub fn percentile(distribution: &[f64], value: f64) -> f64 {
    if distribution.is_empty() {
        return 0.0;
    }
    let count_less = distribution.iter().filter(|&&v| v < value).count() as f64;
    let count_equal = distribution.iter().filter(|&&v| (v - value).abs() < f64::EPSILON).count() as f64;
    (count_less + 0.5 * count_equal) / distribution.len() as f64
}

pub fn percentiles_for(metric: Metric, value: f64) -> BenchmarkPercentiles {
    let d = distributions_for(metric);
    BenchmarkPercentiles {
        role: percentile(&d.role, value),
        rank: percentile(&d.rank, value),
        global: percentile(&d.global, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_min_value_is_low() {
        let dist = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&dist, 1.0), 0.1);
    }

    #[test]
    fn percentile_of_max_value_is_high() {
        let dist = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&dist, 5.0), 0.9);
    }

    #[test]
    fn percentile_of_empty_distribution_is_zero() {
        assert_eq!(percentile(&[], 10.0), 0.0);
    }

    #[test]
    fn benchmark_tables_are_sorted() {
        for metric in [
            Metric::Kda,
            Metric::CsPerMin,
            Metric::GoldPerMin,
            Metric::VisionScore,
            Metric::DamageShare,
        ] {
            let d = distributions_for(metric);
            for sample in [&d.role, &d.rank, &d.global] {
                let mut s = sample.clone();
                s.sort_by(|a, b| a.partial_cmp(b).unwrap());
                assert_eq!(&s, sample);
            }
        }
    }
}
