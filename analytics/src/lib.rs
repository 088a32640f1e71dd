//! Analytics Engine (spec.md §4.F): pure, side-effect-free computation over
//! an already-ingested match set. No tokio, no reqwest, no I/O — every
//! function here is a total function of its inputs.

pub mod benchmark;
pub mod config;
pub mod metrics;
pub mod recommend;
pub mod trend;

use herald_types::{AnalyticsResult, Match};

pub use config::{GoldEfficiencyWeights, TrendConfig, MAX_RECOMMENDATIONS};

/// Computes an [`AnalyticsResult`] for `player_puuid` over `matches`, which
/// must already be sorted chronologically by the ingestion pipeline
/// (spec.md §5). `role_gpm_benchmark`/`role_cs_benchmark` select which row
/// of the static benchmark tables is used for efficiency ratios.
pub fn analyze(
    player_puuid: &str,
    matches: &[Match],
    role_gpm_benchmark: f64,
    role_cs_benchmark: f64,
    weights: GoldEfficiencyWeights,
    trend_config: TrendConfig,
) -> AnalyticsResult {
    let mut kdas = Vec::with_capacity(matches.len());
    let mut cs_values = Vec::with_capacity(matches.len());
    let mut vision_values = Vec::new();
    let mut damage_shares = Vec::new();
    let mut gpm_values = Vec::with_capacity(matches.len());
    let mut gold_eff_values = Vec::with_capacity(matches.len());

    for m in matches {
        let Some(p) = m.participant(player_puuid) else {
            continue;
        };

        kdas.push(metrics::kda(p.kills, p.deaths, p.assists));
        cs_values.push(metrics::cs_per_min(p.total_cs(), m.duration_seconds));
        gpm_values.push(metrics::gold_per_min(p.gold_earned, m.duration_seconds));
        gold_eff_values.push(metrics::gold_efficiency(
            p,
            m.duration_seconds,
            role_gpm_benchmark,
            weights,
        ));

        if metrics::vision_score_is_valid(p.vision_score, m.duration_seconds) {
            vision_values.push(p.vision_score);
        }

        let team_damage = metrics::team_damage_for(m, p);
        if let Some(share) = metrics::damage_share(p.damage_to_champions, team_damage) {
            damage_shares.push(share);
        }
    }

    let kda_summary = metrics::summarize(&kdas);
    let cs_summary = metrics::summarize(&cs_values);
    let vision_summary = metrics::summarize(&vision_values);
    let damage_summary = metrics::summarize(&damage_shares);
    let gpm_summary = metrics::summarize(&gpm_values);
    let gold_efficiency = metrics::summarize(&gold_eff_values).mean;

    let cs_efficiency = metrics::cs_efficiency(cs_summary.mean, role_cs_benchmark);
    let kda_trend = trend::fit(&kdas, trend_config);

    let benchmarks = benchmark::percentiles_for(benchmark::Metric::Kda, kda_summary.mean);

    let recommendation_inputs = [
        recommend::MetricPercentiles {
            name: "cs_per_min",
            role_percentile: benchmark::percentile(
                &benchmark::distributions_for(benchmark::Metric::CsPerMin).role,
                cs_summary.mean,
            ),
        },
        recommend::MetricPercentiles {
            name: "kda",
            role_percentile: benchmarks.role,
        },
        recommend::MetricPercentiles {
            name: "vision_score",
            role_percentile: benchmark::percentile(
                &benchmark::distributions_for(benchmark::Metric::VisionScore).role,
                vision_summary.mean,
            ),
        },
        recommend::MetricPercentiles {
            name: "damage_share",
            role_percentile: benchmark::percentile(
                &benchmark::distributions_for(benchmark::Metric::DamageShare).role,
                damage_summary.mean,
            ),
        },
        recommend::MetricPercentiles {
            name: "gold_efficiency",
            role_percentile: gold_efficiency / 100.0,
        },
    ];
    let recommendations = recommend::generate(&recommendation_inputs);

    AnalyticsResult {
        player_puuid: player_puuid.to_string(),
        matches_considered: kdas.len(),
        kda: kda_summary,
        cs_per_min: cs_summary,
        cs_efficiency,
        vision_score: vision_summary,
        damage_share: damage_summary,
        gold_per_min: gpm_summary,
        gold_efficiency,
        kda_trend,
        benchmarks,
        recommendations,
        partial: false,
        missing_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_types::{Participant, QueueId, Region};

    fn participant(puuid: &str, kills: u32, deaths: u32, assists: u32) -> Participant {
        Participant {
            puuid: puuid.to_string(),
            team_id: 100,
            win: true,
            role: "MIDDLE".into(),
            champion_name: "Ahri".into(),
            team_position: "MIDDLE".into(),
            kills,
            deaths,
            assists,
            minions_killed: 180,
            neutral_minions_killed: 20,
            vision_score: 30.0,
            damage_to_champions: 20_000,
            gold_earned: 12_000,
            items: [1, 2, 3, 4, 5, 6, 0],
            summoner_spells: [4, 7],
            profile_icon_id: 1,
        }
    }

    fn sample_match(idx: i64, kills: u32, deaths: u32, assists: u32) -> Match {
        let mine = participant("me", kills, deaths, assists);
        let enemy = participant("enemy", 3, 3, 3);
        let mut participants: [Participant; 10] = std::array::from_fn(|_| enemy.clone());
        participants[0] = mine;
        for p in &mut participants[5..] {
            p.team_id = 200;
        }

        Match {
            match_id: format!("M{idx}"),
            region: Region::Na1,
            game_creation: idx,
            duration_seconds: 1800,
            queue_id: QueueId::RankedSolo,
            participants,
            game_version: "14.1".into(),
            map_id: 11,
        }
    }

    #[test]
    fn analyze_computes_matches_considered_and_kda() {
        let matches: Vec<Match> = (0..6).map(|i| sample_match(i, 8, 2, 6)).collect();
        let result = analyze(
            "me",
            &matches,
            400.0,
            6.5,
            GoldEfficiencyWeights::default(),
            TrendConfig::default(),
        );

        assert_eq!(result.matches_considered, 6);
        assert_eq!(result.kda.mean, 7.0);
        assert!(!result.partial);
    }

    #[test]
    fn analyze_skips_matches_missing_the_player() {
        let mut matches: Vec<Match> = (0..5).map(|i| sample_match(i, 8, 2, 6)).collect();
        for p in &mut matches[0].participants {
            if p.puuid == "me" {
                p.puuid = "someone_else".to_string();
            }
        }

        let result = analyze(
            "me",
            &matches,
            400.0,
            6.5,
            GoldEfficiencyWeights::default(),
            TrendConfig::default(),
        );

        assert_eq!(result.matches_considered, 4);
    }
}
