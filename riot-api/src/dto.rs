//! Decoded upstream JSON shapes (spec.md §3/§6). Only the fields the core
//! actually uses are named; `#[serde(default)]`/ignoring unknown fields is
//! implicit in serde_json (unknown keys are dropped unless `deny_unknown_fields`
//! is set, which we never set here — spec.md §6 requires tolerating them).

use herald_types::{MiniSeries, Participant, RankTier, RankedEntry, Summoner};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub id: String,
    pub puuid: String,
    pub name: Option<String>,
    pub summoner_level: u32,
    pub profile_icon_id: u32,
}

impl SummonerDto {
    pub fn into_summoner(self, region: herald_types::Region) -> Summoner {
        Summoner {
            id: self.id,
            puuid: self.puuid,
            name: self.name.unwrap_or_default(),
            level: self.summoner_level,
            icon_id: self.profile_icon_id,
            region,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MiniSeriesDto {
    pub target: u8,
    pub wins: u8,
    pub losses: u8,
    pub progress: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: u32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub hot_streak: bool,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub league_id: String,
    pub mini_series: Option<MiniSeriesDto>,
}

impl LeagueEntryDto {
    pub fn into_ranked_entry(self) -> Option<RankedEntry> {
        let queue = match self.queue_type.as_str() {
            "RANKED_SOLO_5x5" => herald_types::QueueId::RankedSolo,
            "RANKED_FLEX_SR" => herald_types::QueueId::RankedFlex,
            _ => return None,
        };
        Some(RankedEntry {
            queue,
            tier: RankTier::parse(&self.tier)?,
            rank: self.rank,
            lp: self.league_points,
            wins: self.wins,
            losses: self.losses,
            hot_streak: self.hot_streak,
            mini_series: self.mini_series.map(|m| MiniSeries {
                target: m.target,
                wins: m.wins,
                losses: m.losses,
                progress: m.progress,
            }),
            league_id: self.league_id,
            veteran: self.veteran,
            inactive: self.inactive,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub game_creation: i64,
    pub game_duration: u64,
    pub game_version: String,
    pub map_id: u32,
    pub queue_id: u16,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub team_id: u8,
    pub win: bool,
    pub team_position: String,
    pub champion_name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,
    pub vision_score: f64,
    pub total_damage_dealt_to_champions: u64,
    pub gold_earned: u64,
    pub profile_icon: Option<u32>,
    #[serde(default)]
    pub item0: u32,
    #[serde(default)]
    pub item1: u32,
    #[serde(default)]
    pub item2: u32,
    #[serde(default)]
    pub item3: u32,
    #[serde(default)]
    pub item4: u32,
    #[serde(default)]
    pub item5: u32,
    #[serde(default)]
    pub item6: u32,
    #[serde(default)]
    pub summoner1_id: u32,
    #[serde(default)]
    pub summoner2_id: u32,
}

impl ParticipantDto {
    pub fn into_participant(self) -> Participant {
        Participant {
            puuid: self.puuid,
            team_id: self.team_id,
            win: self.win,
            role: self.team_position.clone(),
            champion_name: self.champion_name,
            team_position: self.team_position,
            kills: self.kills,
            deaths: self.deaths,
            assists: self.assists,
            minions_killed: self.total_minions_killed,
            neutral_minions_killed: self.neutral_minions_killed,
            vision_score: self.vision_score,
            damage_to_champions: self.total_damage_dealt_to_champions,
            gold_earned: self.gold_earned,
            items: [
                self.item0, self.item1, self.item2, self.item3, self.item4, self.item5,
                self.item6,
            ],
            summoner_spells: [self.summoner1_id, self.summoner2_id],
            profile_icon_id: self.profile_icon.unwrap_or_default(),
        }
    }
}

impl MatchDto {
    pub fn into_match(self, region: herald_types::Region) -> Option<herald_types::Match> {
        let participants: Vec<Participant> = self
            .info
            .participants
            .into_iter()
            .map(ParticipantDto::into_participant)
            .collect();
        let participants: [Participant; 10] = participants.try_into().ok()?;
        Some(herald_types::Match {
            match_id: self.metadata.match_id,
            region,
            game_creation: self.info.game_creation,
            duration_seconds: self.info.game_duration,
            queue_id: self.info.queue_id.into(),
            participants,
            game_version: self.info.game_version,
            map_id: self.info.map_id,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameDto {
    pub game_id: i64,
    pub game_length: i64,
    pub participants: Vec<LiveParticipantDto>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveParticipantDto {
    pub puuid: String,
    pub champion_id: u32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MasteryDto {
    pub champion_id: u32,
    pub champion_points: u64,
    pub champion_level: u32,
}
