use crate::queue::QueueId;
use crate::region::Region;

/// `{match_id, region, game_creation, duration, queue_id, participants[10]}`
/// (spec.md §3). Immutable once fetched — this is what justifies the long
/// cache TTL on match detail.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: String,
    pub region: Region,
    /// Epoch millis.
    pub game_creation: i64,
    pub duration_seconds: u64,
    pub queue_id: QueueId,
    pub participants: [Participant; 10],
    /// Carried through from the upstream DTO, unused by analytics; kept so
    /// decoding the real shape never has to drop fields (spec.md §6).
    pub game_version: String,
    pub map_id: u32,
}

impl Match {
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }

    /// Sum of a team's champion damage, used as the damage-share denominator.
    pub fn team_champion_damage(&self, team_id: u8) -> u64 {
        self.participants
            .iter()
            .filter(|p| p.team_id == team_id)
            .map(|p| p.damage_to_champions)
            .sum()
    }
}

/// Per-player per-match stats (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub puuid: String,
    pub team_id: u8,
    pub win: bool,
    pub role: String,
    pub champion_name: String,
    pub team_position: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub minions_killed: u32,
    pub neutral_minions_killed: u32,
    pub vision_score: f64,
    pub damage_to_champions: u64,
    pub gold_earned: u64,
    pub items: [u32; 7],
    pub summoner_spells: [u32; 2],
    pub profile_icon_id: u32,
}

impl Participant {
    pub fn total_cs(&self) -> u32 {
        self.minions_killed + self.neutral_minions_killed
    }
}
