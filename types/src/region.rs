use std::fmt;
use std::str::FromStr;

/// Closed set of platform routing values the core supports (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Na1,
    Euw1,
    Eun1,
    Kr,
    Jp1,
    Br1,
    La1,
    La2,
    Oc1,
    Tr1,
    Ru,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::Na1,
        Region::Euw1,
        Region::Eun1,
        Region::Kr,
        Region::Jp1,
        Region::Br1,
        Region::La1,
        Region::La2,
        Region::Oc1,
        Region::Tr1,
        Region::Ru,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Na1 => "NA1",
            Region::Euw1 => "EUW1",
            Region::Eun1 => "EUN1",
            Region::Kr => "KR",
            Region::Jp1 => "JP1",
            Region::Br1 => "BR1",
            Region::La1 => "LA1",
            Region::La2 => "LA2",
            Region::Oc1 => "OC1",
            Region::Tr1 => "TR1",
            Region::Ru => "RU",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NA1" | "NA" => Ok(Region::Na1),
            "EUW1" | "EUW" => Ok(Region::Euw1),
            "EUN1" | "EUNE" => Ok(Region::Eun1),
            "KR" => Ok(Region::Kr),
            "JP1" | "JP" => Ok(Region::Jp1),
            "BR1" | "BR" => Ok(Region::Br1),
            "LA1" | "LAN" => Ok(Region::La1),
            "LA2" | "LAS" => Ok(Region::La2),
            "OC1" | "OCE" => Ok(Region::Oc1),
            "TR1" | "TR" => Ok(Region::Tr1),
            "RU" => Ok(Region::Ru),
            other => Err(other.to_string()),
        }
    }
}

/// Static record for one region: base URL, rate multiplier, enabled flag.
///
/// `rate_multiplier` scales the configured short/long window limits for
/// regions Riot documents as having a different effective budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionInfo {
    pub code: Region,
    pub base_url: &'static str,
    pub rate_multiplier: f64,
    pub enabled: bool,
}

impl RegionInfo {
    const fn new(code: Region, host: &'static str, rate_multiplier: f64, enabled: bool) -> Self {
        Self {
            code,
            base_url: host,
            rate_multiplier,
            enabled,
        }
    }
}

/// Table of all known regions. `Region::Ru` is carried disabled by default —
/// operators who still serve it flip `enabled` via config override.
pub const REGION_TABLE: [RegionInfo; 11] = [
    RegionInfo::new(Region::Na1, "https://na1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Euw1, "https://euw1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Eun1, "https://eun1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Kr, "https://kr.api.riotgames.com", 1.2, true),
    RegionInfo::new(Region::Jp1, "https://jp1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Br1, "https://br1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::La1, "https://la1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::La2, "https://la2.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Oc1, "https://oc1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Tr1, "https://tr1.api.riotgames.com", 1.0, true),
    RegionInfo::new(Region::Ru, "https://ru.api.riotgames.com", 1.0, false),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_round_trips_through_code() {
        for info in REGION_TABLE {
            assert_eq!(Region::from_str(info.code.code()), Ok(info.code));
        }
    }

    #[test]
    fn accepts_common_aliases() {
        assert_eq!(Region::from_str("euw").unwrap(), Region::Euw1);
        assert_eq!(Region::from_str("lan").unwrap(), Region::La1);
    }
}
