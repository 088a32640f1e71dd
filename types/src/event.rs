use std::collections::HashSet;

/// Kind half of the `{kind, key}` interest pair (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Match,
    Player,
    Rank,
    Coaching,
}

/// One subscribed interest: `{kind, key}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interest {
    pub kind: EventKind,
    pub key: String,
}

/// `{client_id, interests}` (spec.md §3).
#[derive(Debug, Clone)]
pub struct Subscription {
    pub client_id: String,
    pub interests: HashSet<Interest>,
}

impl Subscription {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            interests: HashSet::new(),
        }
    }

    pub fn is_interested_in(&self, kind: EventKind, key: &str) -> bool {
        self.interests.contains(&Interest {
            kind,
            key: key.to_string(),
        })
    }
}

/// `{kind, key, payload, seq}`; `seq` is monotonic per `key` (spec.md §3).
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub key: String,
    pub payload: EventPayload,
    pub seq: u64,
}

/// The narrow set of live-event payload shapes the core actually emits
/// (spec.md §6): `match_tick`, `performance_update`, `system_notice`,
/// `heartbeat`.
#[derive(Debug, Clone)]
pub enum EventPayload {
    MatchTick { summary: String },
    PerformanceUpdate { summary: String },
    SystemNotice { message: String },
    Heartbeat,
}
