//! Subscription Hub (spec.md §4.G): delivers events to interested clients
//! with backpressure via bounded, single-writer-per-client queues.

pub mod queue;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use herald_types::{Event, EventKind, EventPayload, Interest, Subscription};
use queue::{ClientQueue, Delivered};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum HubError {
    #[error("no subscription registered for client {0}")]
    UnknownClient(String),
}

/// Default bounded outbound queue length (spec.md §4.G).
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    pub queue_capacity: usize,
    pub heartbeat_interval: Duration,
    pub idle_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            heartbeat_interval: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(120),
        }
    }
}

struct ClientState {
    subscription: Subscription,
    queue: Arc<ClientQueue>,
}

/// Per-`(kind, key)` monotonic sequence counters (spec.md §6 "event payloads
/// carry a monotonic seq per key").
#[derive(Default)]
struct SeqTable {
    counters: HashMap<(EventKind, String), u64>,
}

impl SeqTable {
    fn next(&mut self, kind: EventKind, key: &str) -> u64 {
        let entry = self.counters.entry((kind, key.to_string())).or_insert(0);
        *entry += 1;
        *entry
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HubStats {
    pub client_count: usize,
    pub total_queued: usize,
    pub total_dropped: u64,
}

/// Delivers events to interested clients with backpressure (spec.md §4.G).
/// Each client owns one [`ClientQueue`]; `publish` enqueues into every
/// matching client's queue and never suspends on the client's own
/// consumption rate (spec.md §5).
pub struct SubscriptionHub {
    clients: Mutex<HashMap<String, ClientState>>,
    seq: Mutex<SeqTable>,
    config: HubConfig,
}

impl SubscriptionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            seq: Mutex::new(SeqTable::default()),
            config,
        }
    }

    /// `subscribe(client_id, interests)` (spec.md §4.G). Creates the
    /// client's queue on first subscription; subsequent calls merge in
    /// additional interests.
    pub fn subscribe(&self, client_id: &str, interests: impl IntoIterator<Item = Interest>) {
        let mut clients = self.clients.lock().expect("clients lock poisoned");
        let state = clients.entry(client_id.to_string()).or_insert_with(|| ClientState {
            subscription: Subscription::new(client_id),
            queue: Arc::new(ClientQueue::new(self.config.queue_capacity)),
        });
        state.subscription.interests.extend(interests);
        debug!(client_id, interest_count = state.subscription.interests.len(), "subscribed");
    }

    /// `unsubscribe(client_id, interests?)` (spec.md §4.G). `None` removes
    /// the client entirely; `Some` removes only the named interests.
    pub fn unsubscribe(&self, client_id: &str, interests: Option<Vec<Interest>>) {
        let mut clients = self.clients.lock().expect("clients lock poisoned");
        match interests {
            None => {
                clients.remove(client_id);
            }
            Some(to_remove) => {
                if let Some(state) = clients.get_mut(client_id) {
                    for interest in to_remove {
                        state.subscription.interests.remove(&interest);
                    }
                }
            }
        }
    }

    /// `publish(event)` (spec.md §4.G). Assigns the next `seq` for
    /// `(kind, key)` and delivers to every subscriber whose interests
    /// contain it; never suspends.
    pub fn publish(&self, kind: EventKind, key: &str, payload: EventPayload) {
        let seq = self.seq.lock().expect("seq table poisoned").next(kind, key);
        let event = Event {
            kind,
            key: key.to_string(),
            payload,
            seq,
        };

        let clients = self.clients.lock().expect("clients lock poisoned");
        for state in clients.values() {
            if state.subscription.is_interested_in(kind, key) {
                state.queue.push(event.clone());
            }
        }
    }

    /// Broadcasts a heartbeat to every subscribed client regardless of
    /// interest set (spec.md §4.G "heartbeats are emitted ... to let
    /// clients detect liveness").
    pub fn broadcast_heartbeat(&self) {
        let clients = self.clients.lock().expect("clients lock poisoned");
        for (client_id, state) in clients.iter() {
            state.queue.push(Event {
                kind: EventKind::Player,
                key: client_id.clone(),
                payload: EventPayload::Heartbeat,
                seq: 0,
            });
        }
    }

    /// Records that `client_id` acknowledged a heartbeat, resetting its
    /// idle clock (spec.md §4.G lifecycle).
    pub fn ack_heartbeat(&self, client_id: &str) {
        if let Some(state) = self.clients.lock().expect("clients lock poisoned").get(client_id) {
            state.queue.ack();
        }
    }

    /// Waits for and returns the next event queued for `client_id`.
    pub async fn recv(&self, client_id: &str) -> Result<Delivered, HubError> {
        let queue = {
            let clients = self.clients.lock().expect("clients lock poisoned");
            clients
                .get(client_id)
                .map(|s| Arc::clone(&s.queue))
                .ok_or_else(|| HubError::UnknownClient(client_id.to_string()))?
        };
        Ok(queue.pop().await)
    }

    pub fn stats(&self) -> HubStats {
        let clients = self.clients.lock().expect("clients lock poisoned");
        let total_queued = clients.values().map(|s| s.queue.len()).sum();
        let total_dropped = clients.values().map(|s| s.queue.dropped_count()).sum();
        HubStats {
            client_count: clients.len(),
            total_queued,
            total_dropped,
        }
    }

    /// Removes clients idle beyond the configured timeout (spec.md §4.G
    /// lifecycle: "reaped after a configurable idle timeout").
    pub fn reap_idle(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock().expect("clients lock poisoned");
        let before = clients.len();
        clients.retain(|client_id, state| {
            let idle = state.queue.is_idle(now, self.config.idle_timeout);
            if idle {
                info!(client_id, "reaping idle subscription client");
            }
            !idle
        });
        before - clients.len()
    }

    /// Spawns the heartbeat ticker loop (spec.md §4.G). Callers own the
    /// returned handle and abort it on shutdown.
    pub fn spawn_heartbeat_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval = self.config.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.broadcast_heartbeat();
                self.reap_idle(Instant::now());
            }
        })
    }
}
