use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use herald_types::{Event, EventKind};
use tokio::sync::Notify;
use tokio::time::Instant;

/// An event as handed back to a client: the event itself plus how many
/// other events were dropped since the client's last successful pop
/// (spec.md §4.G).
#[derive(Debug, Clone)]
pub struct Delivered {
    pub event: Event,
    pub dropped_count: u64,
}

/// Single-writer-per-client bounded queue (spec.md §5 "single-writer per
/// client queue; the hub serializes writes per-client"). `publish` holds
/// the lock only long enough to mutate the deque — it never suspends on
/// network I/O, matching the "publish never suspends the publisher"
/// guarantee.
pub struct ClientQueue {
    capacity: usize,
    inner: Mutex<VecDeque<Event>>,
    dropped_since_last_pop: AtomicU64,
    notify: Notify,
    last_send_success: Mutex<Instant>,
    last_ack: Mutex<Instant>,
}

impl ClientQueue {
    pub fn new(capacity: usize) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            dropped_since_last_pop: AtomicU64::new(0),
            notify: Notify::new(),
            last_send_success: Mutex::new(now),
            last_ack: Mutex::new(now),
        }
    }

    /// Enqueues `event`, applying the overflow policy (spec.md §4.G):
    /// `match_tick` events coalesce with the tail event of the same
    /// `(kind, key)`; everything else is dropped (and counted) once full.
    pub fn push(&self, event: Event) {
        let mut queue = self.inner.lock().expect("client queue poisoned");

        if queue.len() < self.capacity {
            queue.push_back(event);
            drop(queue);
            *self.last_send_success.lock().expect("last_send_success poisoned") = Instant::now();
            self.notify.notify_one();
            return;
        }

        if event.kind == EventKind::Match {
            if let Some(tail) = queue.back_mut() {
                if tail.kind == event.kind && tail.key == event.key {
                    *tail = event;
                    drop(queue);
                    self.dropped_since_last_pop.fetch_add(1, Ordering::SeqCst);
                    self.notify.notify_one();
                    return;
                }
            }
        }

        self.dropped_since_last_pop.fetch_add(1, Ordering::SeqCst);
    }

    /// Waits for and pops the next event, attaching the drop count
    /// accumulated since the last successful pop (spec.md §4.G).
    pub async fn pop(&self) -> Delivered {
        loop {
            {
                let mut queue = self.inner.lock().expect("client queue poisoned");
                if let Some(event) = queue.pop_front() {
                    drop(queue);
                    let dropped = self.dropped_since_last_pop.swap(0, Ordering::SeqCst);
                    return Delivered {
                        event,
                        dropped_count: dropped,
                    };
                }
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("client queue poisoned").len()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_since_last_pop.load(Ordering::SeqCst)
    }

    pub fn ack(&self) {
        *self.last_ack.lock().expect("last_ack poisoned") = Instant::now();
    }

    /// Idle iff neither a successful send nor an ack has occurred within
    /// `idle_timeout` (spec.md §4.G lifecycle).
    pub fn is_idle(&self, now: Instant, idle_timeout: std::time::Duration) -> bool {
        let last_send = *self.last_send_success.lock().expect("last_send_success poisoned");
        let last_ack = *self.last_ack.lock().expect("last_ack poisoned");
        let last_activity = last_send.max(last_ack);
        now.duration_since(last_activity) >= idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_types::EventPayload;

    fn match_tick(key: &str, summary: &str) -> Event {
        Event {
            kind: EventKind::Match,
            key: key.to_string(),
            payload: EventPayload::MatchTick {
                summary: summary.to_string(),
            },
            seq: 0,
        }
    }

    #[tokio::test]
    async fn overflow_coalescing_matches_literal_scenario() {
        // spec.md §8 scenario 7: queue size 2, three match_tick events for
        // the same key -> two observed, second has dropped_count = 1.
        let queue = ClientQueue::new(2);
        queue.push(match_tick("na1:abc", "tick-1"));
        queue.push(match_tick("na1:abc", "tick-2"));
        queue.push(match_tick("na1:abc", "tick-3"));

        assert_eq!(queue.len(), 2);

        let first = queue.pop().await;
        assert_eq!(first.dropped_count, 0);

        let second = queue.pop().await;
        assert_eq!(second.dropped_count, 1);
        match second.event.payload {
            EventPayload::MatchTick { summary } => assert_eq!(summary, "tick-3"),
            _ => panic!("expected a match tick"),
        }
    }

    #[tokio::test]
    async fn non_match_events_are_dropped_and_counted_after_full() {
        let queue = ClientQueue::new(1);
        let notice = |msg: &str| Event {
            kind: EventKind::Coaching,
            key: "na1:abc".into(),
            payload: EventPayload::SystemNotice {
                message: msg.to_string(),
            },
            seq: 0,
        };

        queue.push(notice("first"));
        queue.push(notice("second"));
        queue.push(notice("third"));

        let delivered = queue.pop().await;
        assert_eq!(delivered.dropped_count, 2);
    }

    #[tokio::test]
    async fn queue_fairness_preserves_fifo_order_per_key() {
        let queue = ClientQueue::new(8);
        queue.push(match_tick("k", "e1"));
        queue.push(match_tick("k", "e2"));

        let d1 = queue.pop().await;
        let d2 = queue.pop().await;
        match (d1.event.payload, d2.event.payload) {
            (EventPayload::MatchTick { summary: s1 }, EventPayload::MatchTick { summary: s2 }) => {
                assert_eq!(s1, "e1");
                assert_eq!(s2, "e2");
            }
            _ => panic!("expected match ticks"),
        }
    }
}
