use std::fmt;

/// Subscription tier consumed from the payments/subscription accounting
/// system — the core only reads this value to pick limits (spec.md §1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionTier {
    Free,
    Premium,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    /// Maximum match-history depth an ingestion request may use (spec.md §4.E).
    pub fn match_depth_cap(&self) -> usize {
        match self {
            SubscriptionTier::Free => 10,
            SubscriptionTier::Premium => 25,
            SubscriptionTier::Pro => 50,
            SubscriptionTier::Enterprise => 100,
        }
    }

    pub fn live_game_enabled(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }

    pub fn coaching_enabled(&self) -> bool {
        matches!(self, SubscriptionTier::Pro | SubscriptionTier::Enterprise)
    }

    pub fn predictions_enabled(&self) -> bool {
        matches!(self, SubscriptionTier::Pro | SubscriptionTier::Enterprise)
    }

    /// Max concurrent in-flight requests a client on this tier may hold open.
    pub fn concurrent_requests(&self) -> usize {
        match self {
            SubscriptionTier::Free => 2,
            SubscriptionTier::Premium => 3,
            SubscriptionTier::Pro => 5,
            SubscriptionTier::Enterprise => 10,
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table_matches_spec() {
        assert_eq!(SubscriptionTier::Free.match_depth_cap(), 10);
        assert_eq!(SubscriptionTier::Premium.match_depth_cap(), 25);
        assert_eq!(SubscriptionTier::Pro.match_depth_cap(), 50);
        assert_eq!(SubscriptionTier::Enterprise.match_depth_cap(), 100);

        assert!(!SubscriptionTier::Free.live_game_enabled());
        assert!(SubscriptionTier::Premium.live_game_enabled());

        assert!(!SubscriptionTier::Premium.coaching_enabled());
        assert!(SubscriptionTier::Pro.coaching_enabled());
    }
}
