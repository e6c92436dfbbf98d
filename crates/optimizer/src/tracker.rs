//! Ordering of overlapping optimization requests: only the most recently
//! issued request may deliver its result.

use adalloc_core::RecommendationResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Identifies one optimization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct OptimizationTracker {
    latest: AtomicU64,
}

impl OptimizationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; any earlier ticket becomes stale.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `response` through only if `ticket` is still the latest.
    pub fn resolve(
        &self,
        ticket: Ticket,
        response: RecommendationResponse,
    ) -> Option<RecommendationResponse> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            debug!(ticket = ticket.0, latest = self.latest.load(Ordering::SeqCst), "Discarding stale optimization");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let tracker = OptimizationTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);

        // second finishes first, then the slow first request arrives
        let fresh = tracker.resolve(second, RecommendationResponse::fallback("second"));
        let stale = tracker.resolve(first, RecommendationResponse::fallback("first"));

        assert_eq!(fresh.unwrap().global_strategy, "second");
        assert!(stale.is_none());
    }

    #[test]
    fn test_single_request_resolves() {
        let tracker = OptimizationTracker::new();
        let ticket = tracker.issue();
        assert!(tracker.is_current(ticket));
        assert!(tracker.resolve(ticket, RecommendationResponse::fallback("ok")).is_some());
    }
}
