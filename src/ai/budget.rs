use std::time::{Duration, Instant};

/// Wall-clock allowance for one move decision.
///
/// Polled at search-node entry. A subtree that is already running keeps going
/// until its own next poll, so the overrun is bounded by the deepest call chain
/// in flight rather than being zero.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    started: Instant,
    limit: Option<Duration>,
    exceeded: bool,
}

impl SearchBudget {
    pub fn start(limit: Duration) -> Self {
        SearchBudget {
            started: Instant::now(),
            limit: Some(limit),
            exceeded: false,
        }
    }

    pub fn unlimited() -> Self {
        SearchBudget {
            started: Instant::now(),
            limit: None,
            exceeded: false,
        }
    }

    /// Poll the deadline, latching the exceeded flag once it passes.
    pub fn check(&mut self) -> bool {
        if !self.exceeded {
            if let Some(limit) = self.limit {
                self.exceeded = self.started.elapsed() >= limit;
            }
        }
        self.exceeded
    }

    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_expires() {
        let mut budget = SearchBudget::unlimited();
        assert!(!budget.check());
        assert!(!budget.is_exceeded());
    }

    #[test]
    fn zero_budget_expires_on_first_poll() {
        let mut budget = SearchBudget::start(Duration::ZERO);
        assert!(!budget.is_exceeded());
        assert!(budget.check());
        assert!(budget.is_exceeded());
    }

    #[test]
    fn generous_budget_does_not_expire() {
        let mut budget = SearchBudget::start(Duration::from_secs(60));
        assert!(!budget.check());
        assert!(budget.elapsed() < Duration::from_secs(60));
    }
}
