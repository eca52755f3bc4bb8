use std::time::{Duration, Instant};

use jiff::SignedDuration;

/// Wall-clock budget measured with a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started_at: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn start(limit: SignedDuration) -> Self {
        Self {
            started_at: Instant::now(),
            // A negative budget is treated as already expired
            limit: Duration::try_from(limit).unwrap_or(Duration::ZERO),
        }
    }

    pub fn is_reached(&self) -> bool {
        self.started_at.elapsed() >= self.limit
    }

    pub fn elapsed(&self) -> SignedDuration {
        SignedDuration::try_from(self.started_at.elapsed()).unwrap_or(SignedDuration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline() {
        assert!(Deadline::start(SignedDuration::ZERO).is_reached());
        assert!(Deadline::start(SignedDuration::from_secs(-5)).is_reached());
        assert!(!Deadline::start(SignedDuration::from_secs(3600)).is_reached());
    }
}
