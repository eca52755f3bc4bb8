use jiff::SignedDuration;
use serde::Serialize;

/// Availability window, both bounds are offsets from the start of the shift.
///
/// Arrival must not be later than `latest`. Arriving before `earliest` means waiting until
/// `earliest` before service can start.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    earliest: SignedDuration,
    latest: SignedDuration,
}

impl TimeWindow {
    pub fn new(earliest: SignedDuration, latest: SignedDuration) -> Self {
        TimeWindow { earliest, latest }
    }

    pub fn from_minutes(earliest: i64, latest: i64) -> Self {
        TimeWindow::new(
            SignedDuration::from_mins(earliest),
            SignedDuration::from_mins(latest),
        )
    }

    pub fn earliest(&self) -> SignedDuration {
        self.earliest
    }

    pub fn latest(&self) -> SignedDuration {
        self.latest
    }

    pub fn duration(&self) -> SignedDuration {
        self.latest - self.earliest
    }

    pub fn is_ordered(&self) -> bool {
        self.earliest <= self.latest
    }

    pub fn is_satisfied(&self, arrival: SignedDuration) -> bool {
        arrival <= self.latest
    }

    pub fn waiting_duration(&self, arrival: SignedDuration) -> SignedDuration {
        if arrival < self.earliest {
            self.earliest - arrival
        } else {
            SignedDuration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_duration() {
        let window = TimeWindow::from_minutes(60, 120);

        assert_eq!(
            window.waiting_duration(SignedDuration::from_mins(45)),
            SignedDuration::from_mins(15)
        );
        assert_eq!(
            window.waiting_duration(SignedDuration::from_mins(90)),
            SignedDuration::ZERO
        );
        assert!(window.is_satisfied(SignedDuration::from_mins(120)));
        assert!(!window.is_satisfied(SignedDuration::from_mins(121)));
    }

    #[test]
    fn test_is_ordered() {
        assert!(TimeWindow::from_minutes(10, 10).is_ordered());
        assert!(!TimeWindow::from_minutes(11, 10).is_ordered());
    }
}
