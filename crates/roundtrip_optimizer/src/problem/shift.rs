use jiff::{SignedDuration, civil::DateTime};

use crate::problem::{error::ProblemError, meters::Meters};

/// Working day of the vehicle. Every time offset in the problem is measured from `start`.
#[derive(Debug, Clone, Copy)]
pub struct Shift {
    start: DateTime,
    end: DateTime,
}

impl Shift {
    pub fn new(start: DateTime, end: DateTime) -> Result<Self, ProblemError> {
        if end <= start {
            return Err(ProblemError::InvalidShift);
        }

        Ok(Shift { start, end })
    }

    pub fn start(&self) -> DateTime {
        self.start
    }

    pub fn end(&self) -> DateTime {
        self.end
    }

    pub fn length(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }

    pub fn clock_time(&self, offset: SignedDuration) -> DateTime {
        self.start.saturating_add(offset)
    }
}

/// Whole-route caps on the two cumulative dimensions.
#[derive(Debug, Clone, Copy)]
pub struct RouteLimits {
    pub max_distance: Meters,
    pub max_time: SignedDuration,

    /// Longest wait allowed in front of a single stop, unlimited when `None`
    pub max_waiting_duration: Option<SignedDuration>,
}

impl RouteLimits {
    pub(crate) fn validate(&self) -> Result<(), ProblemError> {
        if self.max_distance <= Meters::ZERO {
            return Err(ProblemError::NonPositiveCap("max_distance"));
        }

        if !self.max_time.is_positive() {
            return Err(ProblemError::NonPositiveCap("max_time"));
        }

        if self
            .max_waiting_duration
            .is_some_and(|duration| duration.is_negative())
        {
            return Err(ProblemError::NonPositiveCap("max_waiting_duration"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_shift() {
        let day = date(2025, 6, 10);
        let shift = Shift::new(day.at(8, 0, 0, 0), day.at(17, 30, 0, 0)).unwrap();

        assert_eq!(shift.length(), SignedDuration::from_mins(9 * 60 + 30));
        assert_eq!(
            shift.clock_time(SignedDuration::from_mins(95)),
            day.at(9, 35, 0, 0)
        );

        assert!(Shift::new(day.at(8, 0, 0, 0), day.at(8, 0, 0, 0)).is_err());
    }

    #[test]
    fn test_route_limits() {
        let limits = RouteLimits {
            max_distance: Meters::new(0),
            max_time: SignedDuration::from_hours(8),
            max_waiting_duration: None,
        };

        assert_eq!(
            limits.validate(),
            Err(ProblemError::NonPositiveCap("max_distance"))
        );
    }
}
