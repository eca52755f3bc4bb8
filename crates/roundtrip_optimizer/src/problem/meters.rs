use std::{
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Sub, SubAssign},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whole meters. Route distances are integers so accumulated sums stay exact.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Meters(i64);

impl Meters {
    pub const ZERO: Meters = Meters(0);
    pub const MAX: Meters = Meters(i64::MAX);

    pub const fn new(value: i64) -> Self {
        Meters(value)
    }

    pub fn from_km(km: f64) -> Self {
        Meters((km * 1000.0).round() as i64)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub fn as_km(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl From<i64> for Meters {
    fn from(value: i64) -> Self {
        Meters(value)
    }
}

impl Add for Meters {
    type Output = Meters;

    fn add(self, other: Meters) -> Meters {
        Meters(self.0 + other.0)
    }
}

impl AddAssign for Meters {
    fn add_assign(&mut self, other: Meters) {
        self.0 += other.0;
    }
}

impl Sub for Meters {
    type Output = Meters;

    fn sub(self, other: Meters) -> Meters {
        Meters(self.0 - other.0)
    }
}

impl SubAssign for Meters {
    fn sub_assign(&mut self, other: Meters) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Meters {
    type Output = Meters;

    fn mul(self, rhs: i64) -> Meters {
        Meters(self.0 * rhs)
    }
}

impl Div<usize> for Meters {
    type Output = Meters;

    fn div(self, rhs: usize) -> Meters {
        Meters(self.0 / rhs as i64)
    }
}

impl Sum for Meters {
    fn sum<I: Iterator<Item = Meters>>(iter: I) -> Meters {
        iter.fold(Meters::ZERO, |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_km() {
        assert_eq!(Meters::from_km(12.3456), Meters::new(12_346));
        assert_eq!(Meters::from_km(0.0), Meters::ZERO);
        assert_eq!(Meters::new(40_000).as_km(), 40.0);
    }

    #[test]
    fn test_sum() {
        let total: Meters = [Meters::new(10), Meters::new(20), Meters::new(12)]
            .into_iter()
            .sum();
        assert_eq!(total, Meters::new(42));
    }
}
