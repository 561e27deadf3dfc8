use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Minutes since the start of the scenario. Day boundaries fall every 1440.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Serialize, Deserialize, PartialOrd, Hash)]
pub struct Time(pub u64);

impl Time {
    pub const MINUTES_PER_DAY: u64 = 1440;

    /// Half-open interval intersection: touching endpoints do not overlap.
    pub(crate) fn is_overlapping(a: &(Time, Time), b: &(Time, Time)) -> bool {
        a.0 < b.1 && a.1 > b.0
    }

    /// Scenario day this instant falls on, starting from day 1.
    pub fn day(&self) -> u64 {
        self.0 / Self::MINUTES_PER_DAY + 1
    }

    /// Clock-only rendering, without the day prefix.
    pub fn clock(&self) -> String {
        let remaining = self.0 % Self::MINUTES_PER_DAY;
        format!("{:02}:{:02}", remaining / 60, remaining % 60)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DAY{} {}", self.day(), self.clock())
    }
}

impl Add<u64> for Time {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Add<Time> for Time {
    type Output = Self;

    fn add(self, rhs: Time) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl Sub<u64> for Time {
    type Output = Self;

    fn sub(self, rhs: u64) -> Self::Output {
        Time(self.0 - rhs)
    }
}

impl Sub<Time> for Time {
    type Output = Self;

    fn sub(self, rhs: Time) -> Self::Output {
        Time(self.0 - rhs.0)
    }
}

impl AddAssign<u64> for Time {
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}
