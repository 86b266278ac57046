//! Time and angular frequency units.
//!
//! These newtypes keep time and angular frequency apart so that a wave
//! period is never passed where a radian frequency is expected.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Sub};

/// Time in seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f64);

impl Seconds {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn from_ms(ms: f64) -> Self {
        Self(ms * 1e-3)
    }

    #[inline]
    pub fn as_ms(&self) -> f64 {
        self.0 * 1e3
    }

    /// Angular frequency of a wave with this period (omega = 2 * pi / T).
    #[inline]
    pub fn to_angular_frequency(&self) -> RadPerSec {
        RadPerSec(2.0 * PI / self.0)
    }
}

impl Add for Seconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Seconds {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Seconds {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Seconds {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Div<Seconds> for Seconds {
    type Output = f64;
    fn div(self, rhs: Seconds) -> f64 {
        self.0 / rhs.0
    }
}

/// Angular frequency in radians per second.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct RadPerSec(pub f64);

impl RadPerSec {
    pub const ZERO: Self = Self(0.0);

    /// Angular frequency from a cyclic frequency in Hz.
    #[inline]
    pub fn from_hz(hz: f64) -> Self {
        Self(2.0 * PI * hz)
    }

    /// Cyclic frequency in Hz.
    #[inline]
    pub fn as_hz(&self) -> f64 {
        self.0 / (2.0 * PI)
    }

    /// Wave period (T = 2 * pi / omega).
    #[inline]
    pub fn to_period(&self) -> Seconds {
        Seconds(2.0 * PI / self.0)
    }
}

impl Add for RadPerSec {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for RadPerSec {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for RadPerSec {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for RadPerSec {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// Phase accumulated over a time span (omega * t), in radians.
impl Mul<Seconds> for RadPerSec {
    type Output = f64;
    fn mul(self, rhs: Seconds) -> f64 {
        self.0 * rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_frequency_reciprocal() {
        let period = Seconds(8.0);
        let omega = period.to_angular_frequency();

        assert!((omega.0 - 0.785398).abs() < 1e-6);
        assert!((omega.to_period().0 - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_hz_conversion() {
        let omega = RadPerSec::from_hz(0.5);
        assert!((omega.0 - PI).abs() < 1e-12);
        assert!((omega.as_hz() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_product() {
        let phase = RadPerSec(2.0) * Seconds(1.5);
        assert!((phase - 3.0).abs() < 1e-12);
    }
}
