//! Fixed point conversions for the values the UPS reports.
//!
//! Every measurement arrives as a 16-bit integer. Most are hundredths of their unit, power values
//! are tens of their unit, and the two durations need converting into the units the host expects.

/// A conversion from a raw field: divide by `divisor`, then multiply by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaling {
    pub divisor: u32,
    pub multiplier: u32,
}

impl Default for Scaling {
    /// Default to no scaling.
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Scaling {
    /// Hundredths: volts, amps and hertz.
    pub const CENTI: Self = Self::new(100, 1);
    /// Tens: watts and VA.
    pub const DECA: Self = Self::new(1, 10);
    /// Hundredths of an hour to minutes.
    pub const BACKUP_MINUTES: Self = Self::new(100, 60);
    /// Three month units to seconds.
    pub const TEST_INTERVAL_SECS: Self = Self::new(1, 3 * 108_000);

    pub const fn new(divisor: u32, multiplier: u32) -> Self {
        Self {
            divisor,
            multiplier,
        }
    }

    /// Convert with fractional precision.
    #[inline]
    pub fn to_f32(&self, raw: u16) -> f32 {
        f32::from(raw) / self.divisor as f32 * self.multiplier as f32
    }

    /// Convert with integer arithmetic, truncating.
    #[inline]
    pub const fn to_integer(&self, raw: u16) -> u64 {
        (raw as u64) * (self.multiplier as u64) / (self.divisor as u64)
    }
}

/// The bypass upper transfer limit is always 115% of the nominal voltage.
pub const BYPASS_HIGH_RATIO: f32 = 1.15;

/// The bypass lower transfer limit is fixed, in volts.
pub const BYPASS_LOW_VOLTS: u16 = 120;
