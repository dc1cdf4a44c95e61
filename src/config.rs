//! Driver configuration.

use fugit::{MillisDurationU32, SecsDurationU32};

use crate::{error::InvalidAddress, frame::Address};

/// How long each exchange waits for the UPS to answer.
pub const DEFAULT_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(1000);

/// Attempts made at startup identification and at each instant command.
pub const DEFAULT_ATTEMPTS: u8 = 3;

/// The UPS only answers the first of two frames which arrive in quick succession. Five seconds
/// apart was found to be the shortest reliable interval, so never poll faster than this.
pub const MIN_POLL_INTERVAL: SecsDurationU32 = SecsDurationU32::secs(5);

/// Use [`DriverConfig::default`] and the `with_*` methods to configure a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Default for the UPS is `01`.
    pub address: Address,
    /// Recompute LCHKSUM and CHKSUM of every response and reject mismatches.
    pub strict_checksum: bool,
    pub timeout: MillisDurationU32,
    pub attempts: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: Address::DEFAULT,
            strict_checksum: true,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

impl DriverConfig {
    /// Override the UPS address. Must be two hex digits.
    pub fn with_address(mut self, address: &str) -> Result<Self, InvalidAddress> {
        self.address = Address::parse(address)?;
        Ok(self)
    }

    /// Turn off checksum verification to only check the RTN the UPS reports.
    pub fn with_strict_checksum(mut self, strict: bool) -> Self {
        self.strict_checksum = strict;
        self
    }

    pub fn with_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.timeout = timeout;
        self
    }

    /// At least one attempt is always made.
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts.max(1);
        self
    }
}
