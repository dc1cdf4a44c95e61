//! This crate drives the Liebert GXE series of uninterruptible power supplies over their serial
//! port.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! The UPS speaks a hex-ASCII framed protocol. Every field of a frame, including embedded binary
//! values and text, is carried as uppercase hex digits between a `0x7E` start marker and a `0x0D`
//! end marker, and each frame carries two checksums: a nibble sum over the INFO length and an
//! additive checksum over the frame body.
//!
//! The driver does not poll everything every cycle. It walks a small state machine over the four
//! telemetry frames (on/off status, analog measurements, warnings and system parameters), and a
//! data flag returned by the UPS lets it jump ahead when a status change or a new warning is
//! pending. Decoded values are handed to a [`sink::TelemetrySink`].
//!
//! Opening and configuring the serial port is left to the caller. The driver only needs a byte
//! stream which it can drain, write to and read from with a bounded timeout, see
//! [`transport::Transport`].
//!
//! The UPS ignores a frame which arrives within roughly five seconds of the previous one, so
//! callers should not step the poll cycle faster than [`config::MIN_POLL_INTERVAL`].

#![cfg_attr(feature = "no_std", no_std)]

pub mod checksum;
pub mod command;
pub mod config;
pub mod decode;
pub mod driver;
pub mod error;
pub mod fields;
pub mod frame;
pub mod hex;
pub mod response;
pub mod scaling;
pub mod sink;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock_serial;
#[cfg(test)]
mod mock_sink;

/// Name reported to the host alongside the driver version.
pub const DRIVER_NAME: &str = "Liebert GXE Series UPS driver";
pub const DRIVER_VERSION: &str = "0.01";

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::max())
        .is_test(true)
        .try_init();
}
