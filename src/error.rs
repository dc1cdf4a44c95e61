//! Our error types for the GXE UPS.

use thiserror::Error;

use crate::response::ReturnCode;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for GXE UPS communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Communication timeout")]
    Timeout,
    #[error("Frame error: {0}")]
    FrameError(FrameError),
    #[error("Command failed: {0}")]
    CommandRejected(ReturnCode),
    #[error("Unknown command")]
    UnknownCommand,
    #[error("Not enough identification data from UPS ({got} bytes)")]
    InsufficientInitialData { got: usize },
}

impl<I: embedded_io::Error> From<FrameError> for Error<I> {
    fn from(err: FrameError) -> Self {
        Error::FrameError(err)
    }
}

/// Problems with the shape or integrity of a frame, independent of the serial port.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame does not fit the buffer")]
    BufferOverflow,
    #[error("Short read from UPS: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },
    #[error("Bad SOI or EOI marker")]
    BadMarker,
    #[error("Bad LCHKSUM in length field {0:#06x}")]
    LengthChecksumMismatch(u16),
    #[error("Bad CHKSUM: frame carries {expected:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch { expected: u16, calculated: u16 },
    #[error("Field at INFO offset {offset} is outside the frame")]
    FieldOutOfRange { offset: usize },
}

/// An address override which is not exactly two hex digits.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("UPS address must be two hex digits")]
pub struct InvalidAddress;
