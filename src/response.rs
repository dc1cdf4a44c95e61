//! Acceptance of a received frame: length, then the RTN the UPS reported.

use core::fmt;

use crate::{
    error::{Error, FrameError, Result},
    frame::Response,
};

/// The RTN field of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    BadVersion,
    BadChecksum,
    BadLengthChecksum,
    InvalidCid2,
    BadCommandFormat,
    BadData,
    Unknown(u8),
}

impl ReturnCode {
    /// Human readable reason, as the UPS documentation names it.
    pub const fn reason(&self) -> &'static str {
        match self {
            ReturnCode::Ok => "OK",
            ReturnCode::BadVersion => "Bad VER",
            ReturnCode::BadChecksum => "Bad CHKSUM",
            ReturnCode::BadLengthChecksum => "Bad LCHKSUM",
            ReturnCode::InvalidCid2 => "Invalid CID2",
            ReturnCode::BadCommandFormat => "Bad Command Format",
            ReturnCode::BadData => "Bad Data",
            ReturnCode::Unknown(_) => "Unknown RTN",
        }
    }
}

impl From<u8> for ReturnCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => ReturnCode::Ok,
            0x01 => ReturnCode::BadVersion,
            0x02 => ReturnCode::BadChecksum,
            0x03 => ReturnCode::BadLengthChecksum,
            0x04 => ReturnCode::InvalidCid2,
            0x05 => ReturnCode::BadCommandFormat,
            0x06 => ReturnCode::BadData,
            other => ReturnCode::Unknown(other),
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Accept the outcome of an exchange which should have produced at least `min_len` bytes.
///
/// `read` is the number of bytes the transport placed in `buf`, or the error it failed with. The
/// response is only accepted when it is long enough and the UPS reported RTN `0`.
pub fn validate<I: embedded_io::Error>(
    read: Result<usize, I>,
    buf: &[u8],
    min_len: usize,
) -> Result<Response<'_>, I> {
    let got = match read {
        Ok(got) => got,
        Err(err) => {
            log::error!("Read failed: {}", err);
            return Err(err);
        }
    };

    if got < min_len {
        log::error!("Short read from UPS: {} of {} bytes", got, min_len);
        return Err(FrameError::ShortRead {
            expected: min_len,
            got,
        }
        .into());
    }

    let response = Response::new(&buf[..got.min(buf.len())]);
    match ReturnCode::from(response.rtn()?) {
        ReturnCode::Ok => Ok(response),
        rejected => {
            log::error!("Command failed: {}", rejected);
            Err(Error::CommandRejected(rejected))
        }
    }
}
