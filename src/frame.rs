//! Building outbound frames and reading fields out of inbound ones.
//!
//! | Field     | Bytes | Notes                                     |
//! |-----------|-------|-------------------------------------------|
//! | SOI       | 1     | `0x7E`                                    |
//! | VER       | 2     | Always `21`                               |
//! | ADR       | 2     | Device address                            |
//! | CID1/CID2 | 4     | Command identifier. Responses carry RTN in place of CID2 |
//! | LENGTH    | 4     | LCHKSUM nibble + 12-bit INFO length       |
//! | INFO      | n     | Payload                                   |
//! | CHKSUM    | 4     | Over VER..INFO                            |
//! | EOI       | 1     | `0x0D`                                    |

use strum_macros::EnumIter;

use crate::{
    checksum::{MAX_INFO_LEN, length_checksum, length_field_valid, payload_checksum, payload_sum},
    error::{FrameError, InvalidAddress},
    hex::{decode_int, decode_string},
};

pub const SOI: u8 = 0x7E;
pub const EOI: u8 = 0x0D;

/// Protocol version sent in every request.
pub const PROTOCOL_VERSION: &[u8; 2] = b"21";

/// Bytes preceding INFO: SOI, VER, ADR, CID1, CID2/RTN and LENGTH.
pub const HEADER_LEN: usize = 13;

/// Bytes of a frame which are not INFO.
pub const FRAME_OVERHEAD: usize = 18;

/// Offset of the RTN field in a response.
pub const RTN_OFFSET: usize = 7;

/// Offset of the LENGTH field.
pub const LENGTH_OFFSET: usize = 9;

/// Capacity used for outbound frames. Requests carry at most a 4 byte command argument.
pub const REQUEST_CAPACITY: usize = 32;

/// Every frame type the UPS understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CommandId {
    GetAnalogData,
    GetOnOffData,
    GetWarningData,
    RemoteCommand,
    GetSysParam,
    SetSysParam,
    GetProtocolVersion,
    GetDeviceAddress,
    GetVendorInfo,
    GetVendorVersion,
    GetFirmwareVersion,
    ParallelAnalogData,
}

impl CommandId {
    /// The CID1 and CID2 characters sent on the wire.
    pub const fn code(self) -> &'static [u8; 4] {
        match self {
            CommandId::GetAnalogData => b"2A42",
            CommandId::GetOnOffData => b"2A43",
            CommandId::GetWarningData => b"2A44",
            CommandId::RemoteCommand => b"2A45",
            CommandId::GetSysParam => b"2A47",
            CommandId::SetSysParam => b"2A49",
            CommandId::GetProtocolVersion => b"2A4F",
            CommandId::GetDeviceAddress => b"2A50",
            CommandId::GetVendorInfo => b"2A51",
            CommandId::GetVendorVersion => b"2A80",
            CommandId::GetFirmwareVersion => b"2AE5",
            CommandId::ParallelAnalogData => b"2AE6",
        }
    }
}

/// Device address, two hex digits. Default for the UPS is `01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address([u8; 2]);

impl Address {
    pub const DEFAULT: Address = Address(*b"01");

    /// Accept an operator supplied address. It is sent exactly as given.
    pub fn parse(address: &str) -> Result<Self, InvalidAddress> {
        match address.as_bytes() {
            &[high, low] if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() => {
                Ok(Address([high, low]))
            }
            _ => Err(InvalidAddress),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII hex digits.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<&str> for Address {
    type Error = InvalidAddress;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Assemble a request frame.
///
/// Fails with [`FrameError::BufferOverflow`] if the frame does not fit in `N` bytes.
pub fn build<const N: usize>(
    cmd: CommandId,
    version: &[u8; 2],
    address: &Address,
    payload: &[u8],
) -> Result<heapless::Vec<u8, N>, FrameError> {
    let info_len = u16::try_from(payload.len())
        .ok()
        .filter(|len| *len <= MAX_INFO_LEN)
        .ok_or(FrameError::BufferOverflow)?;
    if payload.len() + FRAME_OVERHEAD > N {
        return Err(FrameError::BufferOverflow);
    }

    let mut frame: heapless::Vec<u8, N> = heapless::Vec::new();
    let mut put = |bytes: &[u8]| {
        frame
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::BufferOverflow)
    };
    put(&[SOI])?;
    put(version)?;
    put(address.as_bytes())?;
    put(cmd.code())?;
    put(&length_checksum(info_len))?;
    put(payload)?;

    let checksum = payload_checksum(&frame[1..]);
    frame
        .extend_from_slice(&checksum)
        .map_err(|_| FrameError::BufferOverflow)?;
    frame.push(EOI).map_err(|_| FrameError::BufferOverflow)?;
    Ok(frame)
}

/// A received frame. Field offsets given to the accessors are relative to the start of INFO.
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    raw: &'a [u8],
}

impl<'a> Response<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    /// All received bytes.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// The raw RTN value.
    pub fn rtn(&self) -> Result<u8, FrameError> {
        self.slice(RTN_OFFSET, 2)
            .map(|field| decode_int(field) as u8)
            .ok_or(FrameError::ShortRead {
                expected: RTN_OFFSET + 2,
                got: self.raw.len(),
            })
    }

    /// Read a one byte field at `offset` into INFO.
    pub fn hex_u8(&self, offset: impl Into<usize>) -> Result<u8, FrameError> {
        self.info_field(offset.into(), 2).map(|field| decode_int(field) as u8)
    }

    /// Read a two byte field at `offset` into INFO.
    pub fn hex_u16(&self, offset: impl Into<usize>) -> Result<u16, FrameError> {
        self.info_field(offset.into(), 4).map(|field| decode_int(field) as u16)
    }

    /// Read a text field of `width` hex digits at `offset` into INFO.
    pub fn text<const N: usize>(
        &self,
        offset: impl Into<usize>,
        width: usize,
    ) -> Result<heapless::String<N>, FrameError> {
        self.info_field(offset.into(), width)
            .map(decode_string::<N>)
    }

    /// Check the markers, LCHKSUM and CHKSUM of the frame against what was received.
    pub fn verify_checksums(&self) -> Result<(), FrameError> {
        let got = self.raw.len();
        let length = self
            .slice(LENGTH_OFFSET, 4)
            .ok_or(FrameError::ShortRead { expected: HEADER_LEN, got })?;
        if self.raw[0] != SOI {
            return Err(FrameError::BadMarker);
        }

        let length_value = decode_int(length) as u16;
        if !length_field_valid(length_value) || length != length_checksum(length_value) {
            return Err(FrameError::LengthChecksumMismatch(length_value));
        }

        let info_end = HEADER_LEN + usize::from(length_value & MAX_INFO_LEN);
        let expected = info_end + 5;
        let received = self
            .slice(info_end, 4)
            .filter(|_| got >= expected)
            .ok_or(FrameError::ShortRead { expected, got })?;
        let body = &self.raw[1..info_end];
        if received != payload_checksum(body) {
            return Err(FrameError::ChecksumMismatch {
                expected: decode_int(received) as u16,
                calculated: payload_sum(body),
            });
        }
        if self.raw[info_end + 4] != EOI {
            return Err(FrameError::BadMarker);
        }
        Ok(())
    }

    fn info_field(&self, offset: usize, width: usize) -> Result<&'a [u8], FrameError> {
        self.slice(HEADER_LEN + offset, width)
            .ok_or(FrameError::FieldOutOfRange { offset })
    }

    fn slice(&self, start: usize, width: usize) -> Option<&'a [u8]> {
        self.raw.get(start..start.checked_add(width)?)
    }
}
