//! The two checksums carried by every frame.
//!
//! * LCHKSUM - a 4-bit checksum over the 12-bit INFO length, packed into the top nibble of the
//!   LENGTH field.
//! * CHKSUM - a 16-bit additive checksum over every byte between the SOI and CHKSUM fields.

use crate::hex::encode_u16;

/// Largest INFO length the LENGTH field can describe.
pub const MAX_INFO_LEN: u16 = 0x0FFF;

/// Build the LENGTH field value for `len` bytes of INFO.
///
/// The three length nibbles are summed modulo 16 and the two's complement of that sum is stored in
/// the top nibble. Only the low 12 bits of `len` are kept.
pub const fn length_field(len: u16) -> u16 {
    let len = len & MAX_INFO_LEN;
    let nibble_sum = (len & 0x000F) + ((len >> 4) & 0x000F) + ((len >> 8) & 0x000F);
    let lchksum = (nibble_sum % 16).wrapping_neg() & 0x000F;
    len | (lchksum << 12)
}

/// Render the LENGTH field for `len` bytes of INFO as four hex digits.
pub const fn length_checksum(len: u16) -> [u8; 4] {
    encode_u16(length_field(len))
}

/// Whether the top nibble of a received LENGTH field matches its length bits.
pub const fn length_field_valid(field: u16) -> bool {
    length_field(field & MAX_INFO_LEN) == field
}

/// Sum `bytes` modulo 65536 and negate, so that the sum of the bytes plus the checksum is zero.
pub fn payload_sum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)))
        .wrapping_neg()
}

/// Render the CHKSUM field for `bytes` as four hex digits.
pub fn payload_checksum(bytes: &[u8]) -> [u8; 4] {
    encode_u16(payload_sum(bytes))
}
