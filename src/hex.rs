//! Conversion between raw values and the hex-ASCII text every protocol field is carried in.

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Widest field [`decode_int`] will parse. Anything wider is rejected rather than overflowed.
pub const MAX_INT_WIDTH: usize = 15;

/// The UPS pads text fields with spaces, so the first space ends the meaningful text.
pub const TEXT_PADDING: u8 = 0x20;

/// Parse `field` as an unsigned base-16 integer.
///
/// Parsing stops at the first character which is not a hex digit, so a field with trailing
/// garbage still yields its leading value. Fields wider than [`MAX_INT_WIDTH`] yield `0`.
pub fn decode_int(field: &[u8]) -> u64 {
    if field.len() > MAX_INT_WIDTH {
        return 0;
    }
    field
        .iter()
        .map_while(|&c| char::from(c).to_digit(16))
        .fold(0, |acc, digit| (acc << 4) | u64::from(digit))
}

/// Decode a text field, one byte per pair of hex digits.
///
/// Decoding stops at the first space, which is how the UPS marks the end of the meaningful text
/// inside a fixed-width field. A NUL byte ends the text as well. Text longer than `N` bytes is
/// truncated.
///
/// The UPS only sends ASCII. Any other byte decodes as `?`, so each byte takes one byte of `N`.
pub fn decode_string<const N: usize>(src: &[u8]) -> heapless::String<N> {
    let mut text = heapless::String::new();
    for pair in src.chunks(2) {
        let byte = decode_int(pair) as u8;
        if byte == TEXT_PADDING || byte == 0x00 {
            break;
        }
        let c = if byte.is_ascii() { char::from(byte) } else { '?' };
        if text.push(c).is_err() {
            break;
        }
    }
    log::debug!("substr: {}", text);
    text
}

/// Encode a byte as two uppercase hex digits.
pub const fn encode_u8(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0x0F) as usize],
    ]
}

/// Encode a 16-bit value as four uppercase hex digits.
pub const fn encode_u16(value: u16) -> [u8; 4] {
    let [high, low] = value.to_be_bytes();
    let high = encode_u8(high);
    let low = encode_u8(low);
    [high[0], high[1], low[0], low[1]]
}
