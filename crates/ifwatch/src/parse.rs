//! Wire-format primitive parsers.
//!
//! Multi-byte integers are decoded explicitly little-endian. The kernel
//! writes netlink in host byte order; on the platforms this crate supports
//! that is little-endian, and decoding it explicitly keeps the parsers
//! honest about what they accept.

use winnow::binary::{le_i32, le_u16, le_u32};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take;

/// Result type for winnow parsers.
pub(crate) type PResult<T> = core::result::Result<T, winnow::error::ErrMode<ContextError>>;

/// Parse a single byte.
pub(crate) fn parse_u8(input: &mut &[u8]) -> PResult<u8> {
    let bytes: &[u8] = take(1usize).parse_next(input)?;
    Ok(bytes[0])
}

/// Skip `n` padding bytes.
pub(crate) fn skip(input: &mut &[u8], n: usize) -> PResult<()> {
    let _: &[u8] = take(n).parse_next(input)?;
    Ok(())
}

/// Parse a u16, little endian.
pub(crate) fn parse_u16(input: &mut &[u8]) -> PResult<u16> {
    le_u16.parse_next(input)
}

/// Parse a u32, little endian.
pub(crate) fn parse_u32(input: &mut &[u8]) -> PResult<u32> {
    le_u32.parse_next(input)
}

/// Parse an i32, little endian.
pub(crate) fn parse_i32(input: &mut &[u8]) -> PResult<i32> {
    le_i32.parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_advance_input() {
        let data = [0x01u8, 0x02, 0x03, 0x00, 0x00, 0x00];
        let mut input = &data[..];
        assert_eq!(parse_u8(&mut input).unwrap(), 0x01);
        assert_eq!(parse_u8(&mut input).unwrap(), 0x02);
        assert_eq!(parse_u32(&mut input).unwrap(), 3);
        assert!(input.is_empty());
    }

    #[test]
    fn truncated_input_fails() {
        let mut input = &[0x01u8][..];
        assert!(parse_u32(&mut input).is_err());
    }
}
