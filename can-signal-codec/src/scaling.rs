//! Signal scaling primitives
//!
//! Pure conversions between raw integer fields in a byte buffer and physical
//! values. Byte-aligned reads and writes go through `byteorder`; the
//! conversion helpers implement the two offset conventions used by the
//! catalog (offset after scaling, and raw offset before scaling).

use crate::signals::{ByteOrder, Conversion};
use crate::types::{CodecError, Result};
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Read `byte_length` bytes at `byte_offset` as an unsigned integer.
///
/// # Example
/// ```
/// use can_signal_codec::scaling::decode_unsigned;
/// use can_signal_codec::signals::ByteOrder;
///
/// let raw = decode_unsigned(&[0x03, 0xE8], 0, 2, ByteOrder::BigEndian).unwrap();
/// assert_eq!(raw, 1000);
/// ```
pub fn decode_unsigned(
    buffer: &[u8],
    byte_offset: usize,
    byte_length: usize,
    byte_order: ByteOrder,
) -> Result<u64> {
    let span = span(buffer, byte_offset, byte_length)?;
    Ok(match byte_order {
        ByteOrder::BigEndian => BigEndian::read_uint(span, byte_length),
        ByteOrder::LittleEndian => LittleEndian::read_uint(span, byte_length),
    })
}

/// Read `byte_length` bytes at `byte_offset` as a two's-complement integer.
pub fn decode_signed(
    buffer: &[u8],
    byte_offset: usize,
    byte_length: usize,
    byte_order: ByteOrder,
) -> Result<i64> {
    let span = span(buffer, byte_offset, byte_length)?;
    Ok(match byte_order {
        ByteOrder::BigEndian => BigEndian::read_int(span, byte_length),
        ByteOrder::LittleEndian => LittleEndian::read_int(span, byte_length),
    })
}

/// Write `value` into `byte_length` bytes at `byte_offset`.
///
/// Values wider than the span are rejected, never truncated.
pub fn encode_unsigned(
    buffer: &mut [u8],
    byte_offset: usize,
    byte_length: usize,
    byte_order: ByteOrder,
    value: u64,
) -> Result<()> {
    check_span(buffer.len(), byte_offset, byte_length)?;
    let max = unsigned_max(byte_length as u32 * 8);
    if value > max {
        return Err(CodecError::Range {
            signal: field_label(byte_offset, byte_length),
            value: value as f64,
            min: 0.0,
            max: max as f64,
        });
    }

    let span = &mut buffer[byte_offset..byte_offset + byte_length];
    match byte_order {
        ByteOrder::BigEndian => BigEndian::write_uint(span, value, byte_length),
        ByteOrder::LittleEndian => LittleEndian::write_uint(span, value, byte_length),
    }
    Ok(())
}

/// Write a two's-complement `value` into `byte_length` bytes at `byte_offset`.
pub fn encode_signed(
    buffer: &mut [u8],
    byte_offset: usize,
    byte_length: usize,
    byte_order: ByteOrder,
    value: i64,
) -> Result<()> {
    check_span(buffer.len(), byte_offset, byte_length)?;
    let (min, max) = signed_bounds(byte_length as u32 * 8);
    if value < min || value > max {
        return Err(CodecError::Range {
            signal: field_label(byte_offset, byte_length),
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }

    let span = &mut buffer[byte_offset..byte_offset + byte_length];
    match byte_order {
        ByteOrder::BigEndian => BigEndian::write_int(span, value, byte_length),
        ByteOrder::LittleEndian => LittleEndian::write_int(span, value, byte_length),
    }
    Ok(())
}

/// Convert a raw value to its physical value.
pub fn apply_scale(raw: i64, conversion: Conversion) -> f64 {
    match conversion {
        Conversion::Linear { factor, offset } => raw as f64 * factor + offset,
        Conversion::OffsetFirst { raw_offset, factor } => (raw - raw_offset) as f64 * factor,
    }
}

/// Convert a physical value back to an (unrounded) raw value.
pub fn remove_scale(physical: f64, conversion: Conversion) -> f64 {
    match conversion {
        Conversion::Linear { factor, offset } => (physical - offset) / factor,
        Conversion::OffsetFirst { raw_offset, factor } => physical / factor + raw_offset as f64,
    }
}

/// Reserved "signal not valid" raw value for a field width, if it has one.
pub fn not_valid_sentinel(width: u16) -> Option<u64> {
    match width {
        8 => Some(0xFF),
        16 => Some(0xFFFF),
        32 => Some(0xFFFF_FFFF),
        _ => None,
    }
}

/// True when `raw` is the width's reserved "signal not valid" value.
pub fn is_not_valid(raw: u64, width: u16) -> bool {
    not_valid_sentinel(width) == Some(raw)
}

/// Largest unsigned value representable in `bits` bits.
pub(crate) fn unsigned_max(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Two's-complement range of a `bits`-wide field.
pub(crate) fn signed_bounds(bits: u32) -> (i64, i64) {
    if bits >= 64 {
        (i64::MIN, i64::MAX)
    } else {
        (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
    }
}

fn span(buffer: &[u8], byte_offset: usize, byte_length: usize) -> Result<&[u8]> {
    check_span(buffer.len(), byte_offset, byte_length)?;
    Ok(&buffer[byte_offset..byte_offset + byte_length])
}

fn check_span(available: usize, offset: usize, length: usize) -> Result<()> {
    let fits = (1..=8).contains(&length)
        && offset
            .checked_add(length)
            .map_or(false, |end| end <= available);
    if fits {
        Ok(())
    } else {
        Err(CodecError::OutOfBounds {
            offset,
            length,
            available,
        })
    }
}

fn field_label(byte_offset: usize, byte_length: usize) -> String {
    format!("{}-byte field at offset {}", byte_length, byte_offset)
}
