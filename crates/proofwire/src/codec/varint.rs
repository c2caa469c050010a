// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ULEB128 (Unsigned Little-Endian Base 128) variable-length integers.
//!
//! Used for parameter ordinals and every length prefix on the wire.
//!
//! - 7 data bits per byte, bit 7 set while more bytes follow
//! - 0..=127 fits in one byte
//! - a `u64` never needs more than 10 bytes
//!
//! ```
//! use proofwire::codec::varint::{decode_varint, encode_varint};
//!
//! let mut buf = [0u8; 10];
//! let len = encode_varint(300, &mut buf);
//! assert_eq!(&buf[..len], &[0xAC, 0x02]);
//! assert_eq!(decode_varint(&buf[..len]), Ok((300, 2)));
//! ```

/// Maximum bytes needed to encode a u64.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Buffer-level varint failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Buffer ended while the continuation bit was still set.
    UnexpectedEof,
    /// More than 64 bits of payload.
    Overflow,
}

#[inline]
pub const fn has_continuation(byte: u8) -> bool {
    byte & CONTINUATION_BIT != 0
}

/// Encode `value` into `buf`, returning the number of bytes written.
///
/// # Panics
///
/// Panics if `buf` is shorter than [`varint_len`] of `value`.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut i = 0;
    loop {
        let byte = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            buf[i] = byte;
            return i + 1;
        }
        buf[i] = byte | CONTINUATION_BIT;
        i += 1;
    }
}

/// Encode into a stack array; returns the array and the used length.
#[inline]
pub fn encode_varint_array(value: u64) -> ([u8; MAX_VARINT_LEN], usize) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_varint(value, &mut buf);
    (buf, len)
}

/// Number of bytes `value` occupies on the wire.
#[inline]
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `buf`, returning `(value, consumed)`.
#[inline]
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }

        let data = u64::from(byte & DATA_MASK);

        // At shift 63 only the lowest payload bit still fits.
        if shift == 63 && data > 1 {
            return Err(VarintError::Overflow);
        }

        result |= data << shift;

        if !has_continuation(byte) {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(VarintError::UnexpectedEof)
}
