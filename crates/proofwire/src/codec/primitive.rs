// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive codecs: integers, UUIDs, byte arrays and strings.
//!
//! Composite codecs call the free functions directly; the `Codec` structs
//! exist for places that need a primitive behind `dyn Codec`.
//!
//! ```text
//! varint  : ULEB128
//! u32     : 4 bytes LE
//! uuid    : 16 bytes, RFC 4122 byte order
//! bytes   : varint length | raw bytes
//! string  : varint length | UTF-8 bytes
//! ```

use uuid::Uuid;

use super::{Codec, Sink, Source, Versioned};
use crate::config::DEFAULT_MAX_PAYLOAD_LEN;
use crate::error::{DecodeError, EncodeError, ProtocolResult};

// ============================================================================
// Length-prefixed helpers
// ============================================================================

pub fn write_prefixed(sink: &mut Sink<'_>, data: &[u8], limit: u32) -> ProtocolResult<()> {
    let len = data.len() as u64;
    if len > u64::from(limit) {
        return Err(EncodeError::LengthLimit { len, limit }.into());
    }
    sink.write_varint(len)?;
    sink.write_bytes(data)
}

fn read_length(source: &mut Source<'_>, limit: u32) -> ProtocolResult<u64> {
    let len = source.read_varint()?;
    if len > u64::from(limit) {
        return Err(DecodeError::LengthLimit { len, limit }.into());
    }
    Ok(len)
}

pub fn read_prefixed(source: &mut Source<'_>, limit: u32) -> ProtocolResult<Vec<u8>> {
    let len = read_length(source, limit)?;
    source.read_vec(len)
}

pub fn skip_prefixed(source: &mut Source<'_>, limit: u32) -> ProtocolResult<()> {
    let len = read_length(source, limit)?;
    source.skip_bytes(len)
}

pub fn write_str(sink: &mut Sink<'_>, value: &str, limit: u32) -> ProtocolResult<()> {
    write_prefixed(sink, value.as_bytes(), limit)
}

pub fn read_string(source: &mut Source<'_>, limit: u32) -> ProtocolResult<String> {
    let bytes = read_prefixed(source, limit)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8.into())
}

// ============================================================================
// Codec values
// ============================================================================

macro_rules! primitive_versions {
    ($ty:ident) => {
        impl Versioned for $ty {
            const NAME: &'static str = stringify!($ty);
            const AVAILABLE_VERSIONS: &'static [u32] = &[0];
        }
    };
}

/// ULEB128 `u64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarintCodec;
primitive_versions!(VarintCodec);

impl Codec<u64> for VarintCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &u64) -> ProtocolResult<()> {
        sink.write_varint(*value)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<u64> {
        source.read_varint()
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        source.skip_varint()
    }
}

/// Fixed 4-byte little-endian `u32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct U32Codec;
primitive_versions!(U32Codec);

impl Codec<u32> for U32Codec {
    fn encode(&self, sink: &mut Sink<'_>, value: &u32) -> ProtocolResult<()> {
        sink.write_u32_le(*value)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<u32> {
        source.read_u32_le()
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        source.skip_bytes(4)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodec;
primitive_versions!(UuidCodec);

impl Codec<Uuid> for UuidCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Uuid) -> ProtocolResult<()> {
        sink.write_uuid(value)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Uuid> {
        source.read_uuid()
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        source.skip_bytes(16)
    }
}

/// Length-prefixed byte array.
#[derive(Debug, Clone, Copy)]
pub struct BytesCodec {
    limit: u32,
}
primitive_versions!(BytesCodec);

impl BytesCodec {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }
}

impl Default for BytesCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_LEN)
    }
}

impl Codec<Vec<u8>> for BytesCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Vec<u8>) -> ProtocolResult<()> {
        write_prefixed(sink, value, self.limit)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Vec<u8>> {
        read_prefixed(source, self.limit)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        skip_prefixed(source, self.limit)
    }
}

/// Length-prefixed UTF-8 string.
#[derive(Debug, Clone, Copy)]
pub struct StringCodec {
    limit: u32,
}
primitive_versions!(StringCodec);

impl StringCodec {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }
}

impl Default for StringCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_LEN)
    }
}

impl Codec<String> for StringCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &String) -> ProtocolResult<()> {
        write_str(sink, value, self.limit)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<String> {
        read_string(source, self.limit)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        skip_prefixed(source, self.limit)
    }
}
