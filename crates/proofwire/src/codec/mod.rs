// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec substrate
//!
//! - [`Codec`] - encode/decode/skip contract, object safe so registries can
//!   cache `Arc<dyn Codec<P>>`
//! - [`Versioned`] - construction-time version gate
//! - [`stream`] - counting sink/source over `std::io`
//! - [`varint`] / [`primitive`] - the primitive layer composite codecs build on
//!
//! # Contract
//!
//! `decode` reads exactly the bytes `encode` wrote. `skip` consumes the same
//! bytes as `decode` without building the value.

pub mod primitive;
pub mod stream;
pub mod varint;
mod version;

pub use stream::{Sink, Source};
pub use version::{check_version, Versioned};

use crate::error::ProtocolResult;

/// Encode/decode/skip contract for one value type.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, sink: &mut Sink<'_>, value: &T) -> ProtocolResult<()>;

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<T>;

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()>;
}

/// Encode `value` into a fresh buffer.
pub fn encode_to_vec<T, C>(codec: &C, value: &T) -> ProtocolResult<Vec<u8>>
where
    C: Codec<T> + ?Sized,
{
    let mut buf = Vec::new();
    codec.encode(&mut Sink::new(&mut buf), value)?;
    Ok(buf)
}

/// Decode one value from the front of `bytes`; returns it with the bytes consumed.
pub fn decode_from_slice<T, C>(codec: &C, bytes: &[u8]) -> ProtocolResult<(T, usize)>
where
    C: Codec<T> + ?Sized,
{
    let mut reader = bytes;
    let mut source = Source::new(&mut reader);
    let value = codec.decode(&mut source)?;
    Ok((value, source.position() as usize))
}

/// Skip one value at the front of `bytes`; returns the bytes consumed.
pub fn skip_in_slice<T, C>(codec: &C, bytes: &[u8]) -> ProtocolResult<usize>
where
    C: Codec<T> + ?Sized,
{
    let mut reader = bytes;
    let mut source = Source::new(&mut reader);
    codec.skip(&mut source)?;
    Ok(source.position() as usize)
}
