// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic tagged-union codec: a code table plus one sub-codec per tag.
//!
//! The factory is a single closure, normally an exhaustive `match` over the
//! tag type, so adding a tag without a payload codec fails to compile.
//!
//! # Thread Safety
//!
//! - `sub_codecs`: `RwLock` (many readers, rare writers)
//! - Factories run outside the lock; when two callers race, the first
//!   insert wins and the other instance is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{CodeTable, Tagged, WireTag};
use crate::codec::{Codec, Sink, Source};
use crate::error::{ConfigError, ProtocolResult};

/// Shared handle to a payload codec.
pub type SubCodec<P> = Arc<dyn Codec<P>>;

type Factory<T, P> = dyn Fn(T, u32) -> Result<SubCodec<P>, ConfigError> + Send + Sync;

/// Codec for a polymorphic payload `P` whose variants are named by `T`.
pub struct UnionCodec<T: WireTag, P> {
    table: Arc<CodeTable<T>>,
    factory: Box<Factory<T, P>>,
    sub_codecs: RwLock<HashMap<T, SubCodec<P>>>,
}

impl<T: WireTag, P> UnionCodec<T, P> {
    /// Build the union at `version`. Fails on an unsupported version or a
    /// broken code table; sub-codecs are not built yet.
    pub fn new<F>(version: u32, factory: F) -> Result<Self, ConfigError>
    where
        F: Fn(T, u32) -> Result<SubCodec<P>, ConfigError> + Send + Sync + 'static,
    {
        let table = CodeTable::for_version(version)?;
        Ok(Self {
            table,
            factory: Box::new(factory),
            sub_codecs: RwLock::new(HashMap::new()),
        })
    }

    pub fn version(&self) -> u32 {
        self.table.version()
    }

    pub fn table(&self) -> &CodeTable<T> {
        &self.table
    }

    /// Sub-codec for `tag`, built on first use with the tag's derived version.
    pub fn sub_codec(&self, tag: T) -> Result<SubCodec<P>, ConfigError> {
        if let Some(codec) = self.sub_codecs.read().get(&tag) {
            return Ok(Arc::clone(codec));
        }

        let sub_version = tag.sub_version(self.version());
        let built = (self.factory)(tag, sub_version)?;
        log::debug!(
            "[REGISTRY] {} v{}: built sub-codec for {:?} at v{}",
            T::NAME,
            self.version(),
            tag,
            sub_version
        );

        let mut cache = self.sub_codecs.write();
        Ok(Arc::clone(cache.entry(tag).or_insert(built)))
    }

    /// Number of sub-codecs built so far.
    pub fn cached_sub_codecs(&self) -> usize {
        self.sub_codecs.read().len()
    }
}

impl<T, P> Codec<P> for UnionCodec<T, P>
where
    T: WireTag,
    P: Tagged<T>,
{
    fn encode(&self, sink: &mut Sink<'_>, value: &P) -> ProtocolResult<()> {
        let tag = value.tag();
        self.table.write_tag(sink, tag)?;
        self.sub_codec(tag)?.encode(sink, value)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<P> {
        let tag = self.table.read_tag(source)?;
        self.sub_codec(tag)?.decode(source)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        let tag = self.table.read_tag(source)?;
        self.sub_codec(tag)?.skip(source)
    }
}
