// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-version tag <-> wire code bijection.
//!
//! # Thread Safety
//!
//! Tables are immutable once built. The process-wide memo is a `DashMap`
//! keyed by `(TypeId, version)`; two threads racing on the same key both
//! build a table and the first insert wins, which is harmless because
//! building is deterministic.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::{CodeWidth, WireTag};
use crate::codec::{Sink, Source};
use crate::error::{ConfigError, DecodeError, ProtocolResult};

type AnyTable = Arc<dyn Any + Send + Sync>;

fn memo() -> &'static DashMap<(TypeId, u32), AnyTable> {
    static TABLES: OnceLock<DashMap<(TypeId, u32), AnyTable>> = OnceLock::new();
    TABLES.get_or_init(DashMap::new)
}

/// Tag <-> code mapping for one tag type at one format version.
#[derive(Debug)]
pub struct CodeTable<T: WireTag> {
    version: u32,
    to_code: HashMap<T, u16>,
    to_tag: HashMap<u16, T>,
}

impl<T: WireTag> CodeTable<T> {
    /// Build the table for `version` from `T::variants()`.
    ///
    /// Fails if the version is not declared, if two tags share a code, if two
    /// tags target the same shape, or if a code does not fit `T::WIDTH`.
    pub fn build(version: u32) -> Result<Self, ConfigError> {
        T::check_version(version)?;

        let mut to_code = HashMap::new();
        let mut to_tag = HashMap::new();
        let mut shapes: HashMap<&'static str, T> = HashMap::new();

        for entry in T::variants() {
            let Some(code) = (entry.code)(version) else {
                continue;
            };

            if code > T::WIDTH.max_code() {
                return Err(ConfigError::CodeOutOfRange {
                    union: T::NAME,
                    version,
                    code,
                    tag: format!("{:?}", entry.tag),
                });
            }

            if let Some(first) = to_tag.insert(code, entry.tag) {
                return Err(ConfigError::DuplicateCode {
                    union: T::NAME,
                    version,
                    code,
                    first: format!("{:?}", first),
                    second: format!("{:?}", entry.tag),
                });
            }

            if let Some(first) = shapes.insert(entry.shape, entry.tag) {
                return Err(ConfigError::DuplicateShape {
                    union: T::NAME,
                    version,
                    shape: entry.shape,
                    first: format!("{:?}", first),
                    second: format!("{:?}", entry.tag),
                });
            }

            to_code.insert(entry.tag, code);
        }

        log::debug!(
            "[REGISTRY] {} v{}: {} wire codes",
            T::NAME,
            version,
            to_code.len()
        );

        Ok(Self {
            version,
            to_code,
            to_tag,
        })
    }

    /// Memoized [`build`](Self::build): one table per `(T, version)` per process.
    pub fn for_version(version: u32) -> Result<Arc<Self>, ConfigError> {
        let key = (TypeId::of::<T>(), version);

        let cached = memo().get(&key).map(|entry| Arc::clone(entry.value()));
        if let Some(table) = cached.and_then(|any| any.downcast::<Self>().ok()) {
            return Ok(table);
        }

        let built: AnyTable = Arc::new(Self::build(version)?);
        let stored = Arc::clone(memo().entry(key).or_insert(built).value());
        match stored.downcast::<Self>() {
            Ok(table) => Ok(table),
            // The key embeds `TypeId::of::<T>()`, so this arm is unreachable
            // in practice; fall back to an unshared table.
            Err(_) => Self::build(version).map(Arc::new),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn width(&self) -> CodeWidth {
        T::WIDTH
    }

    /// Tags present in this version.
    pub fn tags(&self) -> impl Iterator<Item = T> + '_ {
        self.to_code.keys().copied()
    }

    pub fn code_for(&self, tag: T) -> Result<u16, ConfigError> {
        self.to_code
            .get(&tag)
            .copied()
            .ok_or_else(|| ConfigError::TagNotAvailable {
                union: T::NAME,
                version: self.version,
                tag: format!("{:?}", tag),
            })
    }

    pub fn tag_for(&self, code: u16) -> Result<T, DecodeError> {
        self.to_tag
            .get(&code)
            .copied()
            .ok_or(DecodeError::UnknownCode {
                union: T::NAME,
                version: self.version,
                code,
            })
    }

    pub fn write_tag(&self, sink: &mut Sink<'_>, tag: T) -> ProtocolResult<()> {
        let code = self.code_for(tag)?;
        match T::WIDTH {
            // `build` guarantees byte-width codes fit in a u8.
            CodeWidth::Byte => sink.write_u8(code as u8),
            CodeWidth::Short => sink.write_u16_le(code),
        }
    }

    pub fn read_tag(&self, source: &mut Source<'_>) -> ProtocolResult<T> {
        let code = match T::WIDTH {
            CodeWidth::Byte => u16::from(source.read_u8()?),
            CodeWidth::Short => source.read_u16_le()?,
        };
        let tag = self.tag_for(code).inspect_err(|e| {
            log::debug!("[REGISTRY] {} at offset {}", e, source.position());
        })?;
        Ok(tag)
    }
}
