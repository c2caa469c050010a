// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged-union registry
//!
//! Every polymorphic wire type (terms, namespaces, message envelopes) is a
//! closed set of variant tags. Each tag declares, in a static table, the
//! shape it decodes into and a wire code per format version:
//!
//! ```text
//! TagEntry { tag, shape, code: fn(version) -> Option<u16> }
//!     v CodeTable::for_version(v)     (memoized per (type, version))
//! tag <-> code bijection, duplicates rejected at build time
//!     v UnionCodec::new(v, factory)
//! per-tag sub-codecs, built lazily, cached for the codec's lifetime
//! ```

mod table;
mod union;

pub use table::CodeTable;
pub use union::{SubCodec, UnionCodec};

use std::fmt::Debug;
use std::hash::Hash;

use crate::codec::Versioned;

/// Width of a wire code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidth {
    /// 1 byte.
    Byte,
    /// 2 bytes, little-endian.
    Short,
}

impl CodeWidth {
    pub const fn max_code(self) -> u16 {
        match self {
            CodeWidth::Byte => 0xFF,
            CodeWidth::Short => 0xFFFF,
        }
    }

    pub const fn byte_len(self) -> u64 {
        match self {
            CodeWidth::Byte => 1,
            CodeWidth::Short => 2,
        }
    }
}

/// One row of a tag type's static table.
pub struct TagEntry<T: 'static> {
    pub tag: T,
    /// Concrete shape this tag decodes into. Must be unique per version.
    pub shape: &'static str,
    /// Wire code for a format version; `None` when the tag does not exist there.
    pub code: fn(u32) -> Option<u16>,
}

/// A closed set of variant tags with a static code table.
pub trait WireTag: Versioned + Copy + Eq + Hash + Debug + Send + Sync + 'static {
    const WIDTH: CodeWidth;

    fn variants() -> &'static [TagEntry<Self>];

    /// Version handed to this tag's sub-codec when the union runs at `version`.
    fn sub_version(self, version: u32) -> u32 {
        version
    }
}

/// A value that knows which variant tag it carries.
pub trait Tagged<T: WireTag> {
    fn tag(&self) -> T;
}
