// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Namespace paths
//!
//! A namespace is the root or a named child of another namespace, written
//! in dotted form (`algebra.groups.abelian`). The root renders as the empty
//! string.
//!
//! Wire format (version 0):
//!
//! ```text
//! 'R'                                  root
//! 'N' | varint n | name_1 .. name_n    root-first names, each a string
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::codec::primitive::{read_string, skip_prefixed, write_str, StringCodec};
use crate::codec::{Codec, Sink, Source, Versioned};
use crate::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAYLOAD_LEN};
use crate::error::{ConfigError, DecodeError, EncodeError, ProtocolResult};
use crate::registry::{CodeWidth, SubCodec, TagEntry, Tagged, UnionCodec, WireTag};

/// Path separator in the dotted form.
pub const SEPARATOR: char = '.';

/// Rejected namespace segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid namespace name {0:?}")]
pub struct InvalidName(pub String);

fn validate(name: &str) -> Result<(), InvalidName> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(InvalidName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Root,
    Node {
        parent: Arc<Namespace>,
        name: String,
    },
}

impl Namespace {
    pub fn child(&self, name: impl Into<String>) -> Result<Namespace, InvalidName> {
        let name = name.into();
        validate(&name)?;
        Ok(Namespace::Node {
            parent: Arc::new(self.clone()),
            name,
        })
    }

    pub fn from_names<I, S>(names: I) -> Result<Namespace, InvalidName>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .try_fold(Namespace::Root, |ns, name| ns.child(name))
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Namespace::Root)
    }

    pub fn parent(&self) -> Option<&Namespace> {
        match self {
            Namespace::Root => None,
            Namespace::Node { parent, .. } => Some(parent),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Namespace::Root => None,
            Namespace::Node { name, .. } => Some(name),
        }
    }

    /// Segment names, root first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self;
        while let Namespace::Node { parent, name } = current {
            names.push(name.as_str());
            current = parent;
        }
        names.reverse();
        names
    }

    pub fn depth(&self) -> usize {
        self.names().len()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().into_iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", name)?;
        }
        Ok(())
    }
}

impl FromStr for Namespace {
    type Err = InvalidName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Namespace::Root);
        }
        Namespace::from_names(s.split(SEPARATOR))
    }
}

// ============================================================================
// Wire tags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceTag {
    Root,
    Node,
}

impl Versioned for NamespaceTag {
    const NAME: &'static str = "NamespaceTag";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0];
}

impl WireTag for NamespaceTag {
    const WIDTH: CodeWidth = CodeWidth::Byte;

    fn variants() -> &'static [TagEntry<Self>] {
        const VARIANTS: &[TagEntry<NamespaceTag>] = &[
            TagEntry {
                tag: NamespaceTag::Root,
                shape: "Root",
                code: |_| Some(b'R' as u16),
            },
            TagEntry {
                tag: NamespaceTag::Node,
                shape: "Node",
                code: |_| Some(b'N' as u16),
            },
        ];
        VARIANTS
    }

    // Names are strings at every namespace version.
    fn sub_version(self, _version: u32) -> u32 {
        0
    }
}

impl Tagged<NamespaceTag> for Namespace {
    fn tag(&self) -> NamespaceTag {
        match self {
            Namespace::Root => NamespaceTag::Root,
            Namespace::Node { .. } => NamespaceTag::Node,
        }
    }
}

// ============================================================================
// Codecs
// ============================================================================

struct RootCodec;

impl Codec<Namespace> for RootCodec {
    fn encode(&self, _sink: &mut Sink<'_>, _value: &Namespace) -> ProtocolResult<()> {
        Ok(())
    }

    fn decode(&self, _source: &mut Source<'_>) -> ProtocolResult<Namespace> {
        Ok(Namespace::Root)
    }

    fn skip(&self, _source: &mut Source<'_>) -> ProtocolResult<()> {
        Ok(())
    }
}

struct NodeCodec {
    max_names: u32,
    max_name_len: u32,
}

impl NodeCodec {
    // Each name is one `Arc` link, and dropping the chain recurses per link.
    fn read_count(&self, source: &mut Source<'_>) -> ProtocolResult<u64> {
        let count = source.read_varint()?;
        if count == 0 {
            return Err(DecodeError::InvalidName(String::new()).into());
        }
        if count > u64::from(self.max_names) {
            log::debug!("[NAMESPACE] {} names over limit {}", count, self.max_names);
            return Err(DecodeError::LengthLimit {
                len: count,
                limit: self.max_names,
            }
            .into());
        }
        Ok(count)
    }
}

impl Codec<Namespace> for NodeCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Namespace) -> ProtocolResult<()> {
        if value.is_root() {
            return Err(EncodeError::ShapeMismatch { expected: "Node" }.into());
        }
        let names = value.names();
        let count = names.len() as u64;
        if count > u64::from(self.max_names) {
            return Err(EncodeError::LengthLimit {
                len: count,
                limit: self.max_names,
            }
            .into());
        }
        sink.write_varint(count)?;
        for name in names {
            write_str(sink, name, self.max_name_len)?;
        }
        Ok(())
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Namespace> {
        let count = self.read_count(source)?;
        let mut namespace = Namespace::Root;
        for _ in 0..count {
            let name = read_string(source, self.max_name_len)?;
            namespace = namespace
                .child(name)
                .map_err(|InvalidName(name)| DecodeError::InvalidName(name))?;
        }
        Ok(namespace)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        let count = self.read_count(source)?;
        for _ in 0..count {
            skip_prefixed(source, self.max_name_len)?;
        }
        Ok(())
    }
}

/// Codec for [`Namespace`] paths.
pub struct NamespaceCodec {
    inner: UnionCodec<NamespaceTag, Namespace>,
}

impl Versioned for NamespaceCodec {
    const NAME: &'static str = "NamespaceCodec";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0];
}

impl NamespaceCodec {
    pub fn new(version: u32) -> Result<Self, ConfigError> {
        Self::with_limits(version, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAYLOAD_LEN)
    }

    /// `max_names` bounds the path depth, `max_name_len` each name's bytes.
    pub fn with_limits(
        version: u32,
        max_names: u32,
        max_name_len: u32,
    ) -> Result<Self, ConfigError> {
        Self::check_version(version)?;
        let inner = UnionCodec::<NamespaceTag, Namespace>::new(version, move |tag, sub_version| {
            StringCodec::check_version(sub_version)?;
            let codec: SubCodec<Namespace> = match tag {
                NamespaceTag::Root => Arc::new(RootCodec),
                NamespaceTag::Node => Arc::new(NodeCodec {
                    max_names,
                    max_name_len,
                }),
            };
            Ok(codec)
        })?;
        Ok(Self { inner })
    }

    pub fn version(&self) -> u32 {
        self.inner.version()
    }
}

impl Codec<Namespace> for NamespaceCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Namespace) -> ProtocolResult<()> {
        self.inner.encode(sink, value)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Namespace> {
        self.inner.decode(source)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        self.inner.skip(source)
    }
}
