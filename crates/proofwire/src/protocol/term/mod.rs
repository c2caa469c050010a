// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Term codec
//!
//! Encodes proof-object terms as a pre-order walk: one tag byte per node,
//! then the node's payload fields in a fixed order.
//!
//! # Variable binding
//!
//! - Global variables are written as their 16-byte UUID and resolved on
//!   decode through the [`VariableResolver`].
//! - Bound parameters are written as a varint ordinal counted from the
//!   innermost enclosing function (0 = innermost). A function writes its
//!   parameter type *before* the parameter enters scope.
//!
//! Ordinals make the encoding independent of parameter object identity, so
//! alpha-equivalent terms encode to the same bytes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use proofwire::codec::{decode_from_slice, encode_to_vec};
//! use proofwire::protocol::TermCodec;
//! use proofwire::term::{InMemoryResolver, Parameter, Term};
//!
//! let codec = TermCodec::builder()
//!     .version(1)
//!     .resolver(Arc::new(InMemoryResolver::new()))
//!     .build()
//!     .unwrap();
//!
//! let x = Parameter::new(Term::Tau);
//! let identity = Term::function(Arc::clone(&x), Term::parameter(&x));
//!
//! let bytes = encode_to_vec(&codec, &identity).unwrap();
//! assert_eq!(bytes, [0x04, 0x00, 0x01, 0x00]);
//!
//! let (decoded, _) = decode_from_slice(&codec, &bytes).unwrap();
//! assert_eq!(decoded, identity);
//! ```

mod decode;
mod encode;
mod numbering;
mod skip;
mod tag;

#[cfg(test)]
mod tests;

pub use tag::TermTag;

use std::fmt;
use std::sync::Arc;

use crate::codec::{Codec, Sink, Source, Versioned};
use crate::config::CodecConfig;
use crate::error::{ConfigError, ProtocolResult};
use crate::registry::CodeTable;
use crate::term::{StructuralModel, Term, TermModel, VariableResolver};

use numbering::{ParameterNumbering, ParameterStack};

/// Codec for [`Term`] trees.
pub struct TermCodec {
    config: CodecConfig,
    table: Arc<CodeTable<TermTag>>,
    resolver: Arc<dyn VariableResolver>,
    model: Arc<dyn TermModel>,
}

impl Versioned for TermCodec {
    const NAME: &'static str = "TermCodec";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0, 1];
}

impl TermCodec {
    pub fn builder() -> TermCodecBuilder {
        TermCodecBuilder::default()
    }

    /// Codec at `version` with default limits and the structural model.
    pub fn new(version: u32, resolver: Arc<dyn VariableResolver>) -> Result<Self, ConfigError> {
        Self::builder().version(version).resolver(resolver).build()
    }

    pub fn version(&self) -> u32 {
        self.config.version
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Increment the nesting depth, failing once it reaches `max_depth`.
    ///
    /// Encode, decode and skip all count the same nodes, so a term encodes
    /// exactly when its bytes decode.
    fn descend<E>(&self, depth: u32, limit_hit: impl FnOnce(u32) -> E) -> Result<u32, E> {
        let limit = self.config.max_depth;
        if depth >= limit {
            log::debug!("[TERM-CODEC] depth limit {} hit", limit);
            return Err(limit_hit(limit));
        }
        Ok(depth + 1)
    }
}

impl fmt::Debug for TermCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermCodec")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Codec<Term> for TermCodec {
    fn encode(&self, sink: &mut Sink<'_>, term: &Term) -> ProtocolResult<()> {
        self.encode_term(sink, term, &mut ParameterNumbering::default(), 0)
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Term> {
        self.decode_term(source, &mut ParameterStack::default(), 0)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        self.skip_term(source, 0, 0)
    }
}

/// Builder for [`TermCodec`].
#[derive(Default)]
pub struct TermCodecBuilder {
    version: Option<u32>,
    config: CodecConfig,
    resolver: Option<Arc<dyn VariableResolver>>,
    model: Option<Arc<dyn TermModel>>,
}

impl TermCodecBuilder {
    /// Required format version; overrides `config.version`.
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Source of global variables for decode. Mandatory.
    pub fn resolver(mut self, resolver: Arc<dyn VariableResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Validating constructors used on decode. Defaults to [`StructuralModel`].
    pub fn model(mut self, model: Arc<dyn TermModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn build(self) -> Result<TermCodec, ConfigError> {
        let config = match self.version {
            Some(version) => self.config.with_version(version),
            None => self.config,
        };

        TermCodec::check_version(config.version)?;
        let table = CodeTable::<TermTag>::for_version(config.version)?;
        let resolver = self.resolver.ok_or_else(|| {
            log::warn!("[TERM-CODEC] built without a variable resolver");
            ConfigError::MissingResolver {
                codec: TermCodec::NAME,
            }
        })?;
        let model = self
            .model
            .unwrap_or_else(|| Arc::new(StructuralModel) as Arc<dyn TermModel>);

        log::debug!(
            "[TERM-CODEC] v{} ready (max depth {})",
            config.version,
            config.max_depth
        );

        Ok(TermCodec {
            config,
            table,
            resolver,
            model,
        })
    }
}
