// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # proofwire - versioned binary codecs for proof-object terms
//!
//! Serializes the term AST of a proof assistant (bound parameters, global
//! variables, binders, projections and casts) in a compact, versioned,
//! skippable binary format.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use proofwire::{decode_from_slice, encode_to_vec, GlobalVariable, InMemoryResolver};
//! use proofwire::{Parameter, ProtocolResult, Term, TermCodec};
//! use uuid::Uuid;
//!
//! fn main() -> ProtocolResult<()> {
//!     let nat = GlobalVariable::new(Uuid::new_v4(), Term::Tau);
//!     let resolver = Arc::new(InMemoryResolver::new());
//!     resolver.insert(Arc::clone(&nat));
//!
//!     let codec = TermCodec::new(1, resolver)?;
//!
//!     // <x:nat -> x>
//!     let x = Parameter::new(Term::global(&nat));
//!     let term = Term::function(Arc::clone(&x), Term::parameter(&x));
//!
//!     let bytes = encode_to_vec(&codec, &term)?;
//!     let (decoded, _) = decode_from_slice(&codec, &bytes)?;
//!     assert_eq!(decoded, term);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  protocol   TermCodec | NamespaceCodec | MessageCodec         |
//! +---------------------------------------------------------------+
//! |  registry   WireTag tables -> CodeTable -> UnionCodec         |
//! +---------------------------------------------------------------+
//! |  codec      Codec trait | Versioned gate | Sink/Source        |
//! |             varint | primitive (u32, uuid, bytes, string)     |
//! +---------------------------------------------------------------+
//! |  term       Term AST | TermModel | VariableResolver           |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Versioning
//!
//! Each codec declares the versions it speaks. Asking for any other version
//! fails at construction with [`ConfigError::VersionNotAvailable`]; there is
//! no per-message negotiation. Decode failures ([`DecodeError`]) are data
//! errors and always recoverable.
//!
//! ## Logging
//!
//! Uses the `log` facade with `[REGISTRY]`, `[TERM-CODEC]`, `[MESSAGE]` and
//! `[VERSION]` prefixes. No logger is installed by the library.

pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod term;

pub use codec::{decode_from_slice, encode_to_vec, skip_in_slice, Codec, Sink, Source, Versioned};
pub use config::{CodecConfig, CodecConfigBuilder};
pub use error::{ConfigError, DecodeError, EncodeError, ProtocolError, ProtocolResult};
pub use protocol::{Message, MessageCodec, Namespace, NamespaceCodec, TermCodec};
pub use registry::{CodeTable, CodeWidth, TagEntry, Tagged, UnionCodec, WireTag};
pub use term::{
    GlobalVariable, InMemoryResolver, Parameter, StructuralModel, Term, TermError, TermModel,
    VariableResolver,
};
