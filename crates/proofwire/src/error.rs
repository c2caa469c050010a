// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the codec layer.
//!
//! Three families, matching how a caller is expected to react:
//!
//! - [`ConfigError`]: mismatched code (unsupported version, broken code
//!   table). Raised at construction and never worth retrying.
//! - [`DecodeError`]: bad data. Always recoverable by the caller.
//! - `std::io::Error`: whatever the underlying sink/source reported.
//!
//! [`ProtocolError`] is the umbrella returned by every codec operation.

use std::io;

use thiserror::Error;
use uuid::Uuid;

use crate::term::TermError;

/// Construction-time failure: the two ends were built from incompatible code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{codec}: version {requested} not available (available: {available:?})")]
    VersionNotAvailable {
        codec: &'static str,
        requested: u32,
        available: &'static [u32],
    },

    #[error("{codec}: no version information declared")]
    MissingVersionInfo { codec: &'static str },

    #[error("{union} v{version}: code {code:#06x} assigned to both {first} and {second}")]
    DuplicateCode {
        union: &'static str,
        version: u32,
        code: u16,
        first: String,
        second: String,
    },

    #[error("{union} v{version}: shape {shape} targeted by both {first} and {second}")]
    DuplicateShape {
        union: &'static str,
        version: u32,
        shape: &'static str,
        first: String,
        second: String,
    },

    #[error("{union} v{version}: code {code:#06x} for {tag} does not fit the tag width")]
    CodeOutOfRange {
        union: &'static str,
        version: u32,
        code: u16,
        tag: String,
    },

    #[error("{union} v{version}: {tag} has no wire code in this version")]
    TagNotAvailable {
        union: &'static str,
        version: u32,
        tag: String,
    },

    #[error("{codec}: no variable resolver supplied")]
    MissingResolver { codec: &'static str },
}

/// Data-time failure while reading an encoded value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of data at offset {offset}")]
    Truncated { offset: u64 },

    #[error("{union} v{version}: unknown wire code {code:#06x}")]
    UnknownCode {
        union: &'static str,
        version: u32,
        code: u16,
    },

    #[error("parameter ordinal {ordinal} out of range (binder depth {depth})")]
    ParameterOutOfRange { ordinal: u32, depth: usize },

    #[error("global variable {0} could not be resolved")]
    UnresolvedVariable(Uuid),

    #[error("{shape} rejected by the term model")]
    Rejected {
        shape: &'static str,
        #[source]
        source: TermError,
    },

    #[error("invalid namespace name {0:?}")]
    InvalidName(String),

    #[error("varint overflow")]
    VarintOverflow,

    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,

    #[error("length prefix {len} exceeds limit {limit}")]
    LengthLimit { len: u64, limit: u32 },

    #[error("nesting depth limit {limit} exceeded")]
    DepthLimit { limit: u32 },
}

/// Encode-side precondition failure.
///
/// Callers are expected to hand only closed terms to the encoder; debug
/// builds assert this, release builds report it here instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("parameter is not bound by any enclosing function")]
    UnboundParameter,

    #[error("length {len} exceeds limit {limit}")]
    LengthLimit { len: u64, limit: u32 },

    #[error("value handed to the {expected} sub-codec has a different shape")]
    ShapeMismatch { expected: &'static str },

    #[error("nesting depth limit {limit} exceeded")]
    DepthLimit { limit: u32 },
}

/// Umbrella error returned by every codec operation.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// True when the failure came from malformed input rather than code or I/O.
    pub fn is_decode(&self) -> bool {
        matches!(self, ProtocolError::Decode(_))
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_version_error_display() {
        let err = ConfigError::VersionNotAvailable {
            codec: "TermCodec",
            requested: 7,
            available: &[0, 1],
        };
        assert_eq!(
            err.to_string(),
            "TermCodec: version 7 not available (available: [0, 1])"
        );
    }

    #[test]
    fn test_duplicate_code_display() {
        let err = ConfigError::DuplicateCode {
            union: "TermTag",
            version: 0,
            code: 0x54,
            first: "Tau".into(),
            second: "Parameter".into(),
        };
        assert_eq!(
            err.to_string(),
            "TermTag v0: code 0x0054 assigned to both Tau and Parameter"
        );
    }

    #[test]
    fn test_rejected_keeps_source() {
        let err = DecodeError::Rejected {
            shape: "Composition",
            source: TermError::CompositeHead,
        };
        let source = err.source().expect("term error attached");
        assert_eq!(source.to_string(), TermError::CompositeHead.to_string());
    }

    #[test]
    fn test_protocol_error_classification() {
        let err: ProtocolError = DecodeError::Truncated { offset: 3 }.into();
        assert!(err.is_decode());

        let err: ProtocolError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(!err.is_decode());
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
